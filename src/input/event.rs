//! Event model: Typed events classified from raw input chunks.
//!
//! A chunk is a mouse event only when it is exactly one SGR mouse report:
//!
//! ```text
//! ESC [ < B ; X ; Y F
//! ```
//!
//! `B`, `X` and `Y` are runs of ASCII digits and `F` is any single character
//! other than a line terminator (`M` for press or motion, `m` for release). Every other chunk is a
//! keyboard event carrying the bytes unchanged. Classification never fails.

/// Prefix of an SGR extended mouse report.
const SGR_MOUSE_PREFIX: &str = "\x1b[<";

/// Action codes of the SGR `B` field.
const ACTION_CODES: [(u32, MouseAction); 9] = [
    (0, MouseAction::Left),
    (1, MouseAction::Middle),
    (2, MouseAction::Right),
    (32, MouseAction::LeftDrag),
    (33, MouseAction::MiddleDrag),
    (34, MouseAction::RightDrag),
    (35, MouseAction::Move),
    (64, MouseAction::ScrollUp),
    (65, MouseAction::ScrollDown),
];

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Right,
}

/// What a mouse report describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Left button press or release.
    Left,
    /// Middle button press or release.
    Middle,
    /// Right button press or release.
    Right,
    /// Motion with the left button held.
    LeftDrag,
    /// Motion with the middle button held.
    MiddleDrag,
    /// Motion with the right button held.
    RightDrag,
    /// Motion with no button held.
    Move,
    /// Wheel up.
    ScrollUp,
    /// Wheel down.
    ScrollDown,
}

impl MouseAction {
    /// Look up an SGR action code. Unknown codes yield `None`.
    pub fn from_code(code: u32) -> Option<Self> {
        ACTION_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|&(_, action)| action)
    }

    /// The SGR action code for this action.
    pub fn code(self) -> u32 {
        ACTION_CODES
            .iter()
            .find(|(_, action)| *action == self)
            .map_or(0, |&(code, _)| code)
    }

    /// The button involved, if any.
    pub const fn button(self) -> Option<MouseButton> {
        match self {
            Self::Left | Self::LeftDrag => Some(MouseButton::Left),
            Self::Middle | Self::MiddleDrag => Some(MouseButton::Middle),
            Self::Right | Self::RightDrag => Some(MouseButton::Right),
            Self::Move | Self::ScrollUp | Self::ScrollDown => None,
        }
    }

    /// Motion with a button held.
    pub const fn is_drag(self) -> bool {
        matches!(self, Self::LeftDrag | Self::MiddleDrag | Self::RightDrag)
    }

    /// Wheel movement.
    pub const fn is_scroll(self) -> bool {
        matches!(self, Self::ScrollUp | Self::ScrollDown)
    }
}

/// Any chunk that is not a mouse report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// The chunk as received.
    pub raw: String,
}

/// A decoded SGR mouse report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    /// The chunk as received.
    pub raw: String,
    /// Decoded action; `None` for codes outside the table, which consumers
    /// should ignore.
    pub action: Option<MouseAction>,
    /// Column, 0-indexed.
    pub x: u16,
    /// Row, 0-indexed.
    pub y: u16,
    /// Final character of the report.
    pub terminator: char,
}

impl MouseEvent {
    /// Button release report (`m` terminator).
    pub fn is_release(&self) -> bool {
        self.terminator == 'm'
    }
}

/// An input event queued for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keystrokes or any unrecognised chunk.
    Keyboard(KeyboardEvent),
    /// SGR mouse report.
    Mouse(MouseEvent),
}

impl Event {
    /// Classify one raw input chunk.
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        match parse_sgr_mouse(&raw) {
            Some(report) => Self::Mouse(MouseEvent {
                raw,
                action: report.code.and_then(MouseAction::from_code),
                x: report.column.saturating_sub(1),
                y: report.row.saturating_sub(1),
                terminator: report.terminator,
            }),
            None => Self::Keyboard(KeyboardEvent { raw }),
        }
    }

    /// The chunk this event was decoded from.
    pub fn raw(&self) -> &str {
        match self {
            Self::Keyboard(event) => &event.raw,
            Self::Mouse(event) => &event.raw,
        }
    }

    /// Consume the event, returning its chunk.
    pub fn into_raw(self) -> String {
        match self {
            Self::Keyboard(event) => event.raw,
            Self::Mouse(event) => event.raw,
        }
    }

    /// The mouse payload, if this is a mouse event.
    pub const fn as_mouse(&self) -> Option<&MouseEvent> {
        match self {
            Self::Mouse(event) => Some(event),
            Self::Keyboard(_) => None,
        }
    }
}

/// Fields of a matched SGR report, before decoding.
struct SgrReport {
    /// `None` when the digit run does not fit a `u32`.
    code: Option<u32>,
    /// 1-indexed column.
    column: u16,
    /// 1-indexed row.
    row: u16,
    terminator: char,
}

/// Match `ESC [ < digits ; digits ; digits <final>` against the whole chunk.
///
/// Coordinates that do not fit a `u16` reject the chunk.
fn parse_sgr_mouse(raw: &str) -> Option<SgrReport> {
    let body = raw.strip_prefix(SGR_MOUSE_PREFIX)?;
    let (code, rest) = split_digits(body)?;
    let (column, rest) = split_digits(rest)?;

    // The row is every character but the last, which is the terminator.
    let mut chars = rest.chars();
    let terminator = chars.next_back().filter(|&c| !is_line_terminator(c))?;
    let row = chars.as_str();
    if !is_digits(row) {
        return None;
    }

    Some(SgrReport {
        code: code.parse().ok(),
        column: column.parse().ok()?,
        row: row.parse().ok()?,
        terminator,
    })
}

/// Split a non-empty digit run off the front of `s`, consuming the `;` after it.
fn split_digits(s: &str) -> Option<(&str, &str)> {
    let (digits, rest) = s.split_once(';')?;
    is_digits(digits).then_some((digits, rest))
}

const fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
