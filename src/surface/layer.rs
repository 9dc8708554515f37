//! Layer selection: which of a surface's three parallel grids an access targets.

/// One of the three parallel grids of a [`Surface`](super::Surface).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Displayed characters.
    Char,
    /// Opaque SGR format tokens.
    Format,
    /// Changed-since-last-flush flags.
    Dirty,
}

/// A value stored in one cell of one grid.
///
/// The variant selects the grid for writes and fills, so a call site always
/// names the layer it touches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CellValue {
    /// A display character, or `None` for a blank cell.
    Char(Option<char>),
    /// An SGR parameter token; `""` means reset.
    Format(String),
    /// The dirty flag.
    Dirty(bool),
}

impl CellValue {
    /// The grid this value belongs to.
    #[inline]
    pub const fn layer(&self) -> Layer {
        match self {
            Self::Char(_) => Layer::Char,
            Self::Format(_) => Layer::Format,
            Self::Dirty(_) => Layer::Dirty,
        }
    }

    /// The character, if this is a char-layer value.
    #[inline]
    pub const fn as_char(&self) -> Option<Option<char>> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// The format token, if this is a format-layer value.
    #[inline]
    pub fn as_format(&self) -> Option<&str> {
        match self {
            Self::Format(token) => Some(token),
            _ => None,
        }
    }

    /// The dirty flag, if this is a dirty-layer value.
    #[inline]
    pub const fn as_dirty(&self) -> Option<bool> {
        match self {
            Self::Dirty(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl From<char> for CellValue {
    #[inline]
    fn from(c: char) -> Self {
        Self::Char(Some(c))
    }
}

impl From<Option<char>> for CellValue {
    #[inline]
    fn from(c: Option<char>) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for CellValue {
    #[inline]
    fn from(token: &str) -> Self {
        Self::Format(token.to_owned())
    }
}

impl From<String> for CellValue {
    #[inline]
    fn from(token: String) -> Self {
        Self::Format(token)
    }
}

impl From<bool> for CellValue {
    #[inline]
    fn from(flag: bool) -> Self {
        Self::Dirty(flag)
    }
}
