//! Hello demo: Prints into an 80x25 surface on every tick and flushes it.
//!
//! Mouse reports are shown on the bottom row. Press 'q' or Ctrl-C to quit.

use std::io;
use std::time::Duration;
use ttysurface::{Event, InputConfig, InputManager, Surface, Terminal};

/// One render tick; also how long each pump waits for input.
const TICK: Duration = Duration::from_millis(30);

/// Inverse video for the status row.
const STATUS_FORMAT: &str = "7";

fn main() -> ttysurface::Result<()> {
    let mut surface = Surface::new(80, 25);
    let mut status = Surface::new(80, 1);
    surface.clear_default();

    let mut input = InputManager::stdio(InputConfig {
        poll_timeout: TICK,
        ..InputConfig::default()
    });
    input.start()?;

    let result = run(&mut surface, &mut status, &mut input);

    input.stop()?;
    result
}

fn run(
    surface: &mut Surface,
    status: &mut Surface,
    input: &mut InputManager<ttysurface::StdinSource, io::Stdout>,
) -> ttysurface::Result<()> {
    let mut stdout = io::stdout();
    let mut tty = Terminal::new(surface);

    loop {
        input.pump()?;
        for event in input.drain() {
            match event {
                Event::Keyboard(key) if key.raw == "q" || key.raw == "\x03" => return Ok(()),
                Event::Keyboard(_) => {}
                Event::Mouse(mouse) => {
                    let action = mouse
                        .action
                        .map_or_else(|| "unknown".to_string(), |action| format!("{action:?}"));
                    status.clear("");
                    let text = format!(" {action} at {},{} ", mouse.x, mouse.y);
                    status.write_text(0, 0, &text, "")?;
                }
            }
        }

        tty.print("Hello world! ")?;
        let (width, height) = (tty.width(), tty.height());
        status.blit(tty.surface_mut(), 0, height - 1);
        tty.surface_mut().fill_rect(0, height - 1, width, height, STATUS_FORMAT)?;
        tty.surface_mut().flush(&mut stdout)?;
    }
}
