//! Render frames to the user's actual terminal

use color_eyre::eyre::Result;
use termwiz::surface::Change as TermwizChange;
use termwiz::terminal::buffered::BufferedTerminal;
use termwiz::terminal::{SystemTerminal, Terminal as TermwizTerminal};

use super::surface::Surface;

/// `Renderer`
pub struct Renderer {
    /// The user's terminal, wrapped so that only the differences between frames get written.
    terminal: BufferedTerminal<SystemTerminal>,
}

impl Renderer {
    /// Take over the user's terminal: raw mode, alternate screen, no cursor.
    pub fn new() -> Result<Self> {
        let capabilities = termwiz::caps::Capabilities::new_from_env()?;
        let users_terminal = SystemTerminal::new(capabilities)?;
        let mut terminal = BufferedTerminal::new(users_terminal)?;

        tracing::debug!("Putting user's terminal into raw mode");
        take_over(&mut terminal)?;

        Ok(Self { terminal })
    }

    /// The terminal's size in cells, `(columns, rows)`.
    #[must_use]
    pub fn size(&self) -> (usize, usize) {
        self.terminal.dimensions()
    }

    /// Returns the new size if the user's terminal has been resized since we last checked.
    pub fn check_for_resize(&mut self) -> Result<Option<(usize, usize)>> {
        let is_resized = self.terminal.check_for_resize()?;
        if !is_resized {
            return Ok(None);
        }

        self.terminal.repaint()?;
        let size = self.size();
        tracing::debug!("Terminal resized to {}x{}", size.0, size.1);
        Ok(Some(size))
    }

    /// Do a single render to the user's actual terminal. It uses a diffing algorithm to make
    /// the minimum number of changes.
    pub fn render(&mut self, frame: &Surface) -> Result<()> {
        self.terminal.draw_from_screen(&frame.surface, 0, 0);
        self.terminal.flush()?;
        Ok(())
    }

    /// Drain all pending input, returning whether the user asked to quit.
    pub fn is_quit_requested(&mut self) -> Result<bool> {
        let mut is_quit = false;
        while let Some(event) = self
            .terminal
            .terminal()
            .poll_input(Some(std::time::Duration::ZERO))?
        {
            if let termwiz::input::InputEvent::Key(key) = event {
                is_quit |= is_quit_key(&key);
            }
        }
        Ok(is_quit)
    }

    /// Give the user their terminal back the way we found it.
    pub fn restore(&mut self) -> Result<()> {
        tracing::debug!("Setting user's terminal to cooked mode");
        restore(&mut self.terminal)
    }
}

/// The individual steps of taking over, and giving back, the user's terminal.
trait TerminalModes {
    /// Stop the terminal from echoing and line buffering.
    fn set_raw_mode(&mut self) -> Result<()>;
    /// Go back to normal echoing and line buffering.
    fn set_cooked_mode(&mut self) -> Result<()>;
    /// Switch to the alternate screen, saving the user's scrollback.
    fn enter_alternate_screen(&mut self) -> Result<()>;
    /// Switch back to the user's screen.
    fn exit_alternate_screen(&mut self) -> Result<()>;
    /// Show or hide the cursor, clearing the screen when hiding it.
    fn cursor_visibility(&mut self, is_visible: bool) -> Result<()>;
}

impl TerminalModes for BufferedTerminal<SystemTerminal> {
    fn set_raw_mode(&mut self) -> Result<()> {
        Ok(self.terminal().set_raw_mode()?)
    }

    fn set_cooked_mode(&mut self) -> Result<()> {
        Ok(self.terminal().set_cooked_mode()?)
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        Ok(self.terminal().enter_alternate_screen()?)
    }

    fn exit_alternate_screen(&mut self) -> Result<()> {
        Ok(self.terminal().exit_alternate_screen()?)
    }

    fn cursor_visibility(&mut self, is_visible: bool) -> Result<()> {
        let cursor_visibility = if is_visible {
            termwiz::surface::CursorVisibility::Visible
        } else {
            self.add_change(TermwizChange::ClearScreen(
                termwiz::color::ColorAttribute::Default,
            ));
            termwiz::surface::CursorVisibility::Hidden
        };
        self.add_change(TermwizChange::CursorVisibility(cursor_visibility));
        self.flush()?;
        Ok(())
    }
}

/// Raw mode, alternate screen and no cursor. If any step fails then whatever already happened is
/// undone before the error is returned.
fn take_over(terminal: &mut impl TerminalModes) -> Result<()> {
    terminal.set_raw_mode()?;

    let result = terminal
        .enter_alternate_screen()
        .and_then(|()| terminal.cursor_visibility(false));
    if let Err(error) = result {
        if let Err(restore_error) = restore(terminal) {
            tracing::error!("Restoring terminal after a failed start: {restore_error:?}");
        }
        return Err(error);
    }

    Ok(())
}

/// Every step is always attempted, even when an earlier one fails. The first error is returned.
fn restore(terminal: &mut impl TerminalModes) -> Result<()> {
    let results = [
        terminal.cursor_visibility(true),
        terminal.exit_alternate_screen(),
        terminal.set_cooked_mode(),
    ];
    results.into_iter().collect()
}

/// `q`, `Esc` and `Ctrl-C` all quit.
#[must_use]
pub fn is_quit_key(key: &termwiz::input::KeyEvent) -> bool {
    use termwiz::input::{KeyCode, Modifiers};

    #[expect(clippy::wildcard_enum_match_arm, reason = "Every other key is ignored")]
    match key.key {
        KeyCode::Escape => true,
        KeyCode::Char('q') => !key.modifiers.contains(Modifiers::CTRL),
        KeyCode::Char('c') => key.modifiers.contains(Modifiers::CTRL),
        _ => false,
    }
}
