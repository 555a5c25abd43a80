use std::io::{Stdout, stdout};

use anyhow::{Context, Result, anyhow};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

type Backend = CrosstermBackend<Stdout>;

/// Raw mode plus the alternate screen for the lifetime of the value. Dropping
/// it always gives the shell its screen back.
pub(crate) struct TerminalGuard {
    terminal: Terminal<Backend>,
}

impl TerminalGuard {
    pub(crate) fn acquire() -> Result<Self> {
        let terminal = acquire_with(&mut CrosstermSteps)?;
        Ok(Self { terminal })
    }

    pub(crate) fn draw(&mut self, paint: impl FnOnce(&mut Frame<'_>)) -> Result<()> {
        self.terminal
            .draw(paint)
            .map(|_| ())
            .context("failed to draw shelfcam screen")
    }

    pub(crate) fn resize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to resize shelfcam screen")
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// The individual setup and teardown steps, split out so the rollback order
/// can be checked without a tty.
pub(crate) trait TerminalSteps {
    type Handle;

    fn raw_mode_on(&mut self) -> Result<()>;
    fn alternate_screen_on(&mut self) -> Result<()>;
    fn build(&mut self) -> Result<Self::Handle>;
    fn alternate_screen_off(&mut self) -> Result<()>;
    fn raw_mode_off(&mut self) -> Result<()>;
}

struct CrosstermSteps;

impl TerminalSteps for CrosstermSteps {
    type Handle = Terminal<Backend>;

    fn raw_mode_on(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")
    }

    fn alternate_screen_on(&mut self) -> Result<()> {
        execute!(stdout(), EnterAlternateScreen, Hide).context("failed to enter alternate screen")
    }

    fn build(&mut self) -> Result<Self::Handle> {
        Terminal::new(CrosstermBackend::new(stdout())).context("failed to open terminal")
    }

    fn alternate_screen_off(&mut self) -> Result<()> {
        execute!(stdout(), Show, LeaveAlternateScreen)
            .context("failed to leave alternate screen after setup error")
    }

    fn raw_mode_off(&mut self) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode after setup error")
    }
}

/// Runs the setup steps in order; when one fails, the steps already taken
/// are undone newest first and any undo failure is appended to the error.
pub(crate) fn acquire_with<S: TerminalSteps>(steps: &mut S) -> Result<S::Handle> {
    steps.raw_mode_on()?;

    if let Err(error) = steps.alternate_screen_on() {
        return Err(undo(steps, error, false));
    }

    steps.build().map_err(|error| undo(steps, error, true))
}

fn undo<S: TerminalSteps>(steps: &mut S, cause: anyhow::Error, screen_on: bool) -> anyhow::Error {
    let mut undo_errors = Vec::new();
    if screen_on && let Err(error) = steps.alternate_screen_off() {
        undo_errors.push(format!("{error:#}"));
    }
    if let Err(error) = steps.raw_mode_off() {
        undo_errors.push(format!("{error:#}"));
    }

    if undo_errors.is_empty() {
        return cause;
    }
    anyhow!(
        "{cause:#}\nrestoring the terminal also failed:\n{}",
        undo_errors.join("\n")
    )
}
