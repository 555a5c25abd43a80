mod capture_flow;
mod keymap;
mod terminal;
mod theme;
mod ui;

use anyhow::{Context, Result};
use capture_flow::CaptureScreen;
use crossterm::event::{self, Event, KeyEventKind};
use log::warn;
use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use shelfcam_app::App;

use crate::terminal::TerminalGuard;
use crate::ui::modal::error_modal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiExit {
    Completed,
    Canceled,
}

/// Runs the interactive capture loop until the user quits.
///
/// Operation failures never end the loop: they are shown in an error modal
/// and the screen keeps the state it had before the failed operation.
pub fn run_root(app: &App<'_>) -> Result<UiExit> {
    let mut guard = TerminalGuard::acquire()?;
    let mut screen = CaptureScreen::new(app.root_folder());
    let mut failure = screen.refresh(app).err().map(describe_failure);

    loop {
        guard.draw(|frame| {
            screen.render(frame);
            if let Some(message) = &failure {
                render_failure(frame, message);
            }
        })?;

        let key = match event::read().context("failed to read terminal input")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => key,
            Event::Resize(..) => {
                guard.resize()?;
                continue;
            }
            _ => continue,
        };

        if keymap::is_interrupt(key) {
            return Ok(UiExit::Canceled);
        }

        if failure.is_some() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                failure = None;
            }
            continue;
        }

        match screen.on_key(key, app) {
            Ok(None) => {}
            Ok(Some(exit)) => return Ok(exit),
            Err(error) => failure = Some(describe_failure(error)),
        }
    }
}

fn describe_failure(error: anyhow::Error) -> String {
    warn!("operation failed: {error:#}");
    format!("{error:#}")
}

fn render_failure(frame: &mut Frame<'_>, message: &str) {
    error_modal(&format!("Operation failed.\n\n{message}"), "Enter/Esc: continue")
        .size(88, 60)
        .render(frame);
}

/// The middle `percent_x` by `percent_y` part of `area`.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [band] = Layout::vertical([Constraint::Percentage(percent_y.min(100))])
        .flex(Flex::Center)
        .areas(area);
    let [middle] = Layout::horizontal([Constraint::Percentage(percent_x.min(100))])
        .flex(Flex::Center)
        .areas(band);
    middle
}
