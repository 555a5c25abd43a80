use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

use crate::theme;

/// One key hint written at three lengths; the screen width picks which one
/// is shown.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HintSet {
    full: &'static str,
    medium: &'static str,
    compact: &'static str,
}

impl HintSet {
    pub(crate) const fn new(full: &'static str, medium: &'static str, compact: &'static str) -> Self {
        Self {
            full,
            medium,
            compact,
        }
    }

    pub(crate) fn fit(&self, width: u16) -> &'static str {
        match width {
            110.. => self.full,
            78..=109 => self.medium,
            _ => self.compact,
        }
    }
}

pub(crate) const REPORT_HINTS: HintSet = HintSet::new(
    "Enter/Esc: back to capture    q: quit shelfcam",
    "Enter/Esc: back    q: quit",
    "Enter/Esc back | q quit",
);

pub(crate) fn wrapped_paragraph<'a>(text: impl Into<Text<'a>>) -> Paragraph<'a> {
    Paragraph::new(text).wrap(Wrap { trim: false })
}

pub(crate) fn key_hint_paragraph<'a>(text: impl Into<Text<'a>>) -> Paragraph<'a> {
    wrapped_paragraph(text).alignment(Alignment::Center)
}

/// Rows needed by a bordered hint block showing `text` at `width` columns.
pub(crate) fn key_hint_height(width: u16, text: &str) -> u16 {
    let inner = usize::from(width.saturating_sub(2)).max(1);
    let rows: usize = text.lines().map(|line| line_rows(line, inner)).sum();
    u16::try_from(rows.max(1)).unwrap_or(u16::MAX).saturating_add(2)
}

fn line_rows(line: &str, width: usize) -> usize {
    line.chars().count().div_ceil(width).max(1)
}

pub(crate) fn focus_line(message: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(message.into(), theme::focus_prompt()))
}

pub(crate) fn label_value_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), theme::secondary_text()),
        Span::raw(value.into()),
    ])
}

/// Like [`label_value_line`], with the value underlined to mark the current
/// answer of a prompt.
pub(crate) fn highlighted_label_value_line(label: &str, value: impl Into<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), theme::focus_prompt()),
        Span::styled(value.into(), Style::new().add_modifier(Modifier::UNDERLINED)),
    ])
}
