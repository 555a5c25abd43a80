use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::Clear;

use crate::centered_rect;
use crate::theme;
use crate::ui::text::{key_hint_height, key_hint_paragraph, wrapped_paragraph};

/// A centered box drawn over the current screen, with an optional key hint
/// along its bottom edge.
pub(crate) struct Modal<'a> {
    title: Line<'a>,
    body: Text<'a>,
    hint: Option<&'a str>,
    width_pct: u16,
    height_pct: u16,
}

impl<'a> Modal<'a> {
    pub(crate) fn new(title: &'a str, title_style: Style, body: Text<'a>) -> Self {
        Self {
            title: Line::from(Span::styled(title, title_style)),
            body,
            hint: None,
            width_pct: 70,
            height_pct: 40,
        }
    }

    pub(crate) fn hint(mut self, hint: &'a str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub(crate) fn size(mut self, width_pct: u16, height_pct: u16) -> Self {
        self.width_pct = width_pct;
        self.height_pct = height_pct;
        self
    }

    pub(crate) fn render(self, frame: &mut Frame<'_>) {
        let area = centered_rect(self.width_pct, self.height_pct, frame.area());
        let (body_area, hint_area) = split_for_hint(area, self.hint);

        frame.render_widget(Clear, area);
        frame.render_widget(
            wrapped_paragraph(self.body).block(theme::chrome(self.title)),
            body_area,
        );
        if let (Some(hint), Some(hint_area)) = (self.hint, hint_area) {
            frame.render_widget(key_hint_paragraph(hint).block(theme::key_block()), hint_area);
        }
    }
}

fn split_for_hint(area: Rect, hint: Option<&str>) -> (Rect, Option<Rect>) {
    let Some(hint) = hint else {
        return (area, None);
    };
    let [body, footer] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(key_hint_height(area.width, hint)),
    ])
    .areas(area);
    (body, Some(footer))
}

/// An "Error" modal whose body is `message`, one text line per message line.
pub(crate) fn error_modal<'a>(message: &str, hint: &'a str) -> Modal<'a> {
    Modal::new("Error", theme::error_prompt(), message_text(message)).hint(hint)
}

fn message_text(message: &str) -> Text<'static> {
    message
        .trim_end()
        .lines()
        .map(|line| Line::from(line.to_string()))
        .collect::<Vec<_>>()
        .into()
}
