use crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Margin, Rect};
use ratatui::style::Color;
use ratatui::text::Line;
use ratatui::widgets::{
    List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::keymap;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectSignal {
    Continue,
    Back,
    Confirm,
    /// A key the list does not handle itself, left to the owning step.
    Unhandled(KeyEvent),
}

/// A list of strings narrowed by a case-insensitive substring filter.
///
/// Tab or `/` moves focus between the list and the filter input; while the
/// filter has focus every printable key edits the query.
#[derive(Debug)]
pub(crate) struct FilterList {
    items: Vec<String>,
    filtered: Vec<usize>,
    selected: usize,
    query: Input,
    filter_focused: bool,
}

impl FilterList {
    pub(crate) fn new(items: Vec<String>) -> Self {
        let mut list = Self {
            items,
            filtered: Vec::new(),
            selected: 0,
            query: Input::default(),
            filter_focused: false,
        };
        list.refresh_filtered();
        list
    }

    pub(crate) fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.refresh_filtered();
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> SelectSignal {
        if self.filter_focused {
            self.on_filter_key(key)
        } else {
            self.on_list_key(key)
        }
    }

    fn on_filter_key(&mut self, key: KeyEvent) -> SelectSignal {
        match key.code {
            KeyCode::Esc | KeyCode::Tab => {
                self.filter_focused = false;
                SelectSignal::Continue
            }
            KeyCode::Enter => {
                self.filter_focused = false;
                SelectSignal::Confirm
            }
            _ => {
                if self.query.handle_event(&Event::Key(key)).is_some() {
                    self.refresh_filtered();
                }
                SelectSignal::Continue
            }
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) -> SelectSignal {
        let last = self.filtered.len().saturating_sub(1);
        match key {
            key if keymap::is_back(key) => SelectSignal::Back,
            key if keymap::is_confirm(key) => SelectSignal::Confirm,
            key if keymap::is_filter_focus(key) => {
                self.filter_focused = true;
                SelectSignal::Continue
            }
            key if keymap::is_up(key) => {
                self.selected = self.selected.saturating_sub(1);
                SelectSignal::Continue
            }
            key if keymap::is_down(key) => {
                self.selected = (self.selected + 1).min(last);
                SelectSignal::Continue
            }
            key => SelectSignal::Unhandled(key),
        }
    }

    pub(crate) fn selected_item(&self) -> Option<&str> {
        let index = *self.filtered.get(self.selected)?;
        self.items.get(index).map(String::as_str)
    }

    pub(crate) fn filter_focused(&self) -> bool {
        self.filter_focused
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub(crate) fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub(crate) fn render_filter(&self, frame: &mut Frame<'_>, area: Rect) {
        let title = if self.filter_focused {
            crate::ui::text::focus_line("Filter")
        } else {
            Line::from("Filter (/ to focus)")
        };
        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.query.visual_scroll(width);
        let paragraph = Paragraph::new(self.query.value())
            .scroll((0, scroll as u16))
            .block(theme::chrome(title));
        frame.render_widget(paragraph, area);

        if !self.filter_focused || width == 0 {
            return;
        }

        let visual = self.query.visual_cursor();
        let relative = visual.saturating_sub(scroll).min(width.saturating_sub(1));
        frame.set_cursor_position((area.x + 1 + relative as u16, area.y + 1));
    }

    pub(crate) fn render_list(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        title: Line<'_>,
        empty_message: &str,
        highlight: Color,
    ) {
        if self.filtered.is_empty() {
            let empty = Paragraph::new(empty_message.to_string()).block(theme::chrome(title));
            frame.render_widget(empty, area);
            return;
        }

        let items = self
            .filtered
            .iter()
            .filter_map(|index| self.items.get(*index))
            .map(|item| ListItem::new(item.clone()))
            .collect::<Vec<_>>();
        let list = List::new(items)
            .block(theme::chrome(title))
            .highlight_style(theme::list_highlight(highlight))
            .highlight_symbol(">> ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);

        let viewport = area.height.saturating_sub(2) as usize;
        let mut scrollbar_state = ScrollbarState::new(self.filtered.len())
            .position(self.selected)
            .viewport_content_length(viewport);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }

    fn refresh_filtered(&mut self) {
        let query = self.query.value().trim().to_lowercase();
        self.filtered = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| query.is_empty() || item.to_lowercase().contains(&query))
            .map(|(index, _)| index)
            .collect();

        self.selected = self.selected.min(self.filtered.len().saturating_sub(1));
    }
}
