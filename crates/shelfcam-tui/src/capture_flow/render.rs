use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use shelfcam_core::capture::inspect_image;

use super::{CaptureFlow, DiscardTarget, PendingRow, Step};
use crate::theme;
use crate::ui::modal::Modal;
use crate::ui::text::{
    HintSet, REPORT_HINTS, focus_line, highlighted_label_value_line, key_hint_height,
    key_hint_paragraph, label_value_line, wrapped_paragraph,
};

const FILTER_OPEN_HINTS: HintSet = HintSet::new(
    "Type: filter    Enter: open    Tab/Esc: list focus",
    "Type filter    Enter open    Tab/Esc list",
    "Type | Enter open | Esc list",
);
const SPREADSHEET_HINTS: HintSet = HintSet::new(
    "Enter: open    Up/Down or j/k: move    /: filter    r: refresh    Esc/q: quit",
    "Enter: open    j/k: move    /: filter    r: refresh    q: quit",
    "Enter | j/k | / | r | q",
);
const FILTER_CHOOSE_HINTS: HintSet = HintSet::new(
    "Type: filter    Enter: choose    Tab/Esc: list focus",
    "Type filter    Enter choose    Tab/Esc list",
    "Type | Enter choose | Esc list",
);
const MODEL_HINTS: HintSet = HintSet::new(
    "Enter: choose    Up/Down or j/k: move    /: filter    Esc: spreadsheets    q: quit",
    "Enter: choose    j/k: move    /: filter    Esc: back    q: quit",
    "Enter | j/k | / | Esc | q",
);
const CAPTURE_HINTS: HintSet = HintSet::new(
    "c: capture    i: import file    j/k: move    d: delete    u: upload all    Esc: models    q: quit",
    "c: capture    i: import    d: delete    u: upload    Esc: back    q: quit",
    "c | i | d | u | Esc | q",
);

impl CaptureFlow {
    pub(super) fn render(&self, frame: &mut Frame<'_>) {
        match self.step {
            Step::Spreadsheet => self.render_spreadsheets(frame),
            Step::Model => self.render_models(frame),
            Step::Capture => self.render_capture(frame),
            Step::ImportPath => {
                self.render_capture(frame);
                self.render_import(frame);
            }
            Step::ConfirmUpload => {
                self.render_capture(frame);
                self.render_confirm_upload(frame);
            }
            Step::ConfirmDiscard(target) => {
                match self.discard_return {
                    Step::Model => self.render_models(frame),
                    Step::Report => self.render_report(frame),
                    _ => self.render_capture(frame),
                }
                self.render_confirm_discard(frame, target);
            }
            Step::Report => self.render_report(frame),
        }
    }

    fn render_spreadsheets(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let hints = if self.spreadsheets.filter_focused() {
            FILTER_OPEN_HINTS
        } else {
            SPREADSHEET_HINTS
        };
        let key_text = hints.fit(area.width);
        let root = if self.root_folder.is_empty() {
            "/"
        } else {
            self.root_folder.as_str()
        };
        let header = Text::from(vec![
            Line::from("shelfcam"),
            label_value_line("Dropbox root", root),
            focus_line("Choose a spreadsheet"),
        ]);

        let [header_area, filter_area, list_area, status_area, footer] =
            self.list_layout(area, key_text);
        frame.render_widget(
            wrapped_paragraph(header).block(theme::chrome("Spreadsheets")),
            header_area,
        );
        self.spreadsheets.render_filter(frame, filter_area);
        self.spreadsheets.render_list(
            frame,
            list_area,
            Line::from(format!("Spreadsheets ({})", self.spreadsheets.len())),
            "No spreadsheets found. Press r to refresh.",
            Color::Cyan,
        );
        self.render_status(frame, status_area);
        frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);
    }

    fn render_models(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let hints = if self.models.filter_focused() {
            FILTER_CHOOSE_HINTS
        } else {
            MODEL_HINTS
        };
        let key_text = hints.fit(area.width);
        let header = Text::from(vec![
            label_value_line("Spreadsheet", self.spreadsheet.clone().unwrap_or_default()),
            label_value_line("Pending images", self.session.image_count().to_string()),
            focus_line("Choose a model"),
        ]);

        let [header_area, filter_area, list_area, status_area, footer] =
            self.list_layout(area, key_text);
        frame.render_widget(
            wrapped_paragraph(header).block(theme::chrome("Models")),
            header_area,
        );
        self.models.render_filter(frame, filter_area);
        self.models.render_list(
            frame,
            list_area,
            Line::from(format!("Models ({})", self.models.len())),
            "No rows with a Model value.",
            Color::Yellow,
        );
        self.render_status(frame, status_area);
        frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);
    }

    fn list_layout(&self, area: Rect, key_text: &str) -> [Rect; 5] {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(key_hint_height(area.width, key_text)),
            ])
            .areas(area)
    }

    fn render_capture(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = CAPTURE_HINTS.fit(area.width);
        let [header_area, list_area, status_area, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(key_hint_height(area.width, key_text)),
            ])
            .areas(area);

        let header = match &self.entry {
            Some(entry) => Text::from(vec![
                label_value_line("Spreadsheet", self.spreadsheet.clone().unwrap_or_default()),
                label_value_line("Model", entry.model.clone()),
                label_value_line("Row", entry.row_number.to_string()),
                focus_line(entry.label.clone()),
            ]),
            None => Text::from(focus_line("No model selected")),
        };
        frame.render_widget(
            wrapped_paragraph(header).block(theme::chrome("Capture")),
            header_area,
        );

        self.render_pending(frame, list_area);
        self.render_status(frame, status_area);
        frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);
    }

    /// Pending images grouped under their label, with the image size read
    /// from the encoded header.
    fn render_pending(&self, frame: &mut Frame<'_>, area: Rect) {
        let rows = self.pending_rows();
        let title = Line::from(format!("Pending images ({})", rows.len()));
        if rows.is_empty() {
            let empty = Paragraph::new("No images yet. Press c to capture or i to import.")
                .block(theme::chrome(title));
            frame.render_widget(empty, area);
            return;
        }

        let mut items = Vec::new();
        let mut selected_item = 0;
        let mut current_label: Option<&str> = None;
        for (position, row) in rows.iter().enumerate() {
            if current_label != Some(row.label.as_str()) {
                items.push(ListItem::new(Line::from(Span::styled(
                    row.label.clone(),
                    theme::group_heading(),
                ))));
                current_label = Some(row.label.as_str());
            }
            if position == self.pending_selected {
                selected_item = items.len();
            }
            items.push(ListItem::new(format!("  {}", self.pending_line(row))));
        }

        let list = List::new(items)
            .block(theme::chrome(title))
            .highlight_style(theme::list_highlight(Color::Magenta))
            .highlight_symbol(">> ");
        let mut state = ListState::default();
        state.select(Some(selected_item));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn pending_line(&self, row: &PendingRow) -> String {
        let size = self
            .session
            .images(&row.label)
            .get(row.index)
            .and_then(|image| inspect_image(&image.data).ok())
            .map(|info| format!("{}x{}", info.width, info.height))
            .unwrap_or_else(|| "unreadable".to_string());
        format!(
            "{}    row {}    {size}    {} bytes",
            row.filename, row.row_number, row.bytes
        )
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let status = self.status.clone().unwrap_or_default();
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(status, theme::secondary_text()))),
            area,
        );
    }

    fn render_import(&self, frame: &mut Frame<'_>) {
        let text = Text::from(vec![
            Line::from("Path of an image file to queue for this model:"),
            Line::from(""),
            highlighted_label_value_line("File", self.import_input.value()),
        ]);
        Modal::new("Import image", theme::focus_prompt(), text)
            .hint("Type: path    Enter: import    Esc: back")
            .size(80, 30)
            .render(frame);
    }

    fn render_confirm_upload(&self, frame: &mut Frame<'_>) {
        let destination = self
            .spreadsheet
            .as_deref()
            .map(shelfcam_core::remote_path::upload_root)
            .unwrap_or_default();
        let text = Text::from(vec![
            label_value_line("Images", self.session.image_count().to_string()),
            label_value_line("Destination", destination),
            Line::from(""),
            highlighted_label_value_line("Current selection", self.upload_choice.highlighted().label()),
        ]);
        Modal::new("Upload all pending images?", theme::focus_prompt(), text)
            .hint("Space: toggle    Enter: continue    y/n    Esc: back")
            .size(70, 40)
            .render(frame);
    }

    fn render_confirm_discard(&self, frame: &mut Frame<'_>, target: DiscardTarget) {
        let title = match target {
            DiscardTarget::Spreadsheets => "Leave this spreadsheet?",
            DiscardTarget::Quit => "Quit shelfcam?",
        };
        let text = Text::from(vec![
            Line::from(format!(
                "{} pending images have not been uploaded and will be discarded.",
                self.session.image_count()
            )),
            Line::from(""),
            highlighted_label_value_line("Current selection", self.discard_choice.highlighted().label()),
        ]);
        Modal::new(title, theme::error_prompt(), text)
            .hint("Space: toggle    Enter: continue    y/n    Esc: back")
            .size(70, 40)
            .render(frame);
    }

    fn render_report(&self, frame: &mut Frame<'_>) {
        let Some(report) = &self.report else {
            self.render_capture(frame);
            return;
        };

        let mut lines = vec![
            label_value_line("Destination", report.root.clone()),
            label_value_line("Result", report.summary()),
            Line::from(""),
        ];
        for outcome in &report.outcomes {
            match &outcome.failure {
                None => lines.push(Line::from(vec![
                    Span::styled("uploaded  ", theme::success_prompt()),
                    Span::raw(outcome.destination.clone()),
                ])),
                Some(failure) => {
                    lines.push(Line::from(vec![
                        Span::styled("failed    ", theme::error_prompt()),
                        Span::raw(outcome.destination.clone()),
                    ]));
                    lines.push(Line::from(format!("          {failure}")));
                }
            }
        }
        if !report.all_succeeded() {
            lines.push(Line::from(""));
            lines.push(Line::from(
                "Failed images stay pending. Press u on the capture screen to retry.",
            ));
        }

        let (title, style) = if report.all_succeeded() {
            ("Upload complete", theme::success_prompt())
        } else {
            ("Upload finished with errors", theme::error_prompt())
        };
        Modal::new(title, style, Text::from(lines))
            .hint(REPORT_HINTS.fit(frame.area().width))
            .size(90, 80)
            .render(frame);
    }
}
