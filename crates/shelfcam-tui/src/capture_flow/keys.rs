use std::path::Path;

use anyhow::Result;
use crossterm::event::{Event, KeyEvent};
use log::info;
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use crate::UiExit;
use crate::keymap;
use crate::ui::confirm::{Answer, Confirm, ConfirmSignal};
use crate::ui::filter_list::SelectSignal;

use super::{CaptureFlow, DiscardTarget, FlowSignal, ShelfOps, Step};

impl CaptureFlow {
    pub(super) fn on_key(&mut self, key: KeyEvent, ops: &dyn ShelfOps) -> Result<FlowSignal> {
        match self.step {
            Step::Spreadsheet => self.on_key_spreadsheet(key, ops),
            Step::Model => Ok(self.on_key_model(key)),
            Step::Capture => self.on_key_capture(key, ops),
            Step::ImportPath => self.on_key_import(key, ops),
            Step::ConfirmUpload => Ok(self.on_key_confirm_upload(key, ops)),
            Step::ConfirmDiscard(target) => Ok(self.on_key_confirm_discard(key, target)),
            Step::Report => Ok(self.on_key_report(key)),
        }
    }

    fn on_key_spreadsheet(&mut self, key: KeyEvent, ops: &dyn ShelfOps) -> Result<FlowSignal> {
        match self.spreadsheets.on_key(key) {
            SelectSignal::Continue => Ok(FlowSignal::Continue),
            SelectSignal::Back => Ok(FlowSignal::Exit(UiExit::Completed)),
            SelectSignal::Confirm => {
                let Some(path) = self.spreadsheets.selected_item().map(str::to_string) else {
                    return Ok(FlowSignal::Continue);
                };
                self.open_spreadsheet(ops, &path)?;
                Ok(FlowSignal::Continue)
            }
            SelectSignal::Unhandled(key) if keymap::is_refresh(key) => {
                self.refresh_spreadsheets(ops)?;
                Ok(FlowSignal::Continue)
            }
            SelectSignal::Unhandled(key) if keymap::is_quit(key) => {
                Ok(FlowSignal::Exit(UiExit::Completed))
            }
            SelectSignal::Unhandled(_) => Ok(FlowSignal::Continue),
        }
    }

    fn on_key_model(&mut self, key: KeyEvent) -> FlowSignal {
        match self.models.on_key(key) {
            SelectSignal::Continue => FlowSignal::Continue,
            SelectSignal::Back => {
                if self.session.has_any_images() {
                    self.ask_discard(DiscardTarget::Spreadsheets);
                } else {
                    self.leave_spreadsheet();
                }
                FlowSignal::Continue
            }
            SelectSignal::Confirm => {
                let entry = self
                    .models
                    .selected_item()
                    .and_then(|label| self.catalog.get(label))
                    .cloned();
                if let Some(entry) = entry {
                    self.entry = Some(entry);
                    self.status = None;
                    self.step = Step::Capture;
                }
                FlowSignal::Continue
            }
            SelectSignal::Unhandled(key) if keymap::is_quit(key) => self.quit(),
            SelectSignal::Unhandled(_) => FlowSignal::Continue,
        }
    }

    fn on_key_capture(&mut self, key: KeyEvent, ops: &dyn ShelfOps) -> Result<FlowSignal> {
        if keymap::is_back(key) {
            self.step = Step::Model;
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_quit(key) {
            return Ok(self.quit());
        }

        if keymap::is_up(key) {
            self.pending_selected = self.pending_selected.saturating_sub(1);
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_down(key) {
            if self.pending_selected + 1 < self.session.image_count() {
                self.pending_selected += 1;
            }
            return Ok(FlowSignal::Continue);
        }

        let Some(entry) = self.entry.clone() else {
            self.step = Step::Model;
            return Ok(FlowSignal::Continue);
        };

        if keymap::is_capture(key) {
            let filename = ops.capture(&mut self.session, &entry)?;
            self.status = Some(format!("Captured {filename}."));
            self.select_last_pending(&entry.label);
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_import(key) {
            self.import_input = Input::default();
            self.step = Step::ImportPath;
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_delete(key) {
            self.delete_selected();
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_upload(key) {
            if self.session.has_any_images() {
                self.upload_choice = Confirm::defaulting_to(Answer::Yes);
                self.step = Step::ConfirmUpload;
            } else {
                self.status = Some("Nothing to upload.".to_string());
            }
        }

        Ok(FlowSignal::Continue)
    }

    fn on_key_import(&mut self, key: KeyEvent, ops: &dyn ShelfOps) -> Result<FlowSignal> {
        if keymap::is_back(key) {
            self.step = Step::Capture;
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_confirm(key) {
            let value = self.import_input.value().trim().to_string();
            let Some(entry) = self.entry.clone() else {
                self.step = Step::Model;
                return Ok(FlowSignal::Continue);
            };
            if value.is_empty() {
                return Ok(FlowSignal::Continue);
            }

            let filename = ops.import(&mut self.session, &entry, Path::new(&value))?;
            self.status = Some(format!("Imported {value} as {filename}."));
            self.select_last_pending(&entry.label);
            self.step = Step::Capture;
            return Ok(FlowSignal::Continue);
        }

        self.import_input.handle_event(&Event::Key(key));
        Ok(FlowSignal::Continue)
    }

    fn on_key_confirm_upload(&mut self, key: KeyEvent, ops: &dyn ShelfOps) -> FlowSignal {
        match self.upload_choice.on_key(key) {
            ConfirmSignal::Pending => {}
            ConfirmSignal::Back | ConfirmSignal::Answered(Answer::No) => {
                self.step = Step::Capture;
            }
            ConfirmSignal::Answered(Answer::Yes) => {
                let Some(spreadsheet) = self.spreadsheet.clone() else {
                    self.step = Step::Spreadsheet;
                    return FlowSignal::Continue;
                };
                let report = ops.upload_all(&mut self.session, &spreadsheet);
                info!("upload finished: {}", report.summary());
                self.status = Some(report.summary());
                self.report = Some(report);
                self.clamp_pending_selection();
                self.step = Step::Report;
            }
        }
        FlowSignal::Continue
    }

    fn on_key_confirm_discard(&mut self, key: KeyEvent, target: DiscardTarget) -> FlowSignal {
        match self.discard_choice.on_key(key) {
            ConfirmSignal::Pending => FlowSignal::Continue,
            ConfirmSignal::Back | ConfirmSignal::Answered(Answer::No) => {
                self.step = self.discard_return;
                FlowSignal::Continue
            }
            ConfirmSignal::Answered(Answer::Yes) => match target {
                DiscardTarget::Spreadsheets => {
                    self.leave_spreadsheet();
                    FlowSignal::Continue
                }
                DiscardTarget::Quit => {
                    self.session.clear_all();
                    FlowSignal::Exit(UiExit::Completed)
                }
            },
        }
    }

    fn on_key_report(&mut self, key: KeyEvent) -> FlowSignal {
        if keymap::is_quit(key) {
            return self.quit();
        }

        if keymap::is_back(key) || keymap::is_confirm(key) {
            self.step = Step::Capture;
        }

        FlowSignal::Continue
    }

    fn quit(&mut self) -> FlowSignal {
        if self.session.has_any_images() {
            self.ask_discard(DiscardTarget::Quit);
            FlowSignal::Continue
        } else {
            FlowSignal::Exit(UiExit::Completed)
        }
    }

    fn delete_selected(&mut self) {
        let Some(row) = self.pending_rows().into_iter().nth(self.pending_selected) else {
            return;
        };

        if let Some(removed) = self.session.remove_image(&row.label, row.index) {
            info!("removed {} from pending images", removed.filename);
            self.status = Some(format!("Deleted {}.", removed.filename));
        }
        self.clamp_pending_selection();
    }

    fn select_last_pending(&mut self, label: &str) {
        let rows = self.pending_rows();
        if let Some(position) = rows.iter().rposition(|row| row.label == label) {
            self.pending_selected = position;
        }
    }
}
