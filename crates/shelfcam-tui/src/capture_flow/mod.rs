mod keys;
mod render;

use std::path::Path;

use anyhow::Result;
use crossterm::event::KeyEvent;
use shelfcam_app::{App, Catalog, CatalogEntry, CaptureSession, UploadReport};
use tui_input::Input;

use crate::UiExit;
use crate::ui::confirm::{Answer, Confirm};
use crate::ui::filter_list::FilterList;

pub(crate) trait ShelfOps {
    fn list_spreadsheets(&self) -> Result<Vec<String>>;
    fn load_catalog(&self, spreadsheet: &str) -> Result<Catalog>;
    fn capture(&self, session: &mut CaptureSession, entry: &CatalogEntry) -> Result<String>;
    fn import(
        &self,
        session: &mut CaptureSession,
        entry: &CatalogEntry,
        path: &Path,
    ) -> Result<String>;
    fn upload_all(&self, session: &mut CaptureSession, spreadsheet: &str) -> UploadReport;
}

impl<'a> ShelfOps for App<'a> {
    fn list_spreadsheets(&self) -> Result<Vec<String>> {
        App::list_spreadsheets(self)
    }

    fn load_catalog(&self, spreadsheet: &str) -> Result<Catalog> {
        App::load_catalog(self, spreadsheet)
    }

    fn capture(&self, session: &mut CaptureSession, entry: &CatalogEntry) -> Result<String> {
        App::capture(self, session, entry)
    }

    fn import(
        &self,
        session: &mut CaptureSession,
        entry: &CatalogEntry,
        path: &Path,
    ) -> Result<String> {
        App::import(self, session, entry, path)
    }

    fn upload_all(&self, session: &mut CaptureSession, spreadsheet: &str) -> UploadReport {
        App::upload_all(self, session, spreadsheet)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Spreadsheet,
    Model,
    Capture,
    ImportPath,
    ConfirmUpload,
    ConfirmDiscard(DiscardTarget),
    Report,
}

/// Where the flow goes once the user agrees to drop pending images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiscardTarget {
    Spreadsheets,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowSignal {
    Continue,
    Exit(UiExit),
}

/// One line of the pending-images list: which label it belongs to and its
/// position inside that label's sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRow {
    label: String,
    index: usize,
    filename: String,
    row_number: u32,
    bytes: usize,
}

/// Spreadsheet, model and capture selection plus the images queued for
/// upload. The capture session lives here for the whole interactive run.
#[derive(Debug)]
struct CaptureFlow {
    step: Step,
    root_folder: String,
    spreadsheets: FilterList,
    spreadsheet: Option<String>,
    catalog: Catalog,
    models: FilterList,
    entry: Option<CatalogEntry>,
    session: CaptureSession,
    pending_selected: usize,
    import_input: Input,
    upload_choice: Confirm,
    discard_choice: Confirm,
    discard_return: Step,
    report: Option<UploadReport>,
    status: Option<String>,
}

pub(crate) struct CaptureScreen {
    flow: CaptureFlow,
}

impl CaptureScreen {
    pub(crate) fn new(root_folder: String) -> Self {
        Self {
            flow: CaptureFlow::new(root_folder),
        }
    }

    pub(crate) fn refresh(&mut self, app: &App<'_>) -> Result<()> {
        self.flow.refresh_spreadsheets(app)
    }

    pub(crate) fn render(&self, frame: &mut ratatui::Frame<'_>) {
        self.flow.render(frame);
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, app: &App<'_>) -> Result<Option<UiExit>> {
        match self.flow.on_key(key, app)? {
            FlowSignal::Continue => Ok(None),
            FlowSignal::Exit(exit) => Ok(Some(exit)),
        }
    }
}

impl CaptureFlow {
    fn new(root_folder: String) -> Self {
        Self {
            step: Step::Spreadsheet,
            root_folder,
            spreadsheets: FilterList::new(Vec::new()),
            spreadsheet: None,
            catalog: Catalog::default(),
            models: FilterList::new(Vec::new()),
            entry: None,
            session: CaptureSession::new(),
            pending_selected: 0,
            import_input: Input::default(),
            upload_choice: Confirm::defaulting_to(Answer::Yes),
            discard_choice: Confirm::defaulting_to(Answer::No),
            discard_return: Step::Spreadsheet,
            report: None,
            status: None,
        }
    }

    /// Reloads the spreadsheet list. A failed listing leaves the list empty.
    fn refresh_spreadsheets(&mut self, ops: &dyn ShelfOps) -> Result<()> {
        match ops.list_spreadsheets() {
            Ok(paths) => {
                self.status = Some(format!("Found {} spreadsheets.", paths.len()));
                self.spreadsheets.set_items(paths);
                Ok(())
            }
            Err(error) => {
                self.spreadsheets.set_items(Vec::new());
                self.status = None;
                Err(error)
            }
        }
    }

    fn open_spreadsheet(&mut self, ops: &dyn ShelfOps, path: &str) -> Result<()> {
        let catalog = ops.load_catalog(path)?;
        let labels = catalog
            .entries()
            .map(|entry| entry.label.clone())
            .collect::<Vec<_>>();

        self.status = Some(match catalog.overwritten() {
            0 => format!("{} models.", labels.len()),
            hidden => format!(
                "{} models. {hidden} rows repeat a label and only the last one is shown.",
                labels.len()
            ),
        });
        self.models = FilterList::new(labels);
        self.catalog = catalog;
        self.spreadsheet = Some(path.to_string());
        self.entry = None;
        self.step = Step::Model;
        Ok(())
    }

    fn leave_spreadsheet(&mut self) {
        self.session.clear_all();
        self.pending_selected = 0;
        self.spreadsheet = None;
        self.catalog = Catalog::default();
        self.models = FilterList::new(Vec::new());
        self.entry = None;
        self.report = None;
        self.status = None;
        self.step = Step::Spreadsheet;
    }

    fn ask_discard(&mut self, target: DiscardTarget) {
        self.discard_choice = Confirm::defaulting_to(Answer::No);
        self.discard_return = self.step;
        self.step = Step::ConfirmDiscard(target);
    }

    fn pending_rows(&self) -> Vec<PendingRow> {
        let mut rows = Vec::with_capacity(self.session.image_count());
        for label in self.session.labels() {
            for (index, image) in self.session.images(label).iter().enumerate() {
                rows.push(PendingRow {
                    label: label.to_string(),
                    index,
                    filename: image.filename.clone(),
                    row_number: image.row_number,
                    bytes: image.data.len(),
                });
            }
        }
        rows
    }

    fn clamp_pending_selection(&mut self) {
        let count = self.session.image_count();
        if count == 0 {
            self.pending_selected = 0;
        } else if self.pending_selected >= count {
            self.pending_selected = count - 1;
        }
    }
}
