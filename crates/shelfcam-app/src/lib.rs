mod browse;
mod capture;
mod upload;

use shelfcam_core::command_runner::CommandRunner;
use shelfcam_core::config::Settings;
use shelfcam_core::dropbox::RemoteStore;

pub use shelfcam_core::catalog::{Catalog, CatalogEntry};
pub use shelfcam_core::session::{CaptureSession, CapturedImage};
pub use upload::{UploadFailure, UploadFailureKind, UploadOutcome, UploadReport};

pub struct App<'a> {
    pub store: &'a dyn RemoteStore,
    pub runner: &'a dyn CommandRunner,
    pub settings: Settings,
}

impl<'a> App<'a> {
    pub fn new(store: &'a dyn RemoteStore, runner: &'a dyn CommandRunner, settings: Settings) -> Self {
        Self {
            store,
            runner,
            settings,
        }
    }

    pub fn root_folder(&self) -> String {
        self.settings.normalized_root()
    }
}
