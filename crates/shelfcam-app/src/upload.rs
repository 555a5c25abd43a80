use log::{info, warn};
use shelfcam_core::dropbox::StoreError;
use shelfcam_core::remote_path::{destination_path, upload_root};
use shelfcam_core::session::{CaptureSession, CapturedImage};
use thiserror::Error;

use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFailureKind {
    Api,
    MissingSource,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UploadFailure {
    pub kind: UploadFailureKind,
    pub message: String,
}

impl UploadFailure {
    fn from_store(error: &StoreError) -> Self {
        match error {
            StoreError::Api { .. } => Self {
                kind: UploadFailureKind::Api,
                message: error.to_string(),
            },
            _ => Self {
                kind: UploadFailureKind::Unexpected,
                message: format!("unexpected upload error: {error}"),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    pub label: String,
    pub filename: String,
    pub destination: String,
    pub failure: Option<UploadFailure>,
}

impl UploadOutcome {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub root: String,
    pub outcomes: Vec<UploadOutcome>,
}

impl UploadReport {
    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.succeeded_count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn summary(&self) -> String {
        format!(
            "{} uploaded, {} failed",
            self.succeeded_count(),
            self.failed_count()
        )
    }
}

impl<'a> App<'a> {
    /// Uploads every pending image under the folder derived from
    /// `spreadsheet`, one at a time and in capture order.
    ///
    /// A failed image does not stop the batch. The session is cleared when
    /// every upload succeeded; otherwise only the failed images stay queued.
    pub fn upload_all(&self, session: &mut CaptureSession, spreadsheet: &str) -> UploadReport {
        let root = upload_root(spreadsheet);
        let mut outcomes = Vec::with_capacity(session.image_count());

        for (label, image) in session.pending() {
            let destination = destination_path(&root, image.row_number, &image.filename);
            info!("uploading {} to {destination}", image.filename);

            let failure = self.upload_one(image, &destination).err();
            match &failure {
                None => info!("uploaded {destination}"),
                Some(failure) => warn!("upload to {destination} failed: {failure}"),
            }

            outcomes.push(UploadOutcome {
                label: label.to_string(),
                filename: image.filename.clone(),
                destination,
                failure,
            });
        }

        let report = UploadReport { root, outcomes };
        if report.all_succeeded() {
            session.clear_all();
        } else {
            let failed = report
                .outcomes
                .iter()
                .filter(|outcome| !outcome.succeeded())
                .map(|outcome| (outcome.label.as_str(), outcome.filename.as_str()))
                .collect::<Vec<_>>();
            session.retain(|label, image| failed.contains(&(label, image.filename.as_str())));
        }

        report
    }

    fn upload_one(&self, image: &CapturedImage, destination: &str) -> Result<(), UploadFailure> {
        if image.data.is_empty() {
            return Err(UploadFailure {
                kind: UploadFailureKind::MissingSource,
                message: format!(
                    "image data for {} is missing",
                    image.filename
                ),
            });
        }

        self.store
            .upload(&image.data, destination)
            .map_err(|error| UploadFailure::from_store(&error))
    }
}
