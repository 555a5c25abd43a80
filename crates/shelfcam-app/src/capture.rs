use std::path::Path;

use anyhow::{Context, Result};
use shelfcam_core::capture::{capture_from_camera, read_image_file};
use shelfcam_core::catalog::CatalogEntry;
use shelfcam_core::session::CaptureSession;

use crate::App;

impl<'a> App<'a> {
    /// Takes a photo with the configured camera program and queues it under
    /// the entry's label. Returns the generated filename.
    pub fn capture(&self, session: &mut CaptureSession, entry: &CatalogEntry) -> Result<String> {
        let data = capture_from_camera(self.runner, &self.settings.capture)
            .with_context(|| format!("failed to capture an image for {}", entry.model))?;
        Ok(queue(session, entry, data))
    }

    /// Queues an existing image file under the entry's label.
    pub fn import(
        &self,
        session: &mut CaptureSession,
        entry: &CatalogEntry,
        path: &Path,
    ) -> Result<String> {
        let data = read_image_file(path)
            .with_context(|| format!("failed to import an image for {}", entry.model))?;
        Ok(queue(session, entry, data))
    }
}

fn queue(session: &mut CaptureSession, entry: &CatalogEntry, data: Vec<u8>) -> String {
    let image = session.add_image(&entry.label, data, entry.row_number, &entry.model);
    log::info!("queued {} for row {}", image.filename, image.row_number);
    image.filename.clone()
}
