use anyhow::{Context, Result};
use log::info;
use shelfcam_core::catalog::{Catalog, decode_workbook};
use shelfcam_core::listing;

use crate::App;

impl<'a> App<'a> {
    pub fn list_spreadsheets(&self) -> Result<Vec<String>> {
        let root = self.root_folder();
        let paths = listing::list_spreadsheets(self.store, &root).with_context(|| {
            let shown = if root.is_empty() { "/" } else { root.as_str() };
            format!("failed to list spreadsheets under {shown}")
        })?;
        info!("listed {} spreadsheets", paths.len());
        Ok(paths)
    }

    /// Downloads one spreadsheet and builds its catalog. An empty file gives
    /// an empty catalog.
    pub fn load_catalog(&self, spreadsheet: &str) -> Result<Catalog> {
        let bytes = self
            .store
            .download(spreadsheet)
            .with_context(|| format!("failed to download {spreadsheet}"))?;
        if bytes.is_empty() {
            return Ok(Catalog::default());
        }

        let sheets = decode_workbook(&bytes)
            .with_context(|| format!("failed to read spreadsheet {spreadsheet}"))?;
        let catalog = Catalog::from_sheets(&sheets);
        info!(
            "loaded {} catalog entries from {spreadsheet} ({} sheets)",
            catalog.len(),
            sheets.len()
        );
        Ok(catalog)
    }
}
