use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, ContentArrangement, Table};
use log::info;
use shelfcam_app::{App, Catalog};
use shelfcam_core::command_runner::SystemCommandRunner;
use shelfcam_core::config::{load_settings, load_token, resolve_settings_path};
use shelfcam_core::doctor::{DoctorReport, run_doctor};
use shelfcam_core::dropbox::DropboxClient;

use crate::cli::{Cli, Command};

/// Resolves configuration and runs one command. Only `doctor` works without
/// a Dropbox token.
pub fn run(cli: Cli, cwd: &Path) -> Result<()> {
    let settings_path = resolve_settings_path(cli.settings.as_deref(), cwd)?;

    match cli.command {
        Some(Command::Doctor) => {
            print_doctor_report(&run_doctor(&settings_path, cwd));
            Ok(())
        }
        Some(Command::Sheets) => run_with_deps(&settings_path, cwd, run_sheets_command),
        Some(Command::Catalog { path }) => {
            run_with_deps(&settings_path, cwd, |app| run_catalog_command(app, &path))
        }
        None => run_with_deps(&settings_path, cwd, run_root_command),
    }
}

/// Builds the Dropbox client, process runner and `App`, then hands the app
/// to `command`. A missing token stops here, before any network call.
fn run_with_deps<F>(settings_path: &Path, cwd: &Path, command: F) -> Result<()>
where
    F: FnOnce(&App<'_>) -> Result<()>,
{
    let token = load_token(cwd)?;
    let settings = load_settings(settings_path)?;
    info!("using settings from {}", settings_path.display());

    let store = DropboxClient::new(token).context("failed to create Dropbox client")?;
    let runner = SystemCommandRunner::new();
    let app = App::new(&store, &runner, settings);

    command(&app)
}

fn run_root_command(app: &App<'_>) -> Result<()> {
    let exit = shelfcam_tui::run_root(app)?;
    info!("interactive session ended: {exit:?}");
    Ok(())
}

fn run_sheets_command(app: &App<'_>) -> Result<()> {
    let paths = app.list_spreadsheets()?;
    println!("{}", sheets_table(&paths));
    println!("{} spreadsheets", paths.len());
    Ok(())
}

fn run_catalog_command(app: &App<'_>, path: &str) -> Result<()> {
    let catalog = app.load_catalog(path)?;
    println!("{}", catalog_table(&catalog));
    println!("{} models", catalog.len());
    if catalog.overwritten() > 0 {
        println!(
            "{} rows hidden: a later row has the same label",
            catalog.overwritten()
        );
    }
    Ok(())
}

fn sheets_table(paths: &[String]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Spreadsheet"]);
    for (index, path) in paths.iter().enumerate() {
        table.add_row(vec![Cell::new(index + 1), Cell::new(path)]);
    }
    table
}

fn catalog_table(catalog: &Catalog) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Label", "Model", "Row"]);
    for entry in catalog.entries() {
        table.add_row(vec![
            Cell::new(&entry.label),
            Cell::new(&entry.model),
            Cell::new(entry.row_number),
        ]);
    }
    table
}

fn print_doctor_report(report: &DoctorReport) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Check", "Status", "Details"]);

    for check in &report.checks {
        table.add_row(vec![
            Cell::new(check.name.as_str()),
            Cell::new(check.state),
            Cell::new(check.details.as_str()),
        ]);
    }

    println!("{table}");
    println!("{}", report.summary());
}

#[cfg(test)]
mod tests {
    use shelfcam_core::catalog::{Sheet, SheetRow};

    use super::{Catalog, catalog_table, sheets_table};

    #[test]
    fn sheets_table_numbers_rows_from_one() {
        let rendered = sheets_table(&[
            "/Stock/Models.xlsx".to_string(),
            "/Stock/Old.xls".to_string(),
        ])
        .to_string();

        assert!(rendered.contains("Spreadsheet"));
        assert!(rendered.contains("/Stock/Models.xlsx"));
        assert!(rendered.contains("2"));
    }

    #[test]
    fn catalog_table_lists_label_model_and_row() {
        let catalog = Catalog::from_sheets(&[Sheet {
            name: "Products".to_string(),
            columns: vec!["Model".to_string(), "Color".to_string()],
            rows: vec![SheetRow {
                number: 7,
                cells: vec!["A-1".to_string(), "Red".to_string()],
            }],
        }]);

        let rendered = catalog_table(&catalog).to_string();

        assert!(rendered.contains("A-1 (Color: Red)"));
        assert!(rendered.contains("Row"));
        assert!(rendered.contains("7"));
    }
}
