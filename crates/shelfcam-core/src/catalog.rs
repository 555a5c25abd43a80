use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use log::{debug, warn};
use thiserror::Error;

pub const MODEL_COLUMN: &str = "Model";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// One data row. `number` is the 1-based spreadsheet row as a user sees it,
/// header included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub number: u32,
    pub cells: Vec<String>,
}

impl Sheet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open workbook: {0}")]
    Open(#[source] calamine::Error),
    #[error("failed to read sheet '{sheet}': {source}")]
    Sheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

pub fn decode_workbook(bytes: &[u8]) -> Result<Vec<Sheet>, CatalogError> {
    let mut workbook =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(CatalogError::Open)?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| CatalogError::Sheet {
                sheet: name.clone(),
                source,
            })?;

        let header_row = range.start().map(|(row, _)| row).unwrap_or(0);
        let mut rows = range.rows();
        let columns = match rows.next() {
            Some(header) => header
                .iter()
                .enumerate()
                .map(|(index, cell)| match cell_text(cell) {
                    text if text.trim().is_empty() => format!("Unnamed: {index}"),
                    text => text,
                })
                .collect(),
            None => Vec::new(),
        };

        let rows = rows
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(|cell| !cell_text(cell).trim().is_empty()))
            .map(|(position, cells)| SheetRow {
                number: header_row + position as u32 + 2,
                cells: cells.iter().map(cell_text).collect(),
            })
            .collect::<Vec<_>>();

        debug!(
            "decoded sheet '{name}': {} columns, {} rows",
            columns.len(),
            rows.len()
        );
        sheets.push(Sheet {
            name,
            columns,
            rows,
        });
    }

    Ok(sheets)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(value) => value
            .as_datetime()
            .map(|moment| moment.to_string())
            .unwrap_or_else(|| value.as_f64().to_string()),
        Data::DateTimeIso(value) => value.replacen('T', " ", 1),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub label: String,
    pub model: String,
    pub row_number: u32,
}

/// Selectable product rows of one spreadsheet, keyed and ordered by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
    overwritten: usize,
}

impl Catalog {
    /// Builds the catalog from every sheet that has a `Model` column. When two
    /// rows render the same label the later row wins.
    pub fn from_sheets(sheets: &[Sheet]) -> Self {
        let mut catalog = Self::default();

        for sheet in sheets {
            let Some(model_index) = sheet.column_index(MODEL_COLUMN) else {
                debug!("sheet '{}' has no {MODEL_COLUMN} column", sheet.name);
                continue;
            };

            for row in &sheet.rows {
                let model = row.cells.get(model_index).map(String::as_str).unwrap_or("");
                if model.trim().is_empty() {
                    continue;
                }

                let details = sheet
                    .columns
                    .iter()
                    .zip(&row.cells)
                    .enumerate()
                    .filter(|(index, (_, value))| *index != model_index && !value.is_empty())
                    .map(|(_, (column, value))| (column.as_str(), value.as_str()))
                    .collect::<Vec<_>>();

                catalog.insert(CatalogEntry {
                    label: display_label(model, &details),
                    model: model.to_string(),
                    row_number: row.number,
                });
            }
        }

        catalog
    }

    fn insert(&mut self, entry: CatalogEntry) {
        if let Some(previous) = self.entries.insert(entry.label.clone(), entry) {
            warn!(
                "catalog label '{}' repeated; row {} replaced by a later row",
                previous.label, previous.row_number
            );
            self.overwritten += 1;
        }
    }

    pub fn get(&self, label: &str) -> Option<&CatalogEntry> {
        self.entries.get(label)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of rows hidden because a later row produced the same label.
    pub fn overwritten(&self) -> usize {
        self.overwritten
    }
}

pub fn display_label(model: &str, details: &[(&str, &str)]) -> String {
    if details.is_empty() {
        return model.to_string();
    }

    let info = details
        .iter()
        .map(|(column, value)| format!("{column}: {value}"))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{model} ({info})")
}

#[cfg(test)]
mod tests {
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    use super::*;

    fn sheet(name: &str, columns: &[&str], rows: &[&[&str]]) -> Sheet {
        Sheet {
            name: name.to_string(),
            columns: columns.iter().map(|value| value.to_string()).collect(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(position, cells)| SheetRow {
                    number: position as u32 + 2,
                    cells: cells.iter().map(|value| value.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn catalog_labels_rows_with_other_columns() {
        let sheets = vec![
            sheet("Notes", &["Note"], &[&["ignore me"]]),
            sheet("Products", &["Model", "Color"], &[&["A", "Red"], &["B", ""]]),
        ];

        let catalog = Catalog::from_sheets(&sheets);

        assert_eq!(catalog.len(), 2);
        let a = catalog.get("A (Color: Red)").expect("entry A");
        assert_eq!(a.model, "A");
        assert_eq!(a.row_number, 2);
        let b = catalog.get("B").expect("entry B");
        assert_eq!(b.model, "B");
        assert_eq!(b.row_number, 3);
    }

    #[test]
    fn catalog_joins_details_in_column_order_excluding_model() {
        let sheets = vec![sheet(
            "Products",
            &["Brand", "Model", "Size", "Color"],
            &[&["Acme", "X1", "55", "Black"]],
        )];

        let catalog = Catalog::from_sheets(&sheets);
        let labels: Vec<&str> = catalog.entries().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["X1 (Brand: Acme | Size: 55 | Color: Black)"]);
    }

    #[test]
    fn catalog_last_duplicate_label_wins() {
        let sheets = vec![
            sheet("First", &["Model"], &[&["Same"], &["Other"]]),
            sheet("Second", &["Model"], &[&["Same"]]),
        ];

        let catalog = Catalog::from_sheets(&sheets);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Same").expect("entry").row_number, 2);
        assert_eq!(catalog.overwritten(), 1);

        let sheets = vec![sheet("Only", &["Model"], &[&["Same"], &["Same"]])];
        let catalog = Catalog::from_sheets(&sheets);
        assert_eq!(catalog.get("Same").expect("entry").row_number, 3);
    }

    #[test]
    fn catalog_skips_rows_without_model_and_sheets_without_model_column() {
        let sheets = vec![
            sheet("Products", &["Model", "Color"], &[&["", "Red"], &["C", "Blue"]]),
            sheet("model lowercase", &["model"], &[&["D"]]),
        ];

        let catalog = Catalog::from_sheets(&sheets);
        let labels: Vec<&str> = catalog.entries().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["C (Color: Blue)"]);
        assert_eq!(catalog.get("C (Color: Blue)").expect("entry").row_number, 3);
    }

    #[test]
    fn catalog_keeps_model_text_as_written() {
        let sheets = vec![sheet("Products", &["Model"], &[&[" A-1 "], &["   "]])];

        let catalog = Catalog::from_sheets(&sheets);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(" A-1 ").expect("entry").model, " A-1 ");
    }

    #[test]
    fn catalog_entries_are_sorted_by_label() {
        let sheets = vec![sheet("Products", &["Model"], &[&["b"], &["C"], &["a"]])];
        let catalog = Catalog::from_sheets(&sheets);
        let labels: Vec<&str> = catalog.entries().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "a", "b"]);
    }

    #[test]
    fn display_label_without_details_is_model() {
        assert_eq!(display_label("X", &[]), "X");
        assert_eq!(
            display_label("X", &[("Color", "Red"), ("Size", "L")]),
            "X (Color: Red | Size: L)"
        );
    }

    #[test]
    fn decode_workbook_reads_sheets_and_row_numbers() {
        let mut workbook = Workbook::new();
        let products = workbook.add_worksheet();
        products.set_name("Products").expect("sheet name");
        products.write_string(0, 0, "Model").expect("header");
        products.write_string(0, 1, "Color").expect("header");
        products.write_string(0, 2, "Size").expect("header");
        products.write_string(1, 0, "A").expect("cell");
        products.write_string(1, 1, "Red").expect("cell");
        products.write_number(1, 2, 55.0).expect("cell");
        products.write_string(3, 0, "B").expect("cell");
        products.write_number(3, 2, 42.5).expect("cell");

        let other = workbook.add_worksheet();
        other.set_name("Summary").expect("sheet name");
        other.write_string(0, 0, "Total").expect("header");

        let bytes = workbook.save_to_buffer().expect("workbook bytes");
        let sheets = decode_workbook(&bytes).expect("decoded");

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets[0].name, "Products");
        assert_eq!(sheets[0].columns, vec!["Model", "Color", "Size"]);
        assert_eq!(sheets[0].rows.len(), 2);
        assert_eq!(sheets[0].rows[0].number, 2);
        assert_eq!(sheets[0].rows[0].cells, vec!["A", "Red", "55"]);
        assert_eq!(sheets[0].rows[1].number, 4);
        assert_eq!(sheets[0].rows[1].cells, vec!["B", "", "42.5"]);

        let catalog = Catalog::from_sheets(&sheets);
        assert_eq!(
            catalog.get("A (Color: Red | Size: 55)").expect("A").row_number,
            2
        );
        assert_eq!(catalog.get("B (Size: 42.5)").expect("B").row_number, 4);
    }

    #[test]
    fn decode_workbook_renders_date_cells_as_dates() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Model").expect("header");
        sheet.write_string(0, 1, "Arrived").expect("header");
        sheet.write_string(1, 0, "A").expect("cell");
        let arrived = ExcelDateTime::from_ymd(2024, 1, 15).expect("date");
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        sheet
            .write_datetime_with_format(1, 1, &arrived, &date_format)
            .expect("cell");

        let bytes = workbook.save_to_buffer().expect("workbook bytes");
        let sheets = decode_workbook(&bytes).expect("decoded");
        assert_eq!(sheets[0].rows[0].cells, vec!["A", "2024-01-15 00:00:00"]);

        let catalog = Catalog::from_sheets(&sheets);
        let labels: Vec<&str> = catalog.entries().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["A (Arrived: 2024-01-15 00:00:00)"]);
    }

    #[test]
    fn decode_workbook_names_blank_headers() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Model").expect("header");
        sheet.write_string(0, 2, "Notes").expect("header");
        sheet.write_string(1, 0, "A").expect("cell");
        sheet.write_string(1, 1, "x").expect("cell");

        let bytes = workbook.save_to_buffer().expect("workbook bytes");
        let sheets = decode_workbook(&bytes).expect("decoded");
        assert_eq!(sheets[0].columns, vec!["Model", "Unnamed: 1", "Notes"]);

        let catalog = Catalog::from_sheets(&sheets);
        assert!(catalog.get("A (Unnamed: 1: x)").is_some());
    }

    #[test]
    fn decode_workbook_rejects_garbage() {
        let error = decode_workbook(b"definitely not a spreadsheet").expect_err("should fail");
        assert!(matches!(error, CatalogError::Open(_)));
    }
}
