use crate::sanitize::sanitize_filename;

/// Destination folder for every image captured against one spreadsheet:
/// `/<spreadsheet parent>/<sanitized spreadsheet stem>`.
pub fn upload_root(spreadsheet_path: &str) -> String {
    let (parent, file_name) = match spreadsheet_path.rsplit_once('/') {
        Some((parent, file_name)) => (parent, file_name),
        None => ("", spreadsheet_path),
    };

    let parent = parent.trim_matches('/');
    let base = sanitize_filename(file_stem(file_name));

    collapse_separators(&format!("/{parent}/{base}"))
}

/// Full destination of one image: `<root>/<row>/<filename>`, with the row
/// number and the filename sanitized.
pub fn destination_path(upload_root: &str, row_number: u32, filename: &str) -> String {
    let row = sanitize_filename(row_number);
    let filename = sanitize_filename(filename);
    collapse_separators(&format!("{upload_root}/{row}/{filename}"))
}

pub fn collapse_separators(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    let mut previous_was_separator = false;

    for character in path.chars() {
        let is_separator = character == '/';
        if is_separator && previous_was_separator {
            continue;
        }
        collapsed.push(character);
        previous_was_separator = is_separator;
    }

    collapsed
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    }
}
