use std::collections::{BTreeSet, VecDeque};

use log::debug;

use crate::dropbox::{RemoteEntry, RemoteStore, StoreError};

pub const SPREADSHEET_EXTENSIONS: [&str; 3] = [".xls", ".xlsx", ".xlsm"];

pub fn is_spreadsheet(name: &str) -> bool {
    let lower = name.to_lowercase();
    SPREADSHEET_EXTENSIONS
        .iter()
        .any(|extension| lower.ends_with(extension))
}

/// Walks the folder tree under `root` breadth-first and returns every
/// spreadsheet path once, sorted. The first failing listing aborts the walk.
pub fn list_spreadsheets(store: &dyn RemoteStore, root: &str) -> Result<Vec<String>, StoreError> {
    let mut queue = VecDeque::from([root.to_string()]);
    let mut visited = BTreeSet::new();
    let mut found = BTreeSet::new();

    while let Some(folder) = queue.pop_front() {
        if !visited.insert(folder.clone()) {
            continue;
        }

        for entry in store.list_folder(&folder)? {
            match entry {
                RemoteEntry::Folder { path } => queue.push_back(path),
                RemoteEntry::File { path, name } if is_spreadsheet(&name) => {
                    found.insert(path);
                }
                RemoteEntry::File { .. } => {}
            }
        }
    }

    debug!(
        "found {} spreadsheets in {} folders under {root:?}",
        found.len(),
        visited.len()
    );
    Ok(found.into_iter().collect())
}
