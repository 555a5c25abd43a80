use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io::Cursor;
use std::path::Path;
use std::sync::Mutex;

use anyhow::anyhow;
use image::{ImageFormat, Rgb, RgbImage};
use shelfcam_core::command_runner::{CommandOutput, CommandRunner};
use shelfcam_core::dropbox::{RemoteEntry, RemoteStore, StoreError};

#[derive(Default)]
pub struct FakeStore {
    folders: BTreeMap<String, Vec<RemoteEntry>>,
    files: BTreeMap<String, Vec<u8>>,
    failing_lists: BTreeSet<String>,
    failing_uploads: BTreeSet<String>,
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder lookups ignore case, as Dropbox paths do.
    pub fn with_folder(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.folders.insert(path.to_lowercase(), entries);
        self
    }

    pub fn with_file(mut self, path: &str, data: Vec<u8>) -> Self {
        self.files.insert(path.to_string(), data);
        self
    }

    pub fn failing_list(mut self, path: &str) -> Self {
        self.failing_lists.insert(path.to_string());
        self
    }

    pub fn failing_upload(mut self, path: &str) -> Self {
        self.failing_uploads.insert(path.to_string());
        self
    }

    pub fn uploaded_paths(&self) -> Vec<String> {
        self.uploads
            .lock()
            .expect("uploads lock")
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }
}

impl RemoteStore for FakeStore {
    fn list_folder(&self, path: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        if self.failing_lists.contains(path) {
            return Err(StoreError::Api {
                status: 409,
                summary: "path/not_found/".to_string(),
            });
        }
        Ok(self
            .folders
            .get(&path.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    fn download(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        self.files.get(path).cloned().ok_or_else(|| StoreError::Api {
            status: 409,
            summary: "path/not_found/".to_string(),
        })
    }

    fn upload(&self, data: &[u8], path: &str) -> Result<(), StoreError> {
        if self.failing_uploads.contains(path) {
            return Err(StoreError::Api {
                status: 507,
                summary: "path/insufficient_space/".to_string(),
            });
        }
        self.uploads
            .lock()
            .expect("uploads lock")
            .push((path.to_string(), data.to_vec()));
        Ok(())
    }
}

#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
}

/// Plays back scripted exit codes. When an image is scripted, it is written
/// to the last argument before the exit code is returned.
#[derive(Default)]
pub struct QueueRunner {
    scripted: Mutex<VecDeque<(i32, Option<Vec<u8>>)>>,
    calls: Mutex<Vec<Call>>,
}

impl QueueRunner {
    pub fn new(scripted: Vec<(i32, Option<Vec<u8>>)>) -> Self {
        Self {
            scripted: Mutex::new(scripted.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl CommandRunner for QueueRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        self.calls.lock().expect("calls lock").push(Call {
            program: program.to_string(),
            args: args.iter().map(|value| (*value).to_string()).collect(),
        });

        let (status_code, image) = self
            .scripted
            .lock()
            .expect("scripted lock")
            .pop_front()
            .ok_or_else(|| anyhow!("missing scripted output"))?;

        if let (Some(data), Some(target)) = (image, args.last()) {
            std::fs::write(target, data)?;
        }

        let stderr = if status_code == 0 { "" } else { "no camera" };
        Ok(CommandOutput::exited(status_code, "", stderr))
    }
}

pub fn tiny_png() -> Vec<u8> {
    let image = RgbImage::from_pixel(2, 2, Rgb([200, 30, 30]));
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .expect("encode png");
    buffer.into_inner()
}

pub fn file(path: &str) -> RemoteEntry {
    let name = path.rsplit('/').next().unwrap_or(path).to_string();
    RemoteEntry::File {
        path: path.to_string(),
        name,
    }
}

pub fn folder(path: &str) -> RemoteEntry {
    RemoteEntry::Folder {
        path: path.to_string(),
    }
}
