use std::collections::{HashMap, HashSet, VecDeque};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::anyhow;

use crate::command_runner::{CommandOutput, CommandRunner};
use crate::dropbox::{RemoteEntry, RemoteStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

#[derive(Default)]
pub struct RecordingRunner {
    outputs: Mutex<VecDeque<anyhow::Result<CommandOutput>>>,
    written_image: Option<Vec<u8>>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingRunner {
    pub fn from_outputs(outputs: Vec<anyhow::Result<CommandOutput>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            written_image: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Behaves like a camera program: writes `data` to the argument that
    /// names the capture file and exits 0.
    pub fn writing_output(data: Vec<u8>) -> Self {
        Self {
            outputs: Mutex::new(vec![output("", "", 0)].into()),
            written_image: Some(data),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        self.calls.lock().expect("calls lock").push(Call {
            program: program.to_string(),
            args: args.iter().map(|value| (*value).to_string()).collect(),
            cwd: cwd.map(|value| value.to_path_buf()),
        });

        if let Some(data) = &self.written_image
            && let Some(target) = args.iter().find(|arg| arg.ends_with(".jpg"))
        {
            std::fs::write(target, data).expect("write fake capture");
        }

        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("missing output")))
    }
}

pub fn output(stdout: &str, stderr: &str, status_code: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput::exited(status_code, stdout, stderr))
}

pub fn tiny_png() -> Vec<u8> {
    let image = image::RgbImage::new(1, 1);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode png");
    bytes
}

#[derive(Default)]
pub struct FakeStore {
    folders: HashMap<String, Vec<RemoteEntry>>,
    failing_lists: HashSet<String>,
    listed: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, path: &str, entries: Vec<RemoteEntry>) -> Self {
        self.folders.insert(path.to_string(), entries);
        self
    }

    pub fn failing_list(mut self, path: &str) -> Self {
        self.failing_lists.insert(path.to_string());
        self
    }

    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().expect("listed lock").clone()
    }
}

impl RemoteStore for FakeStore {
    fn list_folder(&self, path: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        self.listed.lock().expect("listed lock").push(path.to_string());

        if self.failing_lists.contains(path) {
            return Err(StoreError::Api {
                status: 409,
                summary: "path/not_found/".to_string(),
            });
        }

        Ok(self.folders.get(path).cloned().unwrap_or_default())
    }

    fn download(&self, _path: &str) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::Response("download not expected in this test".to_string()))
    }

    fn upload(&self, _data: &[u8], _path: &str) -> Result<(), StoreError> {
        Err(StoreError::Response("upload not expected in this test".to_string()))
    }
}
