use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::ImageReader;
use log::{debug, info};
use thiserror::Error;

use crate::command_runner::CommandRunner;
use crate::config::CaptureSettings;

pub const OUTPUT_PLACEHOLDER: &str = "{output}";
const CAPTURE_FILE_NAME: &str = "capture.jpg";

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to prepare a temporary capture directory: {0}")]
    Staging(#[source] std::io::Error),
    #[error("failed to run capture program '{program}': {message}")]
    Launch { program: String, message: String },
    #[error("capture program '{program}' {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
    #[error("capture program '{program}' did not write an image")]
    NoOutput { program: String },
    #[error("local file not found: {}", path.display())]
    MissingSource { path: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("captured data is not a readable image: {0}")]
    InvalidImage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Runs the configured camera program and returns the JPEG it wrote.
///
/// The program writes into a temporary directory that is removed when this
/// function returns, whether the capture succeeded or not.
pub fn capture_from_camera(
    runner: &dyn CommandRunner,
    settings: &CaptureSettings,
) -> Result<Vec<u8>, CaptureError> {
    let staging = tempfile::Builder::new()
        .prefix("shelfcam-")
        .tempdir()
        .map_err(CaptureError::Staging)?;
    let output_path = staging.path().join(CAPTURE_FILE_NAME);
    let output_arg = output_path.to_string_lossy().to_string();

    let args = expand_args(&settings.args, &output_arg);
    let arg_refs = args.iter().map(String::as_str).collect::<Vec<_>>();

    debug!("running capture program {} {:?}", settings.program, args);
    let output = runner
        .run(&settings.program, &arg_refs, Some(staging.path()))
        .map_err(|error| CaptureError::Launch {
            program: settings.program.clone(),
            message: format!("{error:#}"),
        })?;

    if !output.succeeded() {
        return Err(CaptureError::Failed {
            program: settings.program.clone(),
            status: output.describe_status(),
            stderr: output.stderr.trim().to_string(),
        });
    }

    if !output_path.is_file() {
        return Err(CaptureError::NoOutput {
            program: settings.program.clone(),
        });
    }

    let data = std::fs::read(&output_path).map_err(|source| CaptureError::Read {
        path: output_path.clone(),
        source,
    })?;
    let info = inspect_image(&data)?;
    info!(
        "captured {}x{} image ({} bytes)",
        info.width,
        info.height,
        data.len()
    );

    Ok(data)
}

pub fn read_image_file(path: &Path) -> Result<Vec<u8>, CaptureError> {
    if !path.is_file() {
        return Err(CaptureError::MissingSource {
            path: path.to_path_buf(),
        });
    }

    let data = std::fs::read(path).map_err(|source| CaptureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    inspect_image(&data)?;
    Ok(data)
}

pub fn inspect_image(data: &[u8]) -> Result<ImageInfo, CaptureError> {
    let (width, height) = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|error| CaptureError::InvalidImage(error.to_string()))?
        .into_dimensions()
        .map_err(|error| CaptureError::InvalidImage(error.to_string()))?;

    Ok(ImageInfo { width, height })
}

fn expand_args(args: &[String], output: &str) -> Vec<String> {
    args.iter()
        .map(|arg| arg.replace(OUTPUT_PLACEHOLDER, output))
        .collect()
}
