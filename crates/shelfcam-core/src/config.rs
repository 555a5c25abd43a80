use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TOKEN_ENV: &str = "DROPBOX_TOKEN";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub dropbox_root: String,
    #[serde(default)]
    pub capture: CaptureSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CaptureSettings {
    #[serde(default = "default_capture_program")]
    pub program: String,
    #[serde(default = "default_capture_args")]
    pub args: Vec<String>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            program: default_capture_program(),
            args: default_capture_args(),
        }
    }
}

fn default_capture_program() -> String {
    "fswebcam".to_string()
}

fn default_capture_args() -> Vec<String> {
    ["--no-banner", "-r", "1280x720", "{output}"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Settings {
    /// Root folder in the form the Dropbox API expects: `""` for the store
    /// root, otherwise one leading `/` and no trailing `/`.
    pub fn normalized_root(&self) -> String {
        normalize_root(&self.dropbox_root)
    }
}

pub fn normalize_root(root: &str) -> String {
    let trimmed = root.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Why `root` cannot name a Dropbox folder, if it cannot.
pub fn root_problem(root: &str) -> Option<String> {
    let normalized = normalize_root(root);
    if normalized.contains('\\') {
        return Some(format!("'{root}' uses backslashes; Dropbox paths use '/'"));
    }
    let segments = normalized.split('/').skip(1);
    for segment in segments {
        if segment.is_empty() {
            return Some(format!("'{root}' contains an empty folder name"));
        }
        if segment == "." || segment == ".." {
            return Some(format!("'{root}' contains a relative folder '{segment}'"));
        }
    }
    None
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory for config path")]
    HomeDirectoryUnavailable,
    #[error("failed to read settings at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid settings: {message}")]
    Validation { message: String },
    #[error("failed to load {path}: {source}")]
    DotEnv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("Dropbox API token not found. Set DROPBOX_TOKEN in the environment or a .env file.")]
    MissingToken,
}

pub fn resolve_config_dir() -> Result<PathBuf, ConfigError> {
    let base_dirs = BaseDirs::new().ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(base_dirs.home_dir().join(".config").join("shelfcam"))
}

/// Picks the settings file: an explicit path wins, then `settings.json` in
/// `cwd`, then the per-user config directory.
pub fn resolve_settings_path(explicit: Option<&Path>, cwd: &Path) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let local = cwd.join(SETTINGS_FILE_NAME);
    if local.exists() {
        return Ok(local);
    }

    Ok(resolve_config_dir()?.join(SETTINGS_FILE_NAME))
}

/// Loads settings, falling back to defaults when the file does not exist.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: Settings = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_settings(&parsed)?;
    Ok(parsed)
}

pub fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    if settings.capture.program.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "capture.program must be non-empty".to_string(),
        });
    }

    Ok(())
}

/// Reads the Dropbox token from the environment after loading `.env` from
/// `cwd` when one exists.
pub fn load_token(cwd: &Path) -> Result<String, ConfigError> {
    let dotenv = cwd.join(".env");
    if dotenv.is_file() {
        dotenvy::from_path(&dotenv).map_err(|source| ConfigError::DotEnv {
            path: dotenv.clone(),
            source,
        })?;
    }

    token_from_value(std::env::var(TOKEN_ENV).ok())
}

fn token_from_value(value: Option<String>) -> Result<String, ConfigError> {
    value
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(ConfigError::MissingToken)
}
