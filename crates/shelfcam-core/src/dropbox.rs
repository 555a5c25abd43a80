use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const API_BASE_URL: &str = "https://api.dropboxapi.com/2";
pub const CONTENT_BASE_URL: &str = "https://content.dropboxapi.com/2";
const API_ARG_HEADER: &str = "Dropbox-API-Arg";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A listing entry. Folders carry the path to descend into, files the path
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteEntry {
    Folder { path: String },
    File { path: String, name: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Dropbox API error ({status}): {summary}")]
    Api { status: u16, summary: String },
    #[error("failed to reach Dropbox: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected Dropbox response: {0}")]
    Response(String),
}

pub trait RemoteStore {
    fn list_folder(&self, path: &str) -> Result<Vec<RemoteEntry>, StoreError>;
    fn download(&self, path: &str) -> Result<Vec<u8>, StoreError>;
    /// Writes `data` to `path`, replacing whatever is there. Missing parent
    /// folders are created by the store.
    fn upload(&self, data: &[u8], path: &str) -> Result<(), StoreError>;
}

pub struct DropboxClient {
    http: Client,
    token: String,
    api_base: String,
    content_base: String,
}

impl DropboxClient {
    pub fn new(token: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_base_urls(token, API_BASE_URL, CONTENT_BASE_URL)
    }

    pub fn with_base_urls(
        token: impl Into<String>,
        api_base: &str,
        content_base: &str,
    ) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            token: token.into(),
            api_base: api_base.trim_end_matches('/').to_string(),
            content_base: content_base.trim_end_matches('/').to_string(),
        })
    }

    fn rpc<A, R>(&self, endpoint: &str, arg: &A) -> Result<R, StoreError>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let url = format!("{}/{endpoint}", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(arg)
            .send()?;
        let response = ensure_success(response)?;
        response
            .json::<R>()
            .map_err(|error| StoreError::Response(format!("{endpoint}: {error}")))
    }
}

impl RemoteStore for DropboxClient {
    fn list_folder(&self, path: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        debug!("list_folder {path:?}");
        let mut page: ListFolderResult = self.rpc(
            "files/list_folder",
            &ListFolderArg {
                path,
                recursive: false,
            },
        )?;

        let mut entries = Vec::new();
        loop {
            entries.extend(page.entries.into_iter().filter_map(WireEntry::into_remote));
            if !page.has_more {
                break;
            }
            page = self.rpc(
                "files/list_folder/continue",
                &ListFolderContinueArg {
                    cursor: &page.cursor,
                },
            )?;
        }

        Ok(entries)
    }

    fn download(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        debug!("download {path:?}");
        let url = format!("{}/files/download", self.content_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(API_ARG_HEADER, header_safe_json(&PathArg { path })?)
            .send()?;
        let response = ensure_success(response)?;
        Ok(response.bytes()?.to_vec())
    }

    fn upload(&self, data: &[u8], path: &str) -> Result<(), StoreError> {
        debug!("upload {} bytes to {path:?}", data.len());
        let url = format!("{}/files/upload", self.content_base);
        let arg = UploadArg {
            path,
            mode: "overwrite",
            autorename: false,
            mute: false,
        };
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header(API_ARG_HEADER, header_safe_json(&arg)?)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data.to_vec())
            .send()?;
        ensure_success(response)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ListFolderArg<'a> {
    path: &'a str,
    recursive: bool,
}

#[derive(Debug, Serialize)]
struct ListFolderContinueArg<'a> {
    cursor: &'a str,
}

#[derive(Debug, Serialize)]
struct PathArg<'a> {
    path: &'a str,
}

#[derive(Debug, Serialize)]
struct UploadArg<'a> {
    path: &'a str,
    mode: &'a str,
    autorename: bool,
    mute: bool,
}

#[derive(Debug, Deserialize)]
struct ListFolderResult {
    entries: Vec<WireEntry>,
    cursor: String,
    has_more: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "snake_case")]
enum WireEntry {
    Folder {
        path_lower: Option<String>,
        path_display: Option<String>,
    },
    File {
        name: String,
        path_lower: Option<String>,
        path_display: Option<String>,
    },
    #[serde(other)]
    Other,
}

impl WireEntry {
    fn into_remote(self) -> Option<RemoteEntry> {
        match self {
            Self::Folder {
                path_lower,
                path_display,
            } => Some(RemoteEntry::Folder {
                path: path_lower.or(path_display)?,
            }),
            Self::File {
                name,
                path_lower,
                path_display,
            } => Some(RemoteEntry::File {
                path: path_display.or(path_lower)?,
                name,
            }),
            Self::Other => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error_summary: Option<String>,
}

fn ensure_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(StoreError::Api {
        status: status.as_u16(),
        summary: api_error_summary(&body),
    })
}

fn api_error_summary(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.error_summary)
        .unwrap_or_else(|| body.trim().to_string())
}

/// JSON for the `Dropbox-API-Arg` header. HTTP headers must stay ASCII, so
/// every other character is written as a `\uXXXX` escape.
fn header_safe_json<T: Serialize>(value: &T) -> Result<String, StoreError> {
    let raw = serde_json::to_string(value)
        .map_err(|error| StoreError::Response(format!("failed to encode request: {error}")))?;

    let mut escaped = String::with_capacity(raw.len());
    let mut units = [0u16; 2];
    for character in raw.chars() {
        if character.is_ascii() && character != '\u{7f}' {
            escaped.push(character);
            continue;
        }
        for unit in character.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{unit:04x}"));
        }
    }

    Ok(escaped)
}
