use std::backtrace::Backtrace;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Once, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use fern::Dispatch;
use log::{LevelFilter, error, info};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const SHELFCAM_TARGETS: [&str; 4] = ["shelfcam_core", "shelfcam_app", "shelfcam_tui", "shelfcam_cli"];

static HOOK_ONCE: Once = Once::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Diagnostics logging for one process. When disabled no logger is
/// installed and every `log` call is a no-op; the panic hook is installed
/// either way.
pub struct DiagnosticsSession {
    path: Option<PathBuf>,
}

impl DiagnosticsSession {
    pub fn initialize(enabled: bool) -> Result<Self> {
        install_panic_hook();
        if !enabled {
            return Ok(Self { path: None });
        }

        let path = create_diagnostics_log_path()?;
        let file = fern::log_file(&path)
            .with_context(|| format!("failed to create diagnostics log at {}", path.display()))?;

        let mut dispatch = Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "[{}][{}][{}] {}",
                    timestamp(),
                    record.level(),
                    record.target(),
                    message
                ))
            })
            .level(LevelFilter::Warn);
        for target in SHELFCAM_TARGETS {
            dispatch = dispatch.level_for(target, LevelFilter::Debug);
        }
        dispatch
            .chain(file)
            .apply()
            .context("failed to install diagnostics logger")?;

        let _ = LOG_PATH.set(path.clone());
        info!(
            "shelfcam diagnostics start version={} pid={}",
            env!("CARGO_PKG_VERSION"),
            std::process::id()
        );
        info!("argv={:?}", std::env::args().collect::<Vec<String>>());

        Ok(Self { path: Some(path) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn install_panic_hook() {
    HOOK_ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|panic_info| {
            let payload = panic_payload(panic_info);
            let location = panic_info
                .location()
                .map(|value| format!("{}:{}:{}", value.file(), value.line(), value.column()))
                .unwrap_or_else(|| "unknown".to_string());
            let backtrace = Backtrace::force_capture();

            error!("panic captured");
            error!("panic_message={payload}");
            error!("panic_location={location}");
            error!("panic_backtrace={backtrace:?}");
            log::logger().flush();

            eprintln!("Fatal internal error in shelfcam: {payload}");
            match LOG_PATH.get() {
                Some(path) => eprintln!("Diagnostics written to {}", path.display()),
                None => eprintln!("Run `shelfcam --diagnostics` to capture a diagnostics log."),
            }
        }));
    });
}

fn panic_payload(panic_info: &std::panic::PanicHookInfo<'_>) -> String {
    if let Some(payload) = panic_info.payload().downcast_ref::<&str>() {
        return (*payload).to_string();
    }
    if let Some(payload) = panic_info.payload().downcast_ref::<String>() {
        return payload.clone();
    }
    "unknown panic payload".to_string()
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "unknown-time".to_string())
}

fn log_file_name(epoch_ms: u128) -> String {
    format!("{epoch_ms}.log")
}

fn create_diagnostics_log_path() -> Result<PathBuf> {
    let config_dir = shelfcam_core::config::resolve_config_dir()
        .context("failed to resolve shelfcam config directory for diagnostics")?;

    let diagnostics_dir = config_dir.join("diagnostics");
    fs::create_dir_all(&diagnostics_dir).with_context(|| {
        format!(
            "failed to create diagnostics directory {}",
            diagnostics_dir.display()
        )
    })?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    Ok(diagnostics_dir.join(log_file_name(now)))
}
