use std::env;
use std::fmt;
use std::path::Path;

use crate::config::{Settings, load_settings, load_token, root_problem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|check| check.state == CheckState::Fail)
    }

    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

pub fn run_doctor(settings_path: &Path, cwd: &Path) -> DoctorReport {
    let mut checks = Vec::new();

    checks.push(match load_token(cwd) {
        Ok(_) => pass_check("Dropbox token present", "DROPBOX_TOKEN is set"),
        Err(error) => fail_check("Dropbox token present", error.to_string()),
    });

    let settings = if settings_path.exists() {
        match load_settings(settings_path) {
            Ok(settings) => {
                checks.push(pass_check(
                    "settings file parses",
                    format!("loaded {}", settings_path.display()),
                ));
                Some(settings)
            }
            Err(error) => {
                checks.push(fail_check("settings file parses", error.to_string()));
                None
            }
        }
    } else {
        checks.push(pass_check(
            "settings file parses",
            format!(
                "no file at {}, using defaults",
                settings_path.display()
            ),
        ));
        Some(Settings::default())
    };

    match settings {
        Some(settings) => {
            checks.push(check_root(&settings));
            checks.push(check_capture_program(&settings.capture.program));
        }
        None => {
            checks.push(skipped_check("Dropbox root", "settings are invalid"));
            checks.push(skipped_check(
                "capture program installed",
                "settings are invalid",
            ));
        }
    }

    DoctorReport { checks }
}

fn check_root(settings: &Settings) -> DoctorCheck {
    if let Some(problem) = root_problem(&settings.dropbox_root) {
        return fail_check("Dropbox root", problem);
    }
    let root = settings.normalized_root();
    if root.is_empty() {
        pass_check("Dropbox root", "store root")
    } else {
        pass_check("Dropbox root", root)
    }
}

fn check_capture_program(program: &str) -> DoctorCheck {
    if is_executable_in_path(program) {
        pass_check(
            "capture program installed",
            format!("'{program}' found in PATH"),
        )
    } else {
        fail_check(
            "capture program installed",
            format!("'{program}' not found in PATH; camera capture will fail, file import still works"),
        )
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn skipped_check(name: &str, reason: &str) -> DoctorCheck {
    fail_check(name, format!("skipped because {reason}"))
}

fn is_executable_in_path(program: &str) -> bool {
    let program_path = Path::new(program);

    if program_path.is_absolute() || program.contains('/') {
        return is_executable_file(program_path);
    }

    let path_value = match env::var_os("PATH") {
        Some(value) => value,
        None => return false,
    };

    env::split_paths(&path_value)
        .map(|directory| directory.join(program))
        .any(|candidate| is_executable_file(&candidate))
}

fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match path.metadata() {
            Ok(metadata) => metadata.permissions().mode() & 0o111 != 0,
            Err(_) => false,
        }
    }

    #[cfg(not(unix))]
    {
        true
    }
}
