use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// A `shelfcam` command isolated from the real user: home, config dir and
/// working directory all point into a fresh temp dir, and no token leaks
/// in from the environment.
pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("shelfcam");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("DROPBOX_TOKEN");
    command.current_dir(temp_home.path());
    (command, temp_home)
}

pub fn write_settings(dir: &Path, raw: &str) {
    fs::write(dir.join("settings.json"), raw).expect("write settings");
}

pub fn assert_timestamp_log_names(entries: &[fs::DirEntry]) {
    assert!(!entries.is_empty(), "expected at least one diagnostics log");

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .expect("diagnostics filename utf8");
        let stem = name
            .strip_suffix(".log")
            .unwrap_or_else(|| panic!("diagnostics file should end with .log: {name}"));
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <epoch-ms>.log, got: {name}"
        );
    }
}
