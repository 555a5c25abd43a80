use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::Context;

/// What an external program left behind once it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `None` when the program was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn exited(code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            status: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == Some(0)
    }

    pub fn describe_status(&self) -> String {
        match self.status {
            Some(code) => format!("exited with status {code}"),
            None => "was terminated by a signal".to_string(),
        }
    }
}

/// Launches the camera program. Tests swap in scripted runners.
pub trait CommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput>;
}

#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        let mut command = Command::new(program);
        // The terminal is in raw mode while capturing; the program must not read from it.
        command.args(args).stdin(Stdio::null());

        if let Some(working_directory) = cwd {
            command.current_dir(working_directory);
        }

        let output = command
            .output()
            .with_context(|| format!("could not start {program}"))?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
