use crate::result::{CargoLiteError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use which::which;

/// Captured result of a finished external command.
#[derive(Debug)]
pub struct ProcessOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Combined stdout + stderr, for surfacing a failed command verbatim.
    pub fn combined(&self) -> String {
        let mut out = String::new();
        if !self.stdout.is_empty() {
            out.push_str(&self.stdout);
        }
        if !self.stderr.is_empty() {
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(&self.stderr);
        }
        out
    }
}

#[derive(Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    pub fn find_executable(&self, name: &str) -> Result<PathBuf> {
        match which(name) {
            Ok(path) => Ok(path),
            Err(_) => Err(CargoLiteError::NotFound(
                format!("Executable not found: {}", name).into(),
            )),
        }
    }

    /// Runs a command to completion with stdout/stderr captured.
    ///
    /// Blocking from the caller's point of view; cargo-lite never runs
    /// external tools in parallel, and a hung tool hangs the whole process.
    pub async fn run_captured<I, S>(
        &self,
        program: &Path,
        args: I,
        cwd: Option<&Path>,
    ) -> Result<ProcessOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command.args(args);
        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }

        log::debug!("running {}", program.display());

        let output = command.output().await.map_err(|e| {
            CargoLiteError::Process(
                format!("Failed to execute {}: {}", program.display(), e).into(),
            )
        })?;

        Ok(ProcessOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
