//! Subprocess execution utilities.
//!
//! Every external tool this crate drives (compilers, cmake, ninja, ctest,
//! the bootstrap script, the built executables) goes through a
//! [`ProcessBuilder`] handed to a [`ProcessRunner`]. Components never spawn
//! processes themselves, which keeps them testable against a recording mock.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::errors::ProcessError;

/// Builder for subprocess execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.env
            .insert(key.as_ref().to_string(), value.as_ref().to_string());
        self
    }

    /// Set several environment variables at once.
    pub fn envs<'a, I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in vars {
            self.env.insert(key.clone(), value.clone());
        }
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl AsRef<Path>) -> Self {
        self.cwd = Some(cwd.as_ref().to_path_buf());
        self
    }

    /// Get the program path.
    pub fn get_program(&self) -> &Path {
        &self.program
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get an environment variable set on this builder.
    pub fn get_env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Get the working directory, if one was set.
    pub fn get_cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(&self.env);

        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }

        cmd
    }

    /// Display the command for logs and error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout and stderr joined, trimmed. Compilers disagree on which stream
    /// carries their version banner.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.trim().to_string();
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr);
        }
        text
    }
}

/// Something that can execute a [`ProcessBuilder`].
pub trait ProcessRunner {
    /// Run to completion, capturing stdout and stderr.
    fn output(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput, ProcessError>;

    /// Run to completion with inherited stdio, returning the exit code.
    fn status(&self, cmd: &ProcessBuilder) -> Result<Option<i32>, ProcessError>;
}

/// [`ProcessRunner`] backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn output(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput, ProcessError> {
        tracing::debug!("capturing `{}`", cmd.display_command());

        let output = cmd
            .build_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProcessError::Spawn {
                command: cmd.display_command(),
                source,
            })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn status(&self, cmd: &ProcessBuilder) -> Result<Option<i32>, ProcessError> {
        tracing::info!("running `{}`", cmd.display_command());

        let status = cmd
            .build_command()
            .status()
            .map_err(|source| ProcessError::Spawn {
                command: cmd.display_command(),
                source,
            })?;

        Ok(status.code())
    }
}

/// Run a command with inherited stdio and require a zero exit code.
pub fn check_status(runner: &dyn ProcessRunner, cmd: &ProcessBuilder) -> Result<(), ProcessError> {
    match runner.status(cmd)? {
        Some(0) => Ok(()),
        code => Err(ProcessError::Failed {
            command: cmd.display_command(),
            code,
        }),
    }
}

/// Locate an executable on the given search path, falling back to the bare
/// name so the OS performs its own lookup at spawn time.
pub fn find_tool(name: &str, search_path: Option<&str>) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_default();
    search_path
        .and_then(|paths| which::which_in(name, Some(paths), &cwd).ok())
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Like [`find_tool`], but tries several names and returns the first found.
pub fn find_first_tool(names: &[&str], search_path: Option<&str>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().unwrap_or_default();
    names.iter().find_map(|name| match search_path {
        Some(paths) => which::which_in(name, Some(paths), &cwd).ok(),
        None => which::which(name).ok(),
    })
}
