//! Test utilities for lbuild unit tests.
//!
//! [`MockRunner`] stands in for [`SystemRunner`](crate::util::process::SystemRunner):
//! it answers commands from a list of expectations and records every call,
//! so tests can assert on the exact sequence of external actions.
//!
//! ```rust,ignore
//! let runner = MockRunner::new().with_default(MockRunner::ok(""));
//! runner.expect("cmake --version", MockRunner::ok("cmake version 3.30.5"));
//! // ... run code under test ...
//! assert_eq!(runner.status_calls(), vec!["cmake --build /src/Build/ladybird"]);
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::builder::toolchain::{CompilerCandidate, CompilerPair, VendorFamily};
use crate::core::context::{BuildContext, ContextParts};
use crate::core::errors::ProcessError;
use crate::core::platform::HostPlatform;
use crate::util::config::ProjectSettings;
use crate::util::process::{ProcessBuilder, ProcessOutput, ProcessRunner};

/// Pattern for matching commands.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on the full command line.
    Exact(String),
    /// Match if the command line starts with prefix.
    StartsWith(String),
    /// Match if the command line contains substring.
    Contains(String),
}

impl CommandPattern {
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
        }
    }
}

/// Canned result for a matched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProcessOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone)]
struct Expectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
}

/// One recorded invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: ProcessBuilder,
    /// `true` for captured probes, `false` for inherited-stdio runs.
    pub captured: bool,
}

impl RecordedCall {
    pub fn line(&self) -> String {
        self.command.display_command()
    }
}

/// Scripted [`ProcessRunner`] that records everything it is asked to run.
///
/// Later expectations take precedence over earlier ones. Commands that match
/// nothing fall back to the default output, or fail to spawn if there is none.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: Mutex<Vec<Expectation>>,
    calls: Mutex<Vec<RecordedCall>>,
    default_output: Option<MockProcessOutput>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Answer unmatched commands with `output` instead of a spawn failure.
    pub fn with_default(mut self, output: MockProcessOutput) -> Self {
        self.default_output = Some(output);
        self
    }

    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> MockProcessOutput {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failing output with the given status and stderr.
    pub fn exit(status: i32, stderr: impl Into<String>) -> MockProcessOutput {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn push(&self, pattern: CommandPattern, output: MockProcessOutput) -> &Self {
        self.expectations
            .lock()
            .unwrap()
            .push(Expectation { pattern, output });
        self
    }

    /// Expect an exact command line.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output)
    }

    /// Expect any command line starting with `prefix`.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output)
    }

    /// Expect any command line containing `needle`.
    pub fn expect_contains(&self, needle: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Contains(needle.to_string()), output)
    }

    /// Register a compiler that answers both version probes.
    pub fn compiler(&self, path: &str, dump_version: &str, banner: &str) -> &Self {
        self.expect(&format!("{} -dumpversion", path), Self::ok(dump_version));
        self.expect(&format!("{} --version", path), Self::ok(banner))
    }

    /// All recorded calls, in order.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// All recorded command lines, in order.
    pub fn calls(&self) -> Vec<String> {
        self.recorded().iter().map(RecordedCall::line).collect()
    }

    /// Command lines of inherited-stdio runs only (the visible actions).
    pub fn status_calls(&self) -> Vec<String> {
        self.recorded()
            .iter()
            .filter(|c| !c.captured)
            .map(RecordedCall::line)
            .collect()
    }

    fn answer(&self, cmd: &ProcessBuilder, captured: bool) -> Result<MockProcessOutput, ProcessError> {
        let line = cmd.display_command();
        self.calls.lock().unwrap().push(RecordedCall {
            command: cmd.clone(),
            captured,
        });

        let matched = self
            .expectations
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|e| e.pattern.matches(&line))
            .map(|e| e.output.clone());

        matched
            .or_else(|| self.default_output.clone())
            .ok_or_else(|| ProcessError::Spawn {
                command: line,
                source: io::Error::new(io::ErrorKind::NotFound, "no mock expectation"),
            })
    }
}

impl ProcessRunner for MockRunner {
    fn output(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput, ProcessError> {
        let out = self.answer(cmd, true)?;
        Ok(ProcessOutput {
            code: Some(out.status),
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }

    fn status(&self, cmd: &ProcessBuilder) -> Result<Option<i32>, ProcessError> {
        Ok(Some(self.answer(cmd, false)?.status))
    }
}

/// A clang 18 pair at `/opt/cc` and `/opt/cxx`.
pub fn compiler_pair() -> CompilerPair {
    let candidate = |path: &str| CompilerCandidate {
        path: PathBuf::from(path),
        family: VendorFamily::Clang,
        major: 18,
    };
    CompilerPair {
        c: candidate("/opt/cc"),
        cxx: candidate("/opt/cxx"),
    }
}

/// A Linux `default`-preset context rooted at `root`, with 4 jobs and no
/// inherited `PATH` so tools resolve to their bare names.
pub fn context(root: &Path) -> BuildContext {
    context_with(root, HostPlatform::Linux, ProjectSettings::default())
}

/// Like [`context`], with an explicit platform and settings.
pub fn context_with(root: &Path, platform: HostPlatform, settings: ProjectSettings) -> BuildContext {
    BuildContext::from_parts(ContextParts {
        source_root: root.to_path_buf(),
        preset_name: "default".to_string(),
        compilers: compiler_pair(),
        platform,
        jobs: 4,
        arch: None,
        inherited_path: None,
        settings,
    })
    .unwrap()
}

/// Create a minimal source tree layout under `root`.
pub fn create_source_tree(root: &Path) -> PathBuf {
    std::fs::create_dir_all(root.join("Toolchain")).unwrap();
    std::fs::create_dir_all(root.join("Meta/CMake/vcpkg")).unwrap();
    std::fs::write(root.join("CMakeLists.txt"), "cmake_minimum_required(VERSION 3.25)\n").unwrap();
    std::fs::write(root.join("Toolchain/BuildVcpkg.py"), "").unwrap();
    root.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectations_and_recording() {
        let runner = MockRunner::new();
        runner.expect("cmake --version", MockRunner::ok("cmake version 3.30.5"));
        runner.expect_prefix("ninja", MockRunner::exit(1, "no such target"));

        let out = runner.output(&ProcessBuilder::new("cmake").arg("--version")).unwrap();
        assert_eq!(out.stdout, "cmake version 3.30.5");

        let code = runner
            .status(&ProcessBuilder::new("ninja").args(["-C", "Build", "--", "js"]))
            .unwrap();
        assert_eq!(code, Some(1));

        assert!(runner.output(&ProcessBuilder::new("gdb")).is_err());
        assert_eq!(runner.calls().len(), 3);
        assert_eq!(runner.status_calls(), vec!["ninja -C Build -- js"]);
    }

    #[test]
    fn test_later_expectations_win() {
        let runner = MockRunner::new().with_default(MockRunner::ok(""));
        runner.expect_contains("ctest", MockRunner::exit(8, ""));
        runner.expect("ctest -R Foo", MockRunner::ok("passed"));

        assert_eq!(runner.status(&ProcessBuilder::new("ctest").args(["-R", "Foo"])).unwrap(), Some(0));
        assert_eq!(runner.status(&ProcessBuilder::new("ctest")).unwrap(), Some(8));
        assert_eq!(runner.status(&ProcessBuilder::new("true")).unwrap(), Some(0));
    }
}
