//! Adapter for the external CMake/Ninja build backend.

use std::path::PathBuf;

use regex::Regex;

use crate::core::context::BuildContext;
use crate::core::errors::{ConfigurationError, ProcessError, Result};
use crate::util::process::{check_status, find_tool, ProcessBuilder, ProcessRunner};

/// Drives `cmake` and `ninja` for one build context.
pub struct CMakeBackend<'a> {
    ctx: &'a BuildContext,
    runner: &'a dyn ProcessRunner,
}

impl<'a> CMakeBackend<'a> {
    pub fn new(ctx: &'a BuildContext, runner: &'a dyn ProcessRunner) -> Self {
        CMakeBackend { ctx, runner }
    }

    fn cmake(&self) -> PathBuf {
        find_tool("cmake", self.ctx.child_path())
    }

    fn ninja(&self) -> PathBuf {
        find_tool("ninja", self.ctx.child_path())
    }

    /// The version `cmake --version` reports, e.g. `3.30.5`.
    pub fn version(&self) -> Result<String> {
        let cmd = ProcessBuilder::new(self.cmake())
            .arg("--version")
            .envs(self.ctx.env());
        let out = self.runner.output(&cmd)?;

        if !out.success() {
            return Err(ProcessError::Failed {
                command: cmd.display_command(),
                code: out.code,
            }
            .into());
        }

        parse_cmake_version(&out.stdout).ok_or_else(|| {
            ConfigurationError::CMakeVersionUnreadable {
                command: cmd.display_command(),
            }
            .into()
        })
    }

    /// Fail unless cmake reports exactly the required version.
    pub fn require_version(&self, required: &str) -> Result<()> {
        let found = self.version()?;
        if found != required {
            return Err(ConfigurationError::UnsupportedCMake {
                found,
                required: required.to_string(),
            }
            .into());
        }
        tracing::debug!("cmake {} found", found);
        Ok(())
    }

    /// Generate the build directory.
    pub fn configure(&self) -> Result<()> {
        let preset = self.ctx.preset();
        let cmd = ProcessBuilder::new(self.cmake())
            .args(&preset.extra_configure_args)
            .args(self.ctx.configure_args())
            .arg("-S")
            .arg(self.ctx.source_root())
            .arg("-B")
            .arg(&preset.build_dir)
            .envs(self.ctx.env());

        check_status(self.runner, &cmd)?;
        Ok(())
    }

    /// Build a single target, or everything when `target` is `None`.
    pub fn build(&self, target: Option<&str>) -> Result<()> {
        let jobs = self.ctx.jobs().to_string();

        let cmd = match target {
            Some(target) => ProcessBuilder::new(self.ninja())
                .args(["-j", jobs.as_str(), "-C"])
                .arg(self.ctx.build_dir())
                .args(["--", target])
                .envs(self.ctx.env()),
            None => ProcessBuilder::new(self.cmake())
                .arg("--build")
                .arg(self.ctx.build_dir())
                .envs(self.ctx.env())
                .env("CMAKE_BUILD_PARALLEL_LEVEL", &jobs),
        };

        check_status(self.runner, &cmd)?;
        Ok(())
    }
}

/// Extract the version from the first line of `cmake --version` output.
pub fn parse_cmake_version(output: &str) -> Option<String> {
    let first = output.lines().next()?.trim();
    let re = Regex::new(r"^cmake3? version (\S+)$").ok()?;
    re.captures(first).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Error;
    use crate::test_support::{self, MockRunner};
    use tempfile::TempDir;

    #[test]
    fn test_parse_cmake_version() {
        let out = "cmake version 3.30.5\n\nCMake suite maintained and supported by Kitware (kitware.com/cmake).\n";
        assert_eq!(parse_cmake_version(out).as_deref(), Some("3.30.5"));
        assert_eq!(parse_cmake_version("cmake version 3.31.0-rc2").as_deref(), Some("3.31.0-rc2"));
        assert_eq!(parse_cmake_version("ninja 1.12.1"), None);
        assert_eq!(parse_cmake_version(""), None);
    }

    #[test]
    fn test_require_version_mismatch() {
        let tmp = TempDir::new().unwrap();
        let ctx = test_support::context(tmp.path());
        let runner = MockRunner::new();
        runner.expect("cmake --version", MockRunner::ok("cmake version 3.28.3\n"));

        let err = CMakeBackend::new(&ctx, &runner)
            .require_version("3.30.5")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UnsupportedCMake { ref found, .. }) if found == "3.28.3"
        ));
    }

    #[test]
    fn test_require_version_match() {
        let tmp = TempDir::new().unwrap();
        let ctx = test_support::context(tmp.path());
        let runner = MockRunner::new();
        runner.expect("cmake --version", MockRunner::ok("cmake version 3.30.5\n"));

        CMakeBackend::new(&ctx, &runner).require_version("3.30.5").unwrap();
    }

    #[test]
    fn test_configure_command_line() {
        let tmp = TempDir::new().unwrap();
        let ctx = test_support::context(tmp.path());
        let runner = MockRunner::new().with_default(MockRunner::ok(""));

        CMakeBackend::new(&ctx, &runner).configure().unwrap();

        let root = tmp.path().display();
        assert_eq!(
            runner.status_calls(),
            vec![format!(
                "cmake --preset default -DCMAKE_C_COMPILER=/opt/cc -DCMAKE_CXX_COMPILER=/opt/cxx \
                 -DCMAKE_INSTALL_PREFIX={root}/Build/ladybird-install-default -S {root} -B {root}/Build/ladybird"
            )]
        );
    }

    #[test]
    fn test_build_commands() {
        let tmp = TempDir::new().unwrap();
        let ctx = test_support::context(tmp.path());
        let runner = MockRunner::new().with_default(MockRunner::ok(""));
        let backend = CMakeBackend::new(&ctx, &runner);

        backend.build(None).unwrap();
        backend.build(Some("install")).unwrap();

        let root = tmp.path().display();
        assert_eq!(
            runner.status_calls(),
            vec![
                format!("cmake --build {root}/Build/ladybird"),
                format!("ninja -j 4 -C {root}/Build/ladybird -- install"),
            ]
        );
        let recorded = runner.recorded();
        assert_eq!(recorded[0].command.get_env("CMAKE_BUILD_PARALLEL_LEVEL"), Some("4"));
        assert!(recorded[1].command.get_env("VCPKG_ROOT").is_some());
    }

    #[test]
    fn test_build_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let ctx = test_support::context(tmp.path());
        let runner = MockRunner::new();
        runner.expect_prefix("ninja", MockRunner::exit(1, ""));

        let err = CMakeBackend::new(&ctx, &runner).build(Some("js")).unwrap_err();
        assert!(matches!(err, Error::Process(ProcessError::Failed { code: Some(1), .. })));
    }
}
