//! Dependency bootstrap (vcpkg).
//!
//! The bootstrap itself is an opaque script in the source tree. This module
//! only decides how to launch it and with which environment.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::context::BuildContext;
use crate::core::errors::{Result, ToolchainError};
use crate::util::config::{EnvConfig, WINDOWS_SYSTEM_VARS};
use crate::util::process::{check_status, find_first_tool, ProcessBuilder, ProcessRunner};
use crate::util::shell::{Shell, Status};

/// Runs the dependency bootstrap script once per invocation.
pub struct ToolchainBootstrapper<'a> {
    ctx: &'a BuildContext,
    runner: &'a dyn ProcessRunner,
    shell: &'a Shell,
    /// Mixed-case Windows system variables to export (empty elsewhere).
    system_vars: BTreeMap<String, String>,
}

impl<'a> ToolchainBootstrapper<'a> {
    pub fn new(
        ctx: &'a BuildContext,
        env: &EnvConfig,
        runner: &'a dyn ProcessRunner,
        shell: &'a Shell,
    ) -> Self {
        let system_vars = if ctx.platform().is_windows() {
            windows_system_vars(env)
        } else {
            BTreeMap::new()
        };

        ToolchainBootstrapper {
            ctx,
            runner,
            shell,
            system_vars,
        }
    }

    fn python(&self) -> PathBuf {
        let names: &[&str] = if self.ctx.platform().is_windows() {
            &["python", "python3"]
        } else {
            &["python3", "python"]
        };
        find_first_tool(names, self.ctx.child_path()).unwrap_or_else(|| PathBuf::from(names[0]))
    }

    /// The command that performs the bootstrap.
    pub fn command(&self) -> ProcessBuilder {
        let script = self.ctx.source_root().join(&self.ctx.settings().bootstrap_script);
        let (dir, name) = match (script.parent(), script.file_name()) {
            (Some(dir), Some(name)) => (dir.to_path_buf(), PathBuf::from(".").join(name)),
            _ => (self.ctx.source_root().to_path_buf(), script.clone()),
        };

        ProcessBuilder::new(self.python())
            .arg(name)
            .cwd(dir)
            .envs(self.ctx.env())
            .envs(&self.system_vars)
    }

    /// Run the bootstrap. A failure is reported, never retried.
    pub fn bootstrap(&self) -> Result<()> {
        self.shell.status(Status::Bootstrapping, "dependencies");
        check_status(self.runner, &self.command())
            .map_err(|source| ToolchainError::Bootstrap { source })?;
        Ok(())
    }
}

/// Mirror the upper-case Windows system variables into the spelling vcpkg
/// expects (microsoft/vcpkg#41199).
fn windows_system_vars(env: &EnvConfig) -> BTreeMap<String, String> {
    let mut vars = BTreeMap::new();
    for (upper, mixed) in WINDOWS_SYSTEM_VARS {
        match env.windows_var(upper) {
            Some(value) => {
                vars.insert(mixed.to_string(), value.to_string());
            }
            None => tracing::warn!("{} is not set; vcpkg may fail to run", upper),
        }
    }
    vars
}
