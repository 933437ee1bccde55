//! Build directory lifecycle.
//!
//! A build directory is absent, present but unconfigured, or configured;
//! the marker file (`build.ninja` by default) is what tells the last two
//! apart. Only the configure step creates one, and [`BuildDirectoryManager::destroy`]
//! removes it whole.

use serde::Serialize;

use crate::builder::cmake::CMakeBackend;
use crate::core::context::BuildContext;
use crate::core::errors::Result;
use crate::util::fs::{remove_dir_all_if_exists, remove_file_if_exists};
use crate::util::process::ProcessRunner;
use crate::util::shell::{Shell, Status};

/// Observed state of a build directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildDirectoryState {
    Absent,
    Unconfigured,
    Configured,
}

/// What [`BuildDirectoryManager::ensure_configured`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureOutcome {
    /// The marker was already present; nothing ran.
    AlreadyConfigured,
    /// The configure step ran and succeeded.
    Configured,
}

/// What [`BuildDirectoryManager::destroy`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyOutcome {
    pub removed_build_dir: bool,
    pub removed_user_variables: bool,
}

pub struct BuildDirectoryManager<'a> {
    ctx: &'a BuildContext,
    runner: &'a dyn ProcessRunner,
    shell: &'a Shell,
}

impl<'a> BuildDirectoryManager<'a> {
    pub fn new(ctx: &'a BuildContext, runner: &'a dyn ProcessRunner, shell: &'a Shell) -> Self {
        BuildDirectoryManager { ctx, runner, shell }
    }

    pub fn state(&self) -> BuildDirectoryState {
        if self.ctx.marker_path().is_file() {
            BuildDirectoryState::Configured
        } else if self.ctx.build_dir().is_dir() {
            BuildDirectoryState::Unconfigured
        } else {
            BuildDirectoryState::Absent
        }
    }

    /// Configure the build directory unless its marker file already exists.
    ///
    /// The installed cmake must report exactly the project's required version
    /// before anything is generated.
    pub fn ensure_configured(&self) -> Result<ConfigureOutcome> {
        let state = self.state();
        if state == BuildDirectoryState::Configured {
            tracing::debug!("{} is configured", self.ctx.build_dir().display());
            self.shell.status(Status::Fresh, self.ctx.build_dir().display());
            return Ok(ConfigureOutcome::AlreadyConfigured);
        }

        let backend = CMakeBackend::new(self.ctx, self.runner);
        backend.require_version(&self.ctx.settings().cmake_version)?;

        tracing::info!(
            "configuring {} (preset {}, was {:?})",
            self.ctx.build_dir().display(),
            self.ctx.preset().name,
            state
        );
        self.shell.status(
            Status::Configuring,
            format!("{} [{}]", self.ctx.build_dir().display(), self.ctx.preset().name),
        );
        backend.configure()?;

        Ok(ConfigureOutcome::Configured)
    }

    /// Remove the build directory and the generated vcpkg user-variables
    /// fragment. Missing paths are not an error.
    pub fn destroy(&self) -> Result<DestroyOutcome> {
        let build_dir = self.ctx.build_dir();
        let removed_build_dir = remove_dir_all_if_exists(build_dir)?;
        if removed_build_dir {
            self.shell.status(Status::Removed, build_dir.display());
        }

        let fragment = self.ctx.user_variables_path();
        let removed_user_variables = remove_file_if_exists(&fragment)?;
        if removed_user_variables {
            self.shell.status(Status::Removed, fragment.display());
        }

        tracing::debug!(
            "destroy: build dir removed={}, fragment removed={}",
            removed_build_dir,
            removed_user_variables
        );

        Ok(DestroyOutcome {
            removed_build_dir,
            removed_user_variables,
        })
    }
}
