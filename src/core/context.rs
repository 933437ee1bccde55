//! The per-invocation build context.
//!
//! A [`BuildContext`] is established once, before any action runs, and is
//! passed by reference to every component afterwards. It is never mutated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::builder::toolchain::{CompilerPair, CompilerResolver};
use crate::core::errors::{ConfigurationError, Result};
use crate::core::platform::HostPlatform;
use crate::core::preset::{select_preset_name, BuildPreset, PresetResolver};
use crate::util::config::{EnvConfig, ProjectSettings, ENV_SOURCE_DIR};
use crate::util::process::{ProcessBuilder, ProcessRunner};

/// Everything an action needs to know about this invocation.
#[derive(Debug, Clone)]
pub struct BuildContext {
    source_root: PathBuf,
    preset: BuildPreset,
    compilers: CompilerPair,
    env: BTreeMap<String, String>,
    configure_args: Vec<String>,
    platform: HostPlatform,
    jobs: usize,
    arch: Option<String>,
    settings: ProjectSettings,
}

/// Inputs for [`BuildContext::from_parts`].
#[derive(Debug, Clone)]
pub struct ContextParts {
    pub source_root: PathBuf,
    pub preset_name: String,
    pub compilers: CompilerPair,
    pub platform: HostPlatform,
    pub jobs: usize,
    pub arch: Option<String>,
    /// The inherited `PATH`, if any; the toolchain dirs are prepended to it.
    pub inherited_path: Option<String>,
    pub settings: ProjectSettings,
}

impl BuildContext {
    /// Establish the context from the environment: resolve compilers, then
    /// the source tree, settings and preset.
    pub fn establish(
        env: &EnvConfig,
        platform: HostPlatform,
        runner: &dyn ProcessRunner,
    ) -> Result<Self> {
        let compilers = CompilerResolver::new(runner, platform)
            .resolve(env.cc.as_deref(), env.cxx.as_deref())?;

        let source_root = resolve_source_root(env, runner)?;
        tracing::debug!("source root: {}", source_root.display());

        let settings = ProjectSettings::for_source_root(&source_root)?;
        let preset_name = select_preset_name(env.build_preset.as_deref(), platform);

        Self::from_parts(ContextParts {
            source_root,
            preset_name,
            compilers,
            platform,
            jobs: env.jobs()?,
            arch: env.arch.clone(),
            inherited_path: env.path.clone(),
            settings,
        })
    }

    /// Assemble a context from already-resolved parts.
    pub fn from_parts(parts: ContextParts) -> Result<Self> {
        let resolver = PresetResolver::new(&parts.source_root, parts.settings.project.clone());
        let preset = resolver.resolve(&parts.preset_name)?;

        let mut configure_args = parts.compilers.cmake_args();
        configure_args.push(format!(
            "-DCMAKE_INSTALL_PREFIX={}",
            resolver.install_prefix(preset.name).display()
        ));

        let env = child_environment(
            &parts.source_root,
            parts.platform,
            parts.inherited_path.as_deref(),
        );

        Ok(BuildContext {
            source_root: parts.source_root,
            preset,
            compilers: parts.compilers,
            env,
            configure_args,
            platform: parts.platform,
            jobs: parts.jobs,
            arch: parts.arch,
            settings: parts.settings,
        })
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn preset(&self) -> &BuildPreset {
        &self.preset
    }

    pub fn build_dir(&self) -> &Path {
        &self.preset.build_dir
    }

    pub fn compilers(&self) -> &CompilerPair {
        &self.compilers
    }

    /// Variables exported to every child process.
    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    /// Compiler and install-prefix cache arguments for the configure step.
    pub fn configure_args(&self) -> &[String] {
        &self.configure_args
    }

    pub fn platform(&self) -> HostPlatform {
        self.platform
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    /// The `PATH` children see, used to locate external tools.
    pub fn child_path(&self) -> Option<&str> {
        self.env.get("PATH").map(String::as_str)
    }

    /// The configured-marker file inside the build directory.
    pub fn marker_path(&self) -> PathBuf {
        self.build_dir().join(&self.settings.marker_file)
    }

    /// Generated configuration fragment removed alongside the build directory.
    pub fn user_variables_path(&self) -> PathBuf {
        self.source_root.join(&self.settings.user_variables)
    }

    /// The target a request applies to: the explicit one, else the
    /// architecture default.
    pub fn resolve_target(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .or_else(|| self.arch.clone())
            .unwrap_or_else(|| self.settings.default_arch.clone())
    }
}

/// Locally bootstrapped tool directories, in search order.
pub fn toolchain_bin_dirs(source_root: &Path) -> [PathBuf; 2] {
    let local = source_root.join("Toolchain").join("Local");
    [local.join("cmake").join("bin"), local.join("vcpkg").join("bin")]
}

fn child_environment(
    source_root: &Path,
    platform: HostPlatform,
    inherited_path: Option<&str>,
) -> BTreeMap<String, String> {
    let separator = platform.path_separator().to_string();

    let mut path_entries: Vec<String> = toolchain_bin_dirs(source_root)
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    if let Some(path) = inherited_path {
        path_entries.push(path.to_string());
    }

    let mut env = BTreeMap::new();
    env.insert("PATH".to_string(), path_entries.join(&separator));
    env.insert(
        "VCPKG_ROOT".to_string(),
        source_root
            .join("Toolchain")
            .join("Tarballs")
            .join("vcpkg")
            .display()
            .to_string(),
    );
    env.insert(ENV_SOURCE_DIR.to_string(), source_root.display().to_string());
    env
}

/// `LADYBIRD_SOURCE_DIR` if it names a directory, else the enclosing git
/// checkout.
pub fn resolve_source_root(
    env: &EnvConfig,
    runner: &dyn ProcessRunner,
) -> Result<PathBuf, ConfigurationError> {
    if let Some(dir) = env.source_dir.as_ref().filter(|d| d.is_dir()) {
        return Ok(dir.clone());
    }
    if let Some(dir) = &env.source_dir {
        tracing::warn!(
            "{} is not a directory, falling back to git: {}",
            ENV_SOURCE_DIR,
            dir.display()
        );
    }

    let git = ProcessBuilder::new("git").args(["rev-parse", "--show-toplevel"]);
    match runner.output(&git) {
        Ok(out) if out.success() && !out.stdout.trim().is_empty() => {
            Ok(PathBuf::from(out.stdout.trim()))
        }
        Ok(out) => {
            tracing::debug!("git rev-parse failed: {}", out.stderr.trim());
            Err(ConfigurationError::SourceRootNotFound)
        }
        Err(e) => {
            tracing::debug!("{}", e);
            Err(ConfigurationError::SourceRootNotFound)
        }
    }
}
