//! Configuration sources.
//!
//! Two inputs feed a build context:
//! - [`EnvConfig`]: the process environment, read once at the boundary.
//!   Nothing else in the crate calls `std::env::var`.
//! - [`ProjectSettings`]: optional `.lbuild/config.toml` in the source tree,
//!   holding the project conventions (names, versions, layout).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::errors::ConfigurationError;

/// Compiler override for the C compiler.
pub const ENV_CC: &str = "CC";
/// Compiler override for the C++ compiler.
pub const ENV_CXX: &str = "CXX";
/// Build preset override.
pub const ENV_BUILD_PRESET: &str = "BUILD_PRESET";
/// Parallel job count handed to the backend.
pub const ENV_MAKEJOBS: &str = "MAKEJOBS";
/// Source root override; also exported to children.
pub const ENV_SOURCE_DIR: &str = "LADYBIRD_SOURCE_DIR";
/// Default target architecture.
pub const ENV_ARCH: &str = "SERENITY_ARCH";

/// Windows system variables the bootstrap tool needs in their mixed-case
/// spelling. Pairs are (upper-case source, spelling to export).
pub const WINDOWS_SYSTEM_VARS: [(&str, &str); 3] = [
    ("SYSTEMDRIVE", "SystemDrive"),
    ("SYSTEMROOT", "SystemRoot"),
    ("WINDIR", "windir"),
];

/// Snapshot of the environment variables this tool consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub cc: Option<String>,
    pub cxx: Option<String>,
    pub build_preset: Option<String>,
    pub make_jobs: Option<String>,
    pub source_dir: Option<PathBuf>,
    pub arch: Option<String>,
    pub path: Option<String>,
    /// Upper-case Windows system variables, keyed by their upper-case name.
    pub windows_system: Vec<(String, String)>,
}

impl EnvConfig {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup function. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let windows_system = WINDOWS_SYSTEM_VARS
            .iter()
            .filter_map(|(upper, _)| get(upper).map(|v| (upper.to_string(), v)))
            .collect();

        EnvConfig {
            cc: get(ENV_CC),
            cxx: get(ENV_CXX),
            build_preset: get(ENV_BUILD_PRESET),
            make_jobs: get(ENV_MAKEJOBS),
            source_dir: get(ENV_SOURCE_DIR).map(PathBuf::from),
            arch: get(ENV_ARCH),
            path: get("PATH"),
            windows_system,
        }
    }

    /// Look up a captured Windows system variable by its upper-case name.
    pub fn windows_var(&self, upper: &str) -> Option<&str> {
        self.windows_system
            .iter()
            .find(|(k, _)| k == upper)
            .map(|(_, v)| v.as_str())
    }

    /// Resolve the job count: `MAKEJOBS`, else the host's available parallelism.
    pub fn jobs(&self) -> Result<usize, ConfigurationError> {
        match &self.make_jobs {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigurationError::InvalidJobs { value: raw.clone() }),
            },
            None => Ok(std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)),
        }
    }
}

/// Project conventions, overridable per checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    /// Project name used in build and install directory names.
    pub project: String,

    /// The exact `cmake --version` the project supports.
    pub cmake_version: String,

    /// File whose presence marks a build directory as configured.
    pub marker_file: String,

    /// Target name that enables the unit test runner for `test`.
    pub test_target: String,

    /// Target used when neither the request nor `SERENITY_ARCH` name one.
    pub default_arch: String,

    /// macOS app bundle (under `bin/`) that hosts the GUI and service executables.
    pub bundle: String,

    /// Executables that live inside the macOS app bundle.
    pub bundle_executables: Vec<String>,

    /// Generated CMake fragment removed together with the build directory.
    pub user_variables: PathBuf,

    /// Dependency bootstrap script, relative to the source root.
    pub bootstrap_script: PathBuf,

    /// Whether `rebuild` and `recreate` start from an empty build directory.
    pub fresh_rebuild: bool,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        ProjectSettings {
            project: "ladybird".to_string(),
            cmake_version: "3.30.5".to_string(),
            marker_file: "build.ninja".to_string(),
            test_target: "lagom".to_string(),
            default_arch: "x86_64".to_string(),
            bundle: "Ladybird.app".to_string(),
            bundle_executables: [
                "headless-browser",
                "ImageDecoder",
                "Ladybird",
                "RequestServer",
                "WebContent",
                "WebDriver",
                "WebWorker",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            user_variables: PathBuf::from("Meta/CMake/vcpkg/user-variables.cmake"),
            bootstrap_script: PathBuf::from("Toolchain/BuildVcpkg.py"),
            fresh_rebuild: true,
        }
    }
}

impl ProjectSettings {
    /// Load settings from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigurationError::Settings {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        toml::from_str(&contents).map_err(|e| ConfigurationError::Settings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load the settings for a source tree, or defaults if it has none.
    pub fn for_source_root(source_root: &Path) -> Result<Self, ConfigurationError> {
        let path = settings_path(source_root);
        if path.exists() {
            tracing::debug!("loading project settings from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Location of the project settings file (`.lbuild/config.toml`).
pub fn settings_path(source_root: &Path) -> PathBuf {
    source_root.join(".lbuild").join("config.toml")
}
