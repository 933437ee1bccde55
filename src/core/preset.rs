//! Build presets and the directories they map to.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::errors::ConfigurationError;
use crate::core::platform::HostPlatform;

/// The fixed set of CMake presets the project ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PresetName {
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "windows_ninja")]
    WindowsNinja,
    Debug,
    Sanitizer,
}

impl PresetName {
    pub fn as_str(self) -> &'static str {
        match self {
            PresetName::Default => "default",
            PresetName::WindowsNinja => "windows_ninja",
            PresetName::Debug => "Debug",
            PresetName::Sanitizer => "Sanitizer",
        }
    }

    /// Preset used when `BUILD_PRESET` is not set.
    pub fn platform_default(platform: HostPlatform) -> Self {
        if platform.is_windows() {
            PresetName::WindowsNinja
        } else {
            PresetName::Default
        }
    }

    /// Suffix of the build directory name, after the project name.
    fn dir_suffix(self) -> &'static str {
        match self {
            PresetName::Default | PresetName::WindowsNinja => "",
            PresetName::Debug => "-debug",
            PresetName::Sanitizer => "-sanitizers",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(PresetName::Default),
            "windows_ninja" => Ok(PresetName::WindowsNinja),
            "Debug" => Ok(PresetName::Debug),
            "Sanitizer" => Ok(PresetName::Sanitizer),
            other => Err(ConfigurationError::UnknownPreset {
                name: other.to_string(),
            }),
        }
    }
}

/// A resolved preset: where it builds and what it adds to the configure line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPreset {
    pub name: PresetName,
    pub build_dir: PathBuf,
    pub extra_configure_args: Vec<String>,
}

/// Maps preset names to build directories under `{source_root}/Build`.
#[derive(Debug, Clone)]
pub struct PresetResolver {
    build_root: PathBuf,
    project: String,
}

impl PresetResolver {
    pub fn new(source_root: &Path, project: impl Into<String>) -> Self {
        PresetResolver {
            build_root: source_root.join("Build"),
            project: project.into(),
        }
    }

    /// Resolve a preset by name. Unknown names are an error, never a default.
    pub fn resolve(&self, name: &str) -> Result<BuildPreset, ConfigurationError> {
        let name: PresetName = name.parse()?;
        Ok(self.resolve_known(name))
    }

    pub fn resolve_known(&self, name: PresetName) -> BuildPreset {
        let build_dir = self
            .build_root
            .join(format!("{}{}", self.project, name.dir_suffix()));

        BuildPreset {
            name,
            build_dir,
            extra_configure_args: vec!["--preset".to_string(), name.as_str().to_string()],
        }
    }

    /// Install prefix for a preset: `{source_root}/Build/{project}-install-{preset}`.
    pub fn install_prefix(&self, name: PresetName) -> PathBuf {
        self.build_root
            .join(format!("{}-install-{}", self.project, name.as_str()))
    }
}

/// Pick the preset name: an explicit override wins, else the platform default.
pub fn select_preset_name(override_name: Option<&str>, platform: HostPlatform) -> String {
    match override_name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => PresetName::platform_default(platform).as_str().to_string(),
    }
}
