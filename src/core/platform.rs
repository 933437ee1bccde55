//! Host platform identification.

use serde::Serialize;

/// The host families this tool distinguishes between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostPlatform {
    MacOs,
    Windows,
    Linux,
    /// BSDs and anything else unix-like.
    Other,
}

impl HostPlatform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an `std::env::consts::OS` value to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" => HostPlatform::MacOs,
            "windows" => HostPlatform::Windows,
            "linux" => HostPlatform::Linux,
            _ => HostPlatform::Other,
        }
    }

    pub fn is_windows(self) -> bool {
        self == HostPlatform::Windows
    }

    pub fn is_macos(self) -> bool {
        self == HostPlatform::MacOs
    }

    /// Separator used in `PATH`-like variables.
    pub fn path_separator(self) -> char {
        if self.is_windows() {
            ';'
        } else {
            ':'
        }
    }

    /// Suffix appended to executable names.
    pub fn exe_suffix(self) -> &'static str {
        if self.is_windows() {
            ".exe"
        } else {
            ""
        }
    }
}
