//! Error taxonomy.
//!
//! Nothing is recovered locally: every variant terminates the invocation with
//! exit code 1. Variants carry a miette help line where there is a concrete
//! remediation to offer.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unusable configuration: unknown preset, wrong cmake, bad settings.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigurationError {
    #[error("unknown BUILD_PRESET: '{name}'")]
    #[diagnostic(
        code(lbuild::config::unknown_preset),
        help("supported presets are: default, windows_ninja, Debug, Sanitizer")
    )]
    UnknownPreset { name: String },

    #[error("unsupported CMake version '{found}' (this project requires exactly {required})")]
    #[diagnostic(
        code(lbuild::config::cmake_version),
        help("install CMake {required}, or put it first on PATH")
    )]
    UnsupportedCMake { found: String, required: String },

    #[error("could not determine the CMake version from `{command}`")]
    #[diagnostic(code(lbuild::config::cmake_unreadable))]
    CMakeVersionUnreadable { command: String },

    #[error("could not locate the source tree")]
    #[diagnostic(
        code(lbuild::config::source_root),
        help("set LADYBIRD_SOURCE_DIR, or run from inside the git checkout")
    )]
    SourceRootNotFound,

    #[error("invalid MAKEJOBS value '{value}'")]
    #[diagnostic(
        code(lbuild::config::jobs),
        help("MAKEJOBS must be a positive integer")
    )]
    InvalidJobs { value: String },

    #[error("failed to load settings from {}: {message}", path.display())]
    #[diagnostic(code(lbuild::config::settings))]
    Settings { path: PathBuf, message: String },

    #[error("`{command}` requires a target")]
    #[diagnostic(code(lbuild::config::missing_target), help("{usage}"))]
    MissingTarget { command: String, usage: String },

    #[error("`{command}` requires {what}")]
    #[diagnostic(code(lbuild::config::missing_argument), help("{usage}"))]
    MissingArgument {
        command: String,
        what: String,
        usage: String,
    },
}

/// No usable toolchain, or the dependency bootstrap failed.
#[derive(Debug, Error, Diagnostic)]
pub enum ToolchainError {
    #[error("no supported C/C++ compiler pair found")]
    #[diagnostic(code(lbuild::toolchain::no_compiler), help("{remediation}"))]
    NoCompiler { remediation: String },

    #[error("dependency bootstrap failed")]
    #[diagnostic(code(lbuild::toolchain::bootstrap))]
    Bootstrap {
        #[source]
        source: ProcessError,
    },

    #[error("could not find `{binary}` under {}", build_dir.display())]
    #[diagnostic(
        code(lbuild::toolchain::binary_not_found),
        help("check the binary name; it must be a target built into this build directory")
    )]
    BinaryNotFound { binary: String, build_dir: PathBuf },
}

/// An external process could not be started or exited non-zero.
#[derive(Debug, Error, Diagnostic)]
pub enum ProcessError {
    #[error("failed to spawn `{command}`")]
    #[diagnostic(code(lbuild::process::spawn))]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with exit code {}", code.map_or_else(|| "<signal>".to_string(), |c| c.to_string()))]
    #[diagnostic(code(lbuild::process::failed))]
    Failed { command: String, code: Option<i32> },
}

/// Any failure the orchestrator can report.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Process(#[from] ProcessError),

    #[error("filesystem operation failed on {}", path.display())]
    #[diagnostic(code(lbuild::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
