//! Core data structures.
//!
//! - The request a user makes ([`CommandRequest`])
//! - Presets and the build directory they map to
//! - The immutable per-invocation [`BuildContext`]
//! - The error taxonomy

pub mod command;
pub mod context;
pub mod errors;
pub mod platform;
pub mod preset;

pub use command::{CommandKind, CommandRequest};
pub use context::BuildContext;
pub use errors::{ConfigurationError, Error, ProcessError, Result, ToolchainError};
pub use platform::HostPlatform;
pub use preset::{BuildPreset, PresetName, PresetResolver};
