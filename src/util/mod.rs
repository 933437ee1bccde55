//! Shared utilities

pub mod config;
pub mod fs;
pub mod process;
pub mod shell;

pub use config::{EnvConfig, ProjectSettings};
pub use process::{ProcessBuilder, ProcessRunner, SystemRunner};
pub use shell::{ColorChoice, Shell};
