//! lbuild - build and run front end for a large CMake/Ninja project
//!
//! This crate provides the library behind the `lbuild` binary: compiler
//! discovery, preset resolution, build directory management, the dependency
//! bootstrap and the command dispatcher.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for lbuild unit tests.
///
/// This module is only available when compiling with `--cfg test`. It
/// provides a scripted process runner and ready-made build contexts.
#[cfg(test)]
pub mod test_support;

pub use core::{
    command::{CommandKind, CommandRequest},
    context::BuildContext,
    errors::{Error, Result},
    platform::HostPlatform,
};
pub use ops::{dispatch, preview};
