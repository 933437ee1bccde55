//! Everything that touches the external build toolchain.
//!
//! Compiler discovery, the CMake/Ninja backend, the build directory
//! lifecycle and the dependency bootstrap.

pub mod bootstrap;
pub mod build_dir;
pub mod cmake;
pub mod toolchain;

pub use bootstrap::ToolchainBootstrapper;
pub use build_dir::{BuildDirectoryManager, BuildDirectoryState};
pub use cmake::CMakeBackend;
pub use toolchain::{CompilerPair, CompilerResolver, CompilerValidator, VendorFamily};
