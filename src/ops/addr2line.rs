//! Symbolizing addresses in built binaries.

use std::path::PathBuf;

use crate::core::context::BuildContext;
use crate::core::errors::{Result, ToolchainError};
use crate::ops::run::executable_path;
use crate::util::fs::find_file_named;
use crate::util::process::{check_status, find_first_tool, ProcessBuilder, ProcessRunner};

/// Find a built binary: its usual executable location first, then anywhere
/// in the build directory (libraries, plugins, test binaries).
pub fn locate_binary(ctx: &BuildContext, name: &str) -> Result<PathBuf> {
    let expected = executable_path(ctx, name);
    if expected.is_file() {
        return Ok(expected);
    }

    let file_name = format!("{}{}", name, ctx.platform().exe_suffix());
    find_file_named(ctx.build_dir(), &file_name)
        .or_else(|| find_file_named(ctx.build_dir(), name))
        .ok_or_else(|| {
            ToolchainError::BinaryNotFound {
                binary: name.to_string(),
                build_dir: ctx.build_dir().to_path_buf(),
            }
            .into()
        })
}

/// Resolve `addresses` in the built binary `name` to file:line.
pub fn addr2line(
    ctx: &BuildContext,
    runner: &dyn ProcessRunner,
    name: &str,
    addresses: &[String],
) -> Result<()> {
    let binary = locate_binary(ctx, name)?;
    tracing::debug!("resolving {} address(es) in {}", addresses.len(), binary.display());

    let tool = find_first_tool(&["addr2line", "llvm-addr2line"], ctx.child_path())
        .unwrap_or_else(|| PathBuf::from("addr2line"));

    let cmd = ProcessBuilder::new(tool)
        .arg("-e")
        .arg(&binary)
        .args(addresses)
        .envs(ctx.env());

    check_status(runner, &cmd)?;
    Ok(())
}
