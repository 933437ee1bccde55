//! Running built executables directly or under gdb.

use std::path::PathBuf;

use crate::core::context::BuildContext;
use crate::core::errors::Result;
use crate::util::process::{check_status, find_tool, ProcessBuilder, ProcessRunner};

/// Where a built executable lives.
///
/// On macOS the GUI and service executables are packaged inside the app
/// bundle; everything else is directly under `bin/`.
pub fn executable_path(ctx: &BuildContext, name: &str) -> PathBuf {
    let settings = ctx.settings();
    let bin = ctx.build_dir().join("bin");

    if ctx.platform().is_macos() && settings.bundle_executables.iter().any(|e| e == name) {
        bin.join(&settings.bundle)
            .join("Contents")
            .join("MacOS")
            .join(name)
    } else {
        bin.join(format!("{}{}", name, ctx.platform().exe_suffix()))
    }
}

/// Run a built executable with pass-through arguments.
pub fn run_executable(
    ctx: &BuildContext,
    runner: &dyn ProcessRunner,
    name: &str,
    args: &[String],
) -> Result<()> {
    let cmd = ProcessBuilder::new(executable_path(ctx, name))
        .args(args)
        .envs(ctx.env());

    check_status(runner, &cmd)?;
    Ok(())
}

/// Start a built executable under gdb. The pass-through arguments go to gdb
/// itself (typically `-ex` commands), before the executable.
pub fn debug_executable(
    ctx: &BuildContext,
    runner: &dyn ProcessRunner,
    name: &str,
    gdb_args: &[String],
) -> Result<()> {
    let cmd = ProcessBuilder::new(find_tool("gdb", ctx.child_path()))
        .args(gdb_args)
        .arg(executable_path(ctx, name))
        .envs(ctx.env());

    check_status(runner, &cmd)?;
    Ok(())
}
