//! Compiler version probing and the minimum-version gate.

use std::path::Path;

use crate::util::process::{ProcessBuilder, ProcessRunner};

use super::{CompilerCandidate, VersionInfo};

/// Parse the major version out of `-dumpversion` output (`17`, `13.2.0`, ...).
fn parse_major(dump: &str) -> Option<u32> {
    dump.trim().split('.').next()?.trim().parse().ok()
}

fn query(runner: &dyn ProcessRunner, compiler: &Path, flag: &str) -> Option<String> {
    let cmd = ProcessBuilder::new(compiler).arg(flag);
    match runner.output(&cmd) {
        Ok(out) if out.success() => {
            let text = out.combined();
            (!text.is_empty()).then_some(text)
        }
        Ok(out) => {
            tracing::debug!(
                "`{}` exited with {:?}",
                cmd.display_command(),
                out.code
            );
            None
        }
        Err(e) => {
            tracing::debug!("{}", e);
            None
        }
    }
}

/// Ask a compiler for its major version only.
///
/// This is the cheap probe used to rank candidates; it does not look at the
/// vendor banner.
pub fn query_major(runner: &dyn ProcessRunner, compiler: &Path) -> Option<u32> {
    if compiler.as_os_str().is_empty() {
        return None;
    }
    parse_major(&query(runner, compiler, "-dumpversion")?)
}

/// Run both version probes. `None` if either fails or is unparsable.
pub fn probe(runner: &dyn ProcessRunner, compiler: &Path) -> Option<VersionInfo> {
    let major = query_major(runner, compiler)?;
    let banner = query(runner, compiler, "--version")?;
    Some(VersionInfo { major, banner })
}

/// Decides whether a compiler satisfies the version policy for its family.
pub struct CompilerValidator<'a> {
    runner: &'a dyn ProcessRunner,
}

impl<'a> CompilerValidator<'a> {
    pub fn new(runner: &'a dyn ProcessRunner) -> Self {
        CompilerValidator { runner }
    }

    /// Probe a compiler and return it if it passes the gate.
    pub fn validate(&self, compiler: &Path) -> Option<CompilerCandidate> {
        let info = probe(self.runner, compiler)?;
        let candidate = CompilerCandidate::from_probe(compiler, &info);

        if candidate.meets_minimum() {
            tracing::debug!("accepted compiler {}", candidate);
            Some(candidate)
        } else {
            tracing::debug!(
                "rejected compiler {}: {} requires at least {}",
                candidate,
                candidate.family,
                candidate.family.minimum_major()
            );
            None
        }
    }

    pub fn is_valid(&self, compiler: &Path) -> bool {
        self.validate(compiler).is_some()
    }
}
