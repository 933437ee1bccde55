//! Compiler pair resolution.

use std::path::{Path, PathBuf};

use crate::core::errors::ToolchainError;
use crate::core::platform::HostPlatform;
use crate::util::process::ProcessRunner;

use super::validate::{query_major, CompilerValidator};
use super::{CompilerCandidate, CompilerPair};

/// Clang-family compilers to try, in probe order.
pub fn clang_candidates(platform: HostPlatform) -> Vec<PathBuf> {
    let mut names: Vec<PathBuf> = ["clang", "clang-17", "clang-18", "clang-19"]
        .iter()
        .map(PathBuf::from)
        .collect();

    if platform.is_macos() {
        names.push(PathBuf::from("/opt/homebrew/opt/llvm/bin/clang"));
        names.push(PathBuf::from("/usr/local/opt/llvm/bin/clang"));
    }

    names
}

/// GCC-family compilers to try, in probe order.
pub fn gcc_candidates(platform: HostPlatform) -> Vec<PathBuf> {
    let mut names: Vec<PathBuf> = ["egcc", "gcc", "gcc-13", "gcc-14"]
        .iter()
        .map(PathBuf::from)
        .collect();

    if !platform.is_windows() {
        names.push(PathBuf::from("/usr/local/bin/gcc-13"));
        names.push(PathBuf::from("/usr/local/bin/gcc-14"));
    }
    if platform.is_macos() {
        names.push(PathBuf::from("/opt/homebrew/bin/gcc-13"));
        names.push(PathBuf::from("/opt/homebrew/bin/gcc-14"));
    }

    names
}

/// Derive the C++ driver from a C driver by substituting the family name in
/// the file name: `clang-18` -> `clang++-18`, `/usr/local/bin/gcc-13` ->
/// `/usr/local/bin/g++-13`.
pub fn derive_cxx(c_compiler: &Path, from: &str, to: &str) -> PathBuf {
    match c_compiler.file_name().and_then(|n| n.to_str()) {
        Some(name) => c_compiler.with_file_name(name.replace(from, to)),
        None => c_compiler.to_path_buf(),
    }
}

/// What to tell the user when nothing usable was found.
pub fn remediation(platform: HostPlatform) -> &'static str {
    if platform.is_macos() {
        "Please make sure that Xcode 14.3, Homebrew Clang 17, or higher is installed."
    } else {
        "Please make sure that GCC version 13, Clang version 17, or higher is installed."
    }
}

/// One compiler family to scan.
struct Family {
    label: &'static str,
    candidates: Vec<PathBuf>,
    c_name: &'static str,
    cxx_name: &'static str,
}

/// Finds a validated (C, C++) compiler pair for the host.
pub struct CompilerResolver<'a> {
    runner: &'a dyn ProcessRunner,
    platform: HostPlatform,
    clang: Vec<PathBuf>,
    gcc: Vec<PathBuf>,
}

impl<'a> CompilerResolver<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, platform: HostPlatform) -> Self {
        CompilerResolver {
            runner,
            platform,
            clang: clang_candidates(platform),
            gcc: gcc_candidates(platform),
        }
    }

    /// Replace the built-in candidate lists.
    pub fn with_candidates(mut self, clang: Vec<PathBuf>, gcc: Vec<PathBuf>) -> Self {
        self.clang = clang;
        self.gcc = gcc;
        self
    }

    /// Resolve a compiler pair.
    ///
    /// Explicit overrides are used as-is when both are set and both pass
    /// validation. Otherwise the newest clang is preferred over the newest
    /// gcc; "newest" is decided within a family, never across them.
    pub fn resolve(
        &self,
        cc_override: Option<&str>,
        cxx_override: Option<&str>,
    ) -> Result<CompilerPair, ToolchainError> {
        let validator = CompilerValidator::new(self.runner);

        if let (Some(cc), Some(cxx)) = (cc_override, cxx_override) {
            match (validator.validate(Path::new(cc)), validator.validate(Path::new(cxx))) {
                (Some(c), Some(cxx)) => {
                    tracing::info!("using compilers from CC/CXX: {} / {}", c, cxx);
                    return Ok(CompilerPair { c, cxx });
                }
                _ => tracing::warn!(
                    "ignoring CC={} CXX={}: not a supported compiler pair",
                    cc,
                    cxx
                ),
            }
        }

        let families = [
            Family {
                label: "clang",
                candidates: self.clang.clone(),
                c_name: "clang",
                cxx_name: "clang++",
            },
            Family {
                label: "gcc",
                candidates: self.gcc.clone(),
                c_name: "gcc",
                cxx_name: "g++",
            },
        ];

        for family in &families {
            if let Some(pair) = self.resolve_family(&validator, family) {
                return Ok(pair);
            }
        }

        Err(ToolchainError::NoCompiler {
            remediation: remediation(self.platform).to_string(),
        })
    }

    fn resolve_family(&self, validator: &CompilerValidator<'_>, family: &Family) -> Option<CompilerPair> {
        let newest = self.find_newest(&family.candidates)?;
        tracing::debug!("newest {} candidate: {}", family.label, newest.display());

        let c: CompilerCandidate = validator.validate(&newest)?;
        let cxx_path = derive_cxx(&newest, family.c_name, family.cxx_name);

        match validator.validate(&cxx_path) {
            Some(cxx) => {
                tracing::info!("using {} compilers: {} / {}", family.label, c, cxx);
                Some(CompilerPair { c, cxx })
            }
            None => {
                tracing::warn!(
                    "found {} but its C++ driver {} is not usable",
                    c,
                    cxx_path.display()
                );
                None
            }
        }
    }

    /// The candidate reporting the highest major version; the first listed
    /// wins a tie.
    fn find_newest(&self, candidates: &[PathBuf]) -> Option<PathBuf> {
        let mut best: Option<(u32, &PathBuf)> = None;

        for candidate in candidates {
            let Some(major) = query_major(self.runner, candidate) else {
                continue;
            };
            if best.map_or(true, |(best_major, _)| major > best_major) {
                best = Some((major, candidate));
            }
        }

        best.map(|(_, path)| path.clone())
    }
}
