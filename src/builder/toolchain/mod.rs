//! Host compiler discovery.
//!
//! A compiler is described by what it says about itself: `-dumpversion`
//! yields the major version and `--version` yields the vendor banner. Both
//! probes must succeed for a compiler to be considered at all.

mod detect;
mod validate;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use detect::{
    clang_candidates, derive_cxx, gcc_candidates, remediation, CompilerResolver,
};
pub use validate::{probe, query_major, CompilerValidator};

/// Compiler lineage, which decides the minimum supported version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VendorFamily {
    AppleClang,
    Clang,
    /// GCC and anything else that is not clang.
    GccLike,
}

impl VendorFamily {
    /// Classify a `--version` banner.
    pub fn detect(banner: &str) -> Self {
        if banner.contains("Apple clang") {
            VendorFamily::AppleClang
        } else if banner.contains("clang") {
            VendorFamily::Clang
        } else {
            VendorFamily::GccLike
        }
    }

    /// Lowest major version accepted for this family.
    pub fn minimum_major(self) -> u32 {
        match self {
            VendorFamily::AppleClang => 14,
            VendorFamily::Clang => 17,
            VendorFamily::GccLike => 13,
        }
    }
}

impl fmt::Display for VendorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorFamily::AppleClang => write!(f, "Apple clang"),
            VendorFamily::Clang => write!(f, "clang"),
            VendorFamily::GccLike => write!(f, "gcc"),
        }
    }
}

/// Result of probing a compiler with both version queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub major: u32,
    /// Full `--version` output.
    pub banner: String,
}

impl VersionInfo {
    pub fn family(&self) -> VendorFamily {
        VendorFamily::detect(&self.banner)
    }
}

/// A compiler that answered both version probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerCandidate {
    pub path: PathBuf,
    pub family: VendorFamily,
    pub major: u32,
}

impl CompilerCandidate {
    pub fn from_probe(path: impl Into<PathBuf>, info: &VersionInfo) -> Self {
        CompilerCandidate {
            path: path.into(),
            family: info.family(),
            major: info.major,
        }
    }

    /// Whether this compiler meets its family's minimum version.
    pub fn meets_minimum(&self) -> bool {
        self.major >= self.family.minimum_major()
    }
}

impl fmt::Display for CompilerCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.path.display(), self.family, self.major)
    }
}

/// A validated C and C++ compiler pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerPair {
    pub c: CompilerCandidate,
    pub cxx: CompilerCandidate,
}

impl CompilerPair {
    /// CMake cache arguments selecting this pair.
    pub fn cmake_args(&self) -> Vec<String> {
        vec![
            format!("-DCMAKE_C_COMPILER={}", self.c.path.display()),
            format!("-DCMAKE_CXX_COMPILER={}", self.cxx.path.display()),
        ]
    }

    pub fn c_path(&self) -> &Path {
        &self.c.path
    }

    pub fn cxx_path(&self) -> &Path {
        &self.cxx.path
    }
}
