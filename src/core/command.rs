//! The structured request the dispatcher acts on.

use std::fmt;

use serde::Serialize;

/// The closed set of commands the front end understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    /// Compile the default targets.
    Build,
    /// Compile, then run the `install` target.
    Install,
    /// Build an executable and run it with pass-through arguments.
    Run,
    /// Build an executable and start it under gdb.
    Gdb,
    /// Compile and run the unit tests.
    Test,
    /// Recreate the build directory and compile.
    Rebuild,
    /// Recreate the build directory without compiling.
    Recreate,
    /// Resolve addresses in a built binary to file:line.
    Addr2line,
    /// Remove the build directory.
    Delete,
    /// Ensure the third-party dependencies are available.
    Vcpkg,
}

impl CommandKind {
    /// Every command, in the order `--help` lists them.
    pub const ALL: [CommandKind; 10] = [
        CommandKind::Build,
        CommandKind::Install,
        CommandKind::Run,
        CommandKind::Gdb,
        CommandKind::Test,
        CommandKind::Rebuild,
        CommandKind::Recreate,
        CommandKind::Addr2line,
        CommandKind::Delete,
        CommandKind::Vcpkg,
    ];

    /// Names accepted on the command line.
    pub const NAMES: [&'static str; 10] = [
        "build",
        "install",
        "run",
        "gdb",
        "test",
        "rebuild",
        "recreate",
        "addr2line",
        "delete",
        "vcpkg",
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandKind::Build => "build",
            CommandKind::Install => "install",
            CommandKind::Run => "run",
            CommandKind::Gdb => "gdb",
            CommandKind::Test => "test",
            CommandKind::Rebuild => "rebuild",
            CommandKind::Recreate => "recreate",
            CommandKind::Addr2line => "addr2line",
            CommandKind::Delete => "delete",
            CommandKind::Vcpkg => "vcpkg",
        }
    }

    /// Commands that cannot do anything useful without a named target.
    pub fn requires_target(self) -> bool {
        matches!(
            self,
            CommandKind::Run | CommandKind::Gdb | CommandKind::Addr2line
        )
    }

    /// One-line usage shown when a required argument is missing.
    pub fn usage(self) -> &'static str {
        match self {
            CommandKind::Run => "usage: lbuild run EXECUTABLE [ARGS...]",
            CommandKind::Gdb => "usage: lbuild gdb EXECUTABLE [-ex 'gdb command']...",
            CommandKind::Addr2line => "usage: lbuild addr2line BINARY_FILE ADDRESS...",
            CommandKind::Test => "usage: lbuild test [TARGET] [TEST_NAME_PATTERN]",
            _ => "usage: lbuild COMMAND [TARGET] [ARGS...]",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown command '{}'; expected one of: {}",
                    s,
                    CommandKind::NAMES.join(", ")
                )
            })
    }
}

/// A validated request: what to do, to which target, with which arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub command: CommandKind,
    pub target: Option<String>,
    pub args: Vec<String>,
}

impl CommandRequest {
    pub fn new(command: CommandKind) -> Self {
        CommandRequest {
            command,
            target: None,
            args: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}
