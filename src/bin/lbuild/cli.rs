//! CLI definitions using clap.

use clap::{Parser, ValueEnum};

use lbuild::{CommandKind, CommandRequest};

/// lbuild - configure, build, run and test the browser from one command
#[derive(Parser)]
#[command(name = "lbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Print the resolved action plan as JSON instead of running it
    #[arg(long, global = true)]
    pub plan: bool,

    /// What to do
    #[arg(value_enum)]
    pub command: CommandArg,

    /// Target to build or run (defaults to SERENITY_ARCH, else x86_64)
    pub target: Option<String>,

    /// Arguments passed through to the target, gdb, ctest or addr2line
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CommandArg {
    /// Compile the default targets
    Build,
    /// Compile, then install
    Install,
    /// Build an executable and run it
    Run,
    /// Build an executable and start it under gdb
    Gdb,
    /// Compile and run the unit tests
    Test,
    /// Recreate the build directory and compile
    Rebuild,
    /// Recreate the build directory
    Recreate,
    /// Resolve addresses in a built binary
    Addr2line,
    /// Remove the build directory
    Delete,
    /// Bootstrap the third-party dependencies
    Vcpkg,
}

impl From<CommandArg> for CommandKind {
    fn from(arg: CommandArg) -> Self {
        match arg {
            CommandArg::Build => CommandKind::Build,
            CommandArg::Install => CommandKind::Install,
            CommandArg::Run => CommandKind::Run,
            CommandArg::Gdb => CommandKind::Gdb,
            CommandArg::Test => CommandKind::Test,
            CommandArg::Rebuild => CommandKind::Rebuild,
            CommandArg::Recreate => CommandKind::Recreate,
            CommandArg::Addr2line => CommandKind::Addr2line,
            CommandArg::Delete => CommandKind::Delete,
            CommandArg::Vcpkg => CommandKind::Vcpkg,
        }
    }
}

impl Cli {
    pub fn request(&self) -> CommandRequest {
        let mut request = CommandRequest::new(self.command.into()).with_args(self.args.iter());
        if let Some(target) = &self.target {
            request = request.with_target(target.as_str());
        }
        request
    }
}
