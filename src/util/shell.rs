//! Cargo-style status lines on stderr.
//!
//! Logging goes through `tracing`; this is only for the short, right-aligned
//! progress lines a user watches while a long build sequence runs.

use std::io::{self, IsTerminal, Write};

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    Always,
    Never,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Removed,

    // In-progress statuses (cyan)
    Bootstrapping,
    Configuring,
    Building,
    Running,
    Testing,

    // Info statuses (blue)
    Fresh,

    // Warning statuses (yellow)
    Skipped,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Bootstrapping => "Bootstrapping",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Running => "Running",
            Status::Testing => "Testing",
            Status::Fresh => "Fresh",
            Status::Skipped => "Skipped",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Removed => "\x1b[1;32m",
            Status::Bootstrapping
            | Status::Configuring
            | Status::Building
            | Status::Running
            | Status::Testing => "\x1b[1;36m",
            Status::Fresh => "\x1b[1;34m",
            Status::Skipped => "\x1b[1;33m",
        }
    }
}

/// Width the status word is right-aligned to.
const STATUS_WIDTH: usize = 13;

/// Writes status lines to stderr.
#[derive(Debug, Clone)]
pub struct Shell {
    use_color: bool,
    quiet: bool,
}

impl Shell {
    pub fn new(color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };
        Shell {
            use_color,
            quiet: false,
        }
    }

    /// A shell that prints nothing. Used by tests.
    pub fn quiet() -> Self {
        Shell {
            use_color: false,
            quiet: true,
        }
    }

    /// Format a status line without printing it.
    pub fn format_status(&self, status: Status, message: impl std::fmt::Display) -> String {
        if self.use_color {
            format!(
                "{}{:>width$}\x1b[0m {}",
                status.color_code(),
                status.as_str(),
                message,
                width = STATUS_WIDTH
            )
        } else {
            format!("{:>width$} {}", status.as_str(), message, width = STATUS_WIDTH)
        }
    }

    /// Print a status line.
    pub fn status(&self, status: Status, message: impl std::fmt::Display) {
        if self.quiet {
            return;
        }
        let line = self.format_status(status, message);
        let _ = writeln!(io::stderr().lock(), "{}", line);
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(ColorChoice::Auto)
    }
}
