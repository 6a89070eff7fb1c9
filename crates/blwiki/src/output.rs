//! Terminal output for command results.
//!
//! Lines are written to stderr.

use std::fmt::Display;

use console::{Term, style};

/// Writes colored status lines for the sync and check-config commands.
pub(crate) struct Output {
    term: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Plain line (summary counts, settings).
    pub(crate) fn line(&self, msg: &str) {
        self.write(msg);
    }

    /// Run or check finished cleanly (green).
    pub(crate) fn done(&self, msg: &str) {
        self.write(style(msg).green());
    }

    /// A page or setting that needs attention (yellow).
    pub(crate) fn attention(&self, msg: &str) {
        self.write(style(msg).yellow());
    }

    /// Dry-run banner (cyan bold).
    pub(crate) fn banner(&self, msg: &str) {
        self.write(style(msg).cyan().bold());
    }

    /// Error that ended the command (red, prefixed with `Error:`).
    pub(crate) fn fatal(&self, err: &dyn Display) {
        self.write(style(format!("Error: {err}")).red());
    }

    fn write(&self, msg: impl Display) {
        let _ = self.term.write_line(&msg.to_string());
    }
}
