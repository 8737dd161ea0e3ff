//! Leveled stderr logger handed to every pipeline stage.

use std::fmt::Display;

/// A key/value pair attached to a log line.
pub type Field<'a> = (&'a str, &'a dyn Display);

#[derive(Clone, Copy, Debug, Default)]
pub struct Logger {
    verbose: u8,
    quiet: bool,
}

impl Logger {
    pub fn new(verbose: u8, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// A logger that only prints errors.
    pub fn silent() -> Self {
        Self::new(0, true)
    }

    pub fn info(&self, message: impl Display) {
        self.info_kv(message, &[]);
    }

    pub fn info_kv(&self, message: impl Display, fields: &[Field<'_>]) {
        if !self.quiet {
            eprintln!("{}", render(message, fields));
        }
    }

    pub fn warn(&self, message: impl Display) {
        self.warn_kv(message, &[]);
    }

    pub fn warn_kv(&self, message: impl Display, fields: &[Field<'_>]) {
        if !self.quiet {
            eprintln!("Warning: {}", render(message, fields));
        }
    }

    pub fn error(&self, message: impl Display) {
        self.error_kv(message, &[]);
    }

    pub fn error_kv(&self, message: impl Display, fields: &[Field<'_>]) {
        eprintln!("Error: {}", render(message, fields));
    }

    pub fn debug(&self, message: impl Display) {
        self.verbose(1, message);
    }

    pub fn debug_kv(&self, message: impl Display, fields: &[Field<'_>]) {
        if self.enabled(1) {
            eprintln!("{}", render(message, fields));
        }
    }

    /// Per-path chatter, only shown at `-vv`.
    pub fn trace(&self, message: impl Display) {
        self.verbose(2, message);
    }

    pub fn verbose(&self, level: u8, message: impl Display) {
        if self.enabled(level) {
            eprintln!("{message}");
        }
    }

    pub fn enabled(&self, level: u8) -> bool {
        !self.quiet && self.verbose >= level
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn level(&self) -> u8 {
        self.verbose
    }
}

fn render(message: impl Display, fields: &[Field<'_>]) -> String {
    let mut line = message.to_string();
    for (key, value) in fields {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&value.to_string());
    }
    line
}
