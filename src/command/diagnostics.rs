//! Registration diagnostics

use std::fmt;

/// How serious a registration diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The command was registered, possibly with degraded behavior
    Warning,
    /// The command was skipped
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A problem found while registering a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Command the diagnostic is about
    pub command: String,
    /// Warning or error
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
}

impl Diagnostic {
    /// Create a warning
    pub fn warning(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    /// Create an error
    pub fn error(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Whether the command was skipped
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.command, self.message)
    }
}
