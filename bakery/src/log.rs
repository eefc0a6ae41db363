//! The driver's diagnostic log (spec §6.4).

use crate::error::CompileError;
use crate::ir::NodeTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: Severity,
    pub message: String,
}

/// An ordered list of `(severity, message)` entries (spec §6.4). `Log::ok` is true iff there
/// are zero error entries.
#[derive(Debug, Clone, Default)]
pub struct Log {
    entries: Vec<LogEntry>,
}

impl Log {
    pub fn new() -> Log {
        Log::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            severity: Severity::Info,
            message: message.into(),
        });
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.entries.push(LogEntry {
            severity: Severity::Error,
            message: message.into(),
        });
    }

    pub fn error_from(&mut self, tree: &NodeTree, err: &CompileError) {
        self.error(err.describe(tree));
    }

    pub fn extend_errors(&mut self, tree: &NodeTree, errors: &[CompileError]) {
        for e in errors {
            self.error_from(tree, e);
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn ok(&self) -> bool {
        !self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    pub fn print(&self) {
        for entry in &self.entries {
            let prefix = match entry.severity {
                Severity::Info => "info",
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            println!("{}: {}", prefix, entry.message);
        }
    }
}
