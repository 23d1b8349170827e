// diagnostics.rs

// Diagnostics emitted while adapting a request. Adapters never log directly;
// they report to a sink handed in by the caller. LogSink forwards to the `log`
// facade, CollectingSink keeps the entries in memory for inspection.

// Dependencies
use log::{debug, info, warn};
use std::sync::Mutex;

#[cfg(test)]
use mockall::automock;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Trace of adapter activity
    Debug,
    /// Something was corrected automatically
    Info,
    /// Something was left as is and needs operator attention
    Warning,
}

/// One diagnostic message
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Joint the message is about, if any
    pub joint: Option<String>,
    /// Human readable text
    pub message: String,
}

impl Diagnostic {
    /// Debug message
    pub fn debug(message: impl Into<String>) -> Self {
        Diagnostic { severity: Severity::Debug, joint: None, message: message.into() }
    }

    /// Informational message about a joint
    pub fn info(joint: &str, message: impl Into<String>) -> Self {
        Diagnostic { severity: Severity::Info, joint: Some(joint.to_string()), message: message.into() }
    }

    /// Warning, optionally about a joint
    pub fn warning(joint: Option<&str>, message: impl Into<String>) -> Self {
        Diagnostic { severity: Severity::Warning, joint: joint.map(str::to_string), message: message.into() }
    }
}

/// Receiver for diagnostics. Shared between threads, so implementations
/// must synchronize internally.
#[cfg_attr(test, automock)]
pub trait DiagnosticSink: Send + Sync {
    /// Records one diagnostic
    fn emit(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` crate under a fixed target
#[derive(Debug, Clone)]
pub struct LogSink {
    target: String,
}

impl LogSink {
    /// Sink logging under `target`
    pub fn new(target: &str) -> Self {
        LogSink { target: target.to_string() }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        LogSink::new("eos_adapters::fix_start_state_bounds")
    }
}

impl DiagnosticSink for LogSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let target = self.target.as_str();
        match diagnostic.severity {
            Severity::Debug => debug!(target: target, "{}", diagnostic.message),
            Severity::Info => info!(target: target, "{}", diagnostic.message),
            Severity::Warning => warn!(target: target, "{}", diagnostic.message),
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Recorded diagnostics of one severity
    pub fn with_severity(&self, severity: Severity) -> Vec<Diagnostic> {
        self.entries().into_iter().filter(|d| d.severity == severity).collect()
    }

    /// Removes and returns everything recorded so far
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).push(diagnostic);
    }
}
