//! Diagnostics: data-quality conditions found while resolving, and where they get reported.

use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

/// Condition worth reporting that does not stop resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The requested nameservice is not listed in the HDFS `dfs.nameservices` property.
    UndefinedNameService { nameservice: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UndefinedNameService { nameservice } => write!(
                f,
                "nameservice {:?} is not declared in the HDFS configuration",
                nameservice
            ),
        }
    }
}

/// Where diagnostics go. Injected into URL creators at construction.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Logs each diagnostic as a `tracing` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic {
            Diagnostic::UndefinedNameService { nameservice } => {
                tracing::warn!(
                    nameservice = %nameservice,
                    "Requested HDFS nameservice is not declared in dfs.nameservices"
                );
            }
        }
    }
}

/// Keeps diagnostics in memory, in report order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    reported: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.reported.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        let mut guard = match self.reported.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(diagnostic.clone());
    }
}
