use crate::batch::{AggregatedResults, BatchKind};
use crate::transport::TransportError;
use crate::types::Outcome;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "Id", "config.save_limit")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "bulk_saver", "rest_config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the bulk saver and its remote clients.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Remote error: HTTP {status} ({code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Save failed: {0}")]
    Save(SaveError),

    #[error("{0}")]
    Flush(Box<FlushError>),

    #[error("Runtime error: {message}{}", format_context(.context))]
    Runtime {
        message: String,
        context: ErrorContext,
    },
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Create a new runtime error with structured context
    pub fn runtime_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Runtime {
            message: msg.into(),
            context,
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. }
            | Error::Validation { context, .. }
            | Error::Runtime { context, .. } => Some(context),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }

    /// The failed sub-batch, when this error came out of a flush or auto-flush.
    pub fn as_flush(&self) -> Option<&FlushError> {
        match self {
            Error::Flush(f) => Some(f),
            _ => None,
        }
    }

    /// The remote call error, unwrapping a flush wrapper if present.
    pub fn root(&self) -> &Error {
        match self {
            Error::Flush(f) => f.source.root(),
            other => other,
        }
    }
}

/// Failing outcomes raised as an error by a strict remote client.
///
/// The display message lists the first error message of every failing outcome,
/// one per line.
#[derive(Debug, Clone, Default)]
pub struct SaveError {
    failures: Vec<Outcome>,
}

impl SaveError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, outcome: Outcome) {
        self.failures.push(outcome);
    }

    pub fn failures(&self) -> &[Outcome] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self
            .failures
            .iter()
            .filter_map(|o| o.first_error_message())
            .collect();
        write!(f, "{}", messages.join("\n"))
    }
}

impl std::error::Error for SaveError {}

impl IntoIterator for SaveError {
    type Item = Outcome;
    type IntoIter = std::vec::IntoIter<Outcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

/// A remote call that failed while flushing one sub-batch.
///
/// The failed queue is still pending on the saver. `results` is the state of
/// the aggregated results at the moment of failure: everything merged by
/// earlier sub-batches since the last `clear`.
#[derive(Debug, Error)]
#[error("Flush of {kind} batch{} ({size} items) failed: {source}", .object_type.as_ref().map(|t| format!(" for {}", t)).unwrap_or_default())]
pub struct FlushError {
    pub kind: BatchKind,
    /// `None` for the untyped delete queue.
    pub object_type: Option<String>,
    pub size: usize,
    pub results: AggregatedResults,
    #[source]
    pub source: Error,
}
