//! Per-record outcome of a remote batch call.

use serde::{Deserialize, Serialize};

/// One error reported by the remote service for a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeError {
    /// Service status code, e.g. `REQUIRED_FIELD_MISSING`.
    pub status_code: String,
    pub message: String,
    /// Fields implicated by the failure, if the service reports them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl OutcomeError {
    pub fn new(status_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code: status_code.into(),
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}

/// Result for one submitted record (or one identifier, for deletes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Record id; assigned by the service for creates and upserts.
    #[serde(default)]
    pub id: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<OutcomeError>,
    /// Upserts only: whether the record was inserted rather than updated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
}

impl Outcome {
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            success: true,
            errors: Vec::new(),
            created: None,
        }
    }

    pub fn failure(id: Option<String>, errors: Vec<OutcomeError>) -> Self {
        Self {
            id,
            success: false,
            errors,
            created: None,
        }
    }

    pub fn with_created(mut self, created: bool) -> Self {
        self.created = Some(created);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Message of the first reported error, if any.
    pub fn first_error_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}
