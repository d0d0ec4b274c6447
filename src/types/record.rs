//! Record abstraction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A domain entity that can be queued for create, update, upsert or delete.
///
/// The only property the batching engine reads is the identifier:
/// - `None`: the identifier is absent or null, the record is new
/// - `Some("")`: present but empty, which still routes `save` to update
///   but is rejected by `delete`
///
/// The object type is always supplied by the caller alongside the record.
pub trait Record: Send + Sync {
    fn id(&self) -> Option<&str>;
}

/// Generic sObject: an optional `Id` plus free-form fields.
///
/// Serializes flat, so `SObject::new().with_field("Name", "Acme")` becomes
/// `{"Name": "Acme"}` and an identified record carries `"Id"` alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SObject {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Record for SObject {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
