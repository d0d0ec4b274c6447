//! Upsert match fields per object type.

use std::collections::HashMap;

/// Match field used for upserts of each object type.
///
/// One field per type: a later `set` for the same type replaces the previous
/// one and applies to everything still pending in that type's upsert queue.
#[derive(Debug, Clone, Default)]
pub struct MatchFieldRegistry {
    fields: HashMap<String, String>,
}

impl MatchFieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `match_field` for `object_type`, returning the field it replaced.
    pub fn set(
        &mut self,
        object_type: impl Into<String>,
        match_field: impl Into<String>,
    ) -> Option<String> {
        self.fields.insert(object_type.into(), match_field.into())
    }

    pub fn get(&self, object_type: &str) -> Option<&str> {
        self.fields.get(object_type).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
