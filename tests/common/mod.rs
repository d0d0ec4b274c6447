//! Shared test fixtures: a recording remote client with failure injection.

#![allow(dead_code)]

use async_trait::async_trait;
use bulk_saver::{BatchKind, Error, Outcome, OutcomeError, RemoteClient, Result, SObject};
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Create {
        object_type: String,
        records: Vec<SObject>,
    },
    Update {
        object_type: String,
        records: Vec<SObject>,
    },
    Upsert {
        match_field: String,
        object_type: String,
        records: Vec<SObject>,
    },
    Delete {
        ids: Vec<String>,
    },
}

impl Call {
    pub fn kind(&self) -> BatchKind {
        match self {
            Call::Create { .. } => BatchKind::Create,
            Call::Update { .. } => BatchKind::Update,
            Call::Upsert { .. } => BatchKind::Upsert,
            Call::Delete { .. } => BatchKind::Delete,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Call::Create { records, .. }
            | Call::Update { records, .. }
            | Call::Upsert { records, .. } => records.len(),
            Call::Delete { ids } => ids.len(),
        }
    }

    pub fn object_type(&self) -> Option<&str> {
        match self {
            Call::Create { object_type, .. }
            | Call::Update { object_type, .. }
            | Call::Upsert { object_type, .. } => Some(object_type),
            Call::Delete { .. } => None,
        }
    }
}

/// Remote client that records every call and answers one outcome per item.
///
/// Kinds marked with [`fail`](Self::fail) raise a remote error without
/// recording the call. Records whose `Name` is `"INVALID"` get a failing
/// outcome.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<BatchKind>>,
    attempts: Mutex<Vec<BatchKind>>,
    next_id: Mutex<usize>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, kind: BatchKind) {
        self.failing.lock().unwrap().insert(kind);
    }

    pub fn recover(&self, kind: BatchKind) {
        self.failing.lock().unwrap().remove(&kind);
    }

    /// Successful calls, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Every attempted call, failed ones included.
    pub fn attempts(&self) -> Vec<BatchKind> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn sizes(&self, kind: BatchKind) -> Vec<usize> {
        self.calls()
            .iter()
            .filter(|c| c.kind() == kind)
            .map(Call::size)
            .collect()
    }

    fn record(&self, call: Call) -> Result<()> {
        let kind = call.kind();
        self.attempts.lock().unwrap().push(kind);
        if self.failing.lock().unwrap().contains(&kind) {
            return Err(Error::Remote {
                status: 503,
                code: "SERVER_UNAVAILABLE".to_string(),
                message: format!("{kind} unavailable"),
            });
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }

    fn outcome_for(&self, record: &SObject) -> Outcome {
        if record.field("Name").and_then(|v| v.as_str()) == Some("INVALID") {
            return Outcome::failure(
                record.id.clone(),
                vec![OutcomeError::new("FIELD_CUSTOM_VALIDATION_EXCEPTION", "Name is invalid")],
            );
        }
        match &record.id {
            Some(id) if !id.is_empty() => Outcome::success(id.clone()),
            _ => {
                let mut next = self.next_id.lock().unwrap();
                *next += 1;
                Outcome::success(format!("new-{}", *next))
            }
        }
    }
}

#[async_trait]
impl RemoteClient<SObject> for RecordingClient {
    async fn create(&self, records: &[SObject], object_type: &str) -> Result<Vec<Outcome>> {
        self.record(Call::Create {
            object_type: object_type.to_string(),
            records: records.to_vec(),
        })?;
        Ok(records.iter().map(|r| self.outcome_for(r)).collect())
    }

    async fn update(&self, records: &[SObject], object_type: &str) -> Result<Vec<Outcome>> {
        self.record(Call::Update {
            object_type: object_type.to_string(),
            records: records.to_vec(),
        })?;
        Ok(records.iter().map(|r| self.outcome_for(r)).collect())
    }

    async fn upsert(
        &self,
        match_field: &str,
        records: &[SObject],
        object_type: &str,
    ) -> Result<Vec<Outcome>> {
        self.record(Call::Upsert {
            match_field: match_field.to_string(),
            object_type: object_type.to_string(),
            records: records.to_vec(),
        })?;
        Ok(records
            .iter()
            .map(|r| self.outcome_for(r).with_created(r.id.is_none()))
            .collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<Vec<Outcome>> {
        self.record(Call::Delete { ids: ids.to_vec() })?;
        Ok(ids.iter().map(|id| Outcome::success(id.clone())).collect())
    }
}

pub fn account(name: &str) -> SObject {
    SObject::new().with_field("Name", name)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
