//! 事件钩子模块：在每次批量远程调用前后触发的观察者。
//!
//! # Batch Hooks
//!
//! Observers notified around every remote call the bulk saver makes, whether
//! triggered by `flush` or by an auto-flush.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`BatchHook`] | Trait with request / response / fault callbacks |
//! | [`BatchRequest`] | Describes one sub-batch submission |
//! | [`HookSet`] | Ordered set of registered hooks |
//! | [`LogHook`] | Emits every event through `tracing` |
//! | [`RecordingHook`] | Keeps events in memory, for tests and diagnostics |
//!
//! Hooks observe only. They cannot fail or alter a flush.

use crate::batch::BatchKind;
use crate::types::Outcome;
use crate::Error;
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// One sub-batch about to be (or just) submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    /// Correlation id, unique per remote call.
    pub id: String,
    pub kind: BatchKind,
    /// `None` for deletes.
    pub object_type: Option<String>,
    /// Upserts only.
    pub match_field: Option<String>,
    pub size: usize,
}

#[async_trait]
pub trait BatchHook: Send + Sync {
    fn name(&self) -> &str;

    async fn on_request(&self, _request: &BatchRequest) {}

    async fn on_response(&self, _request: &BatchRequest, _outcomes: &[Outcome]) {}

    async fn on_fault(&self, _request: &BatchRequest, _error: &Error) {}
}

/// Hooks in registration order.
#[derive(Clone, Default)]
pub struct HookSet {
    hooks: Vec<Arc<dyn BatchHook>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Arc<dyn BatchHook>) {
        self.hooks.push(hook);
    }

    /// Removes every hook named `name`; returns whether any was removed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let len = self.hooks.len();
        self.hooks.retain(|h| h.name() != name);
        self.hooks.len() < len
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub async fn request(&self, request: &BatchRequest) {
        for h in &self.hooks {
            h.on_request(request).await;
        }
    }

    pub async fn response(&self, request: &BatchRequest, outcomes: &[Outcome]) {
        for h in &self.hooks {
            h.on_response(request, outcomes).await;
        }
    }

    pub async fn fault(&self, request: &BatchRequest, error: &Error) {
        for h in &self.hooks {
            h.on_fault(request, error).await;
        }
    }
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|h| h.name()))
            .finish()
    }
}

/// Logs requests and responses at `info`, faults at `error`.
#[derive(Debug, Clone, Default)]
pub struct LogHook;

#[async_trait]
impl BatchHook for LogHook {
    fn name(&self) -> &str {
        "log"
    }

    async fn on_request(&self, request: &BatchRequest) {
        tracing::info!(
            request_id = %request.id,
            kind = %request.kind,
            object_type = request.object_type.as_deref().unwrap_or("-"),
            match_field = request.match_field.as_deref().unwrap_or("-"),
            size = request.size,
            "bulk request"
        );
    }

    async fn on_response(&self, request: &BatchRequest, outcomes: &[Outcome]) {
        let failed = outcomes.iter().filter(|o| !o.success).count();
        tracing::info!(
            request_id = %request.id,
            kind = %request.kind,
            outcomes = outcomes.len(),
            failed,
            "bulk response"
        );
    }

    async fn on_fault(&self, request: &BatchRequest, error: &Error) {
        tracing::error!(
            request_id = %request.id,
            kind = %request.kind,
            object_type = request.object_type.as_deref().unwrap_or("-"),
            size = request.size,
            error = %error,
            "bulk fault"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    Request(BatchRequest),
    Response {
        request: BatchRequest,
        outcomes: usize,
        failed: usize,
    },
    Fault {
        request: BatchRequest,
        error: String,
    },
}

impl HookEvent {
    pub fn request(&self) -> &BatchRequest {
        match self {
            HookEvent::Request(r) => r,
            HookEvent::Response { request, .. } | HookEvent::Fault { request, .. } => request,
        }
    }
}

/// In-memory hook for testing.
#[derive(Debug, Default)]
pub struct RecordingHook {
    events: RwLock<Vec<HookEvent>>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HookEvent> {
        self.events.read().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.write() {
            events.clear();
        }
    }

    fn push(&self, event: HookEvent) {
        if let Ok(mut events) = self.events.write() {
            events.push(event);
        }
    }
}

#[async_trait]
impl BatchHook for RecordingHook {
    fn name(&self) -> &str {
        "recording"
    }

    async fn on_request(&self, request: &BatchRequest) {
        self.push(HookEvent::Request(request.clone()));
    }

    async fn on_response(&self, request: &BatchRequest, outcomes: &[Outcome]) {
        self.push(HookEvent::Response {
            request: request.clone(),
            outcomes: outcomes.len(),
            failed: outcomes.iter().filter(|o| !o.success).count(),
        });
    }

    async fn on_fault(&self, request: &BatchRequest, error: &Error) {
        self.push(HookEvent::Fault {
            request: request.clone(),
            error: error.to_string(),
        });
    }
}
