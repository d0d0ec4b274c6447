//! Bulk saver: queues records per kind and object type and flushes them in
//! size-bounded batches.

use super::config::{check_limit, BulkSaverConfig};
use super::queue::{BatchKind, QueueFamily, TypedQueue};
use super::registry::MatchFieldRegistry;
use super::results::AggregatedResults;
use crate::client::RemoteClient;
use crate::error::FlushError;
use crate::hooks::{BatchHook, BatchRequest, HookSet};
use crate::types::{Outcome, Record};
use crate::{Error, ErrorContext, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Accumulates creates, updates, upserts and deletes and issues them to a
/// [`RemoteClient`] in batches of at most the configured limit.
///
/// A queue is flushed automatically when a new item arrives and the queue is
/// already full, so every remote call is maximally packed. [`flush`](Self::flush)
/// drains whatever is left, deletes first, then creates, updates and upserts,
/// each family in the order its object types were first seen.
///
/// Flushing is not atomic. When a remote call fails, the error is returned at
/// once as [`Error::Flush`]: the failing queue stays pending, outcomes merged
/// earlier are kept, and queues later in the order are not attempted. Calling
/// `flush` again resumes from whatever is still pending.
///
/// All mutating operations take `&mut self`; share an instance across tasks
/// only behind a mutex.
pub struct BulkSaver<C, R> {
    client: C,
    config: BulkSaverConfig,
    deletes: TypedQueue<String>,
    /// Create, update and upsert queues, indexed by [`family_index`].
    families: [QueueFamily<R>; 3],
    match_fields: MatchFieldRegistry,
    results: AggregatedResults,
    hooks: HookSet,
}

fn family_index(kind: BatchKind) -> usize {
    match kind {
        BatchKind::Create => 0,
        BatchKind::Update => 1,
        BatchKind::Upsert => 2,
        BatchKind::Delete => unreachable!("delete queue is not partitioned by object type"),
    }
}

impl<C, R> BulkSaver<C, R>
where
    C: RemoteClient<R>,
    R: Record,
{
    pub fn new(client: C) -> Self {
        Self {
            client,
            config: BulkSaverConfig::default(),
            deletes: TypedQueue::new(),
            families: [QueueFamily::new(), QueueFamily::new(), QueueFamily::new()],
            match_fields: MatchFieldRegistry::new(),
            results: AggregatedResults::new(),
            hooks: HookSet::new(),
        }
    }

    pub fn with_config(client: C, config: BulkSaverConfig) -> Result<Self> {
        config.validate()?;
        let mut saver = Self::new(client);
        saver.config = config;
        Ok(saver)
    }

    pub fn with_hook(mut self, hook: Arc<dyn BatchHook>) -> Self {
        self.hooks.register(hook);
        self
    }

    pub fn hooks_mut(&mut self) -> &mut HookSet {
        &mut self.hooks
    }

    /// Queues `record` of `object_type`.
    ///
    /// - with a non-empty `match_field`: upsert, and `match_field` becomes the
    ///   match field for every upsert of `object_type` still pending
    /// - else, when the record has an identifier (even an empty one): update
    /// - else: create
    ///
    /// If the destination queue is already full it is flushed first. When that
    /// flush fails the error is returned and `record` is not queued.
    pub async fn save(
        &mut self,
        record: R,
        object_type: &str,
        match_field: Option<&str>,
    ) -> Result<()> {
        let kind = match match_field.filter(|f| !f.is_empty()) {
            Some(field) => {
                if let Some(previous) = self.match_fields.set(object_type, field) {
                    if previous != field {
                        warn!(
                            object_type,
                            previous = %previous,
                            match_field = field,
                            "upsert match field replaced for pending records"
                        );
                    }
                }
                BatchKind::Upsert
            }
            None if record.id().is_some() => BatchKind::Update,
            None => BatchKind::Create,
        };

        let family = family_index(kind);
        let slot = self.families[family].slot(object_type);
        if self.families[family]
            .at(slot)
            .1
            .is_at_capacity(self.config.save_limit)
        {
            debug!(%kind, object_type, limit = self.config.save_limit, "auto-flushing full queue");
            self.flush_queue(kind, slot).await?;
        }
        self.families[family].at_mut(slot).push(record);
        Ok(())
    }

    /// Queues the identifier of `record` for deletion.
    ///
    /// Fails with [`Error::Validation`] if the record has no identifier or an
    /// empty one; nothing is queued in that case. Auto-flushes the delete queue
    /// first when it is full.
    pub async fn delete<D>(&mut self, record: &D) -> Result<()>
    where
        D: Record + ?Sized,
    {
        let id = match record.id() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                return Err(Error::validation_with_context(
                    "only records with an identifier can be deleted",
                    ErrorContext::new()
                        .with_field_path("Id")
                        .with_source("bulk_saver"),
                ))
            }
        };

        if self.deletes.is_at_capacity(self.config.delete_limit) {
            debug!(limit = self.config.delete_limit, "auto-flushing full delete queue");
            self.flush_queue(BatchKind::Delete, 0).await?;
        }
        self.deletes.push(id);
        Ok(())
    }

    /// Submits every pending queue and returns all results accumulated since
    /// the last [`clear`](Self::clear), auto-flushes included.
    pub async fn flush(&mut self) -> Result<&AggregatedResults> {
        info!(pending = self.pending_len(), "flushing bulk saver");
        for kind in BatchKind::FLUSH_ORDER {
            if kind == BatchKind::Delete {
                self.flush_queue(kind, 0).await?;
                continue;
            }
            for slot in 0..self.families[family_index(kind)].len() {
                self.flush_queue(kind, slot).await?;
            }
        }
        debug!(outcomes = self.results.len(), "flush complete");
        Ok(&self.results)
    }

    /// Empties every queue and the aggregated results.
    pub fn clear(&mut self) {
        self.deletes.clear();
        for family in &mut self.families {
            family.clear();
        }
        self.results.reset();
    }

    pub fn save_limit(&self) -> usize {
        self.config.save_limit
    }

    /// Applies from the next capacity check; queued items are left as they are.
    pub fn set_save_limit(&mut self, limit: usize) -> Result<()> {
        check_limit(limit, "save_limit")?;
        self.config.save_limit = limit;
        Ok(())
    }

    pub fn delete_limit(&self) -> usize {
        self.config.delete_limit
    }

    /// Applies from the next capacity check; queued identifiers are left as they are.
    pub fn set_delete_limit(&mut self, limit: usize) -> Result<()> {
        check_limit(limit, "delete_limit")?;
        self.config.delete_limit = limit;
        Ok(())
    }

    pub fn config(&self) -> &BulkSaverConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn results(&self) -> &AggregatedResults {
        &self.results
    }

    pub fn pending_deletes(&self) -> &[String] {
        self.deletes.items()
    }

    /// Pending records of a create, update or upsert queue.
    pub fn pending(&self, kind: BatchKind, object_type: &str) -> Option<&[R]> {
        if kind == BatchKind::Delete {
            return None;
        }
        self.families[family_index(kind)]
            .get(object_type)
            .map(|q| q.items())
    }

    /// Total pending items across all queues.
    pub fn pending_len(&self) -> usize {
        self.deletes.len() + self.families.iter().map(|f| f.pending()).sum::<usize>()
    }

    pub fn match_field(&self, object_type: &str) -> Option<&str> {
        self.match_fields.get(object_type)
    }

    /// Submits one queue; on success merges its outcomes and empties it.
    async fn flush_queue(&mut self, kind: BatchKind, slot: usize) -> Result<()> {
        let Some(request) = self.prepare(kind, slot)? else {
            return Ok(());
        };
        self.hooks.request(&request).await;
        let result = self.dispatch(&request, slot).await;
        self.complete(&request, result).await?;
        match kind {
            BatchKind::Delete => self.deletes.clear(),
            _ => self.families[family_index(kind)].at_mut(slot).clear(),
        }
        Ok(())
    }

    fn prepare(&self, kind: BatchKind, slot: usize) -> Result<Option<BatchRequest>> {
        if kind == BatchKind::Delete {
            if self.deletes.is_empty() {
                return Ok(None);
            }
            return Ok(Some(BatchRequest {
                id: Uuid::new_v4().to_string(),
                kind,
                object_type: None,
                match_field: None,
                size: self.deletes.len(),
            }));
        }

        let (object_type, queue) = self.families[family_index(kind)].at(slot);
        if queue.is_empty() {
            return Ok(None);
        }
        let match_field = match kind {
            BatchKind::Upsert => Some(
                self.match_fields
                    .get(object_type)
                    .ok_or_else(|| {
                        Error::runtime_with_context(
                            "no match field registered for pending upserts",
                            ErrorContext::new()
                                .with_field_path(object_type)
                                .with_source("bulk_saver"),
                        )
                    })?
                    .to_string(),
            ),
            _ => None,
        };
        Ok(Some(BatchRequest {
            id: Uuid::new_v4().to_string(),
            kind,
            object_type: Some(object_type.to_string()),
            match_field,
            size: queue.len(),
        }))
    }

    async fn dispatch(&self, request: &BatchRequest, slot: usize) -> Result<Vec<Outcome>> {
        if request.kind == BatchKind::Delete {
            return self.client.delete(self.deletes.items()).await;
        }
        let (object_type, queue) = self.families[family_index(request.kind)].at(slot);
        let records = queue.items();
        match request.kind {
            BatchKind::Create => self.client.create(records, object_type).await,
            BatchKind::Update => self.client.update(records, object_type).await,
            _ => {
                let match_field = request.match_field.as_deref().unwrap_or_default();
                self.client.upsert(match_field, records, object_type).await
            }
        }
    }

    async fn complete(
        &mut self,
        request: &BatchRequest,
        result: Result<Vec<Outcome>>,
    ) -> Result<()> {
        match result {
            Ok(outcomes) => {
                self.hooks.response(request, &outcomes).await;
                debug!(
                    kind = %request.kind,
                    object_type = request.object_type.as_deref().unwrap_or("-"),
                    submitted = request.size,
                    outcomes = outcomes.len(),
                    "batch submitted"
                );
                self.results.merge(request.kind, outcomes);
                Ok(())
            }
            Err(source) => {
                self.hooks.fault(request, &source).await;
                warn!(
                    kind = %request.kind,
                    object_type = request.object_type.as_deref().unwrap_or("-"),
                    size = request.size,
                    error = %source,
                    "batch failed; queue kept for the next flush"
                );
                Err(Error::Flush(Box::new(FlushError {
                    kind: request.kind,
                    object_type: request.object_type.clone(),
                    size: request.size,
                    results: self.results.snapshot(),
                    source,
                })))
            }
        }
    }
}
