//! 远程客户端模块：定义批量保存引擎调用的四种远程操作。
//!
//! # Remote Client Module
//!
//! [`RemoteClient`] is the seam between the batching engine and the remote
//! record service. The engine hands each full (or flushed) queue to exactly
//! one of the four operations and records whatever outcomes come back.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`RemoteClient`] | Create / update / upsert / delete against the service |
//! | [`StrictClient`] | Adapter that raises [`SaveError`](crate::error::SaveError) on any failing outcome |
//! | [`RestClient`](crate::transport::http::RestClient) | sObject Collections REST implementation |
//!
//! Implementations decide whether per-record failures come back inline as
//! failing [`Outcome`]s or are raised as an error; the engine propagates
//! either unchanged.

mod strict;

pub use strict::StrictClient;

use crate::types::{Outcome, Record};
use crate::Result;
use async_trait::async_trait;

/// The four remote operations, each taking one batch.
///
/// Each call returns one outcome per submitted record (or per identifier for
/// `delete`), in submission order. An `Err` means the whole batch failed.
#[async_trait]
pub trait RemoteClient<R: Record>: Send + Sync {
    async fn create(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>>;

    async fn update(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>>;

    async fn upsert(
        &self,
        match_field: &str,
        records: &[R],
        object_type: &str,
    ) -> Result<Vec<Outcome>>;

    async fn delete(&self, ids: &[String]) -> Result<Vec<Outcome>>;
}

#[async_trait]
impl<R, C> RemoteClient<R> for std::sync::Arc<C>
where
    R: Record,
    C: RemoteClient<R> + ?Sized,
{
    async fn create(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>> {
        (**self).create(records, object_type).await
    }

    async fn update(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>> {
        (**self).update(records, object_type).await
    }

    async fn upsert(
        &self,
        match_field: &str,
        records: &[R],
        object_type: &str,
    ) -> Result<Vec<Outcome>> {
        (**self).upsert(match_field, records, object_type).await
    }

    async fn delete(&self, ids: &[String]) -> Result<Vec<Outcome>> {
        (**self).delete(ids).await
    }
}
