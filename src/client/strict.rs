//! Strict client adapter.

use super::RemoteClient;
use crate::error::SaveError;
use crate::types::{Outcome, Record};
use crate::{Error, Result};
use async_trait::async_trait;
use std::marker::PhantomData;

/// Wraps a [`RemoteClient`] and raises [`Error::Save`] when any outcome of a
/// call failed.
///
/// Used with a bulk saver, this makes a single bad record fail the whole
/// sub-batch: the queue is kept for the next flush and nothing from that
/// call is merged into the results.
pub struct StrictClient<C, R> {
    inner: C,
    _record: PhantomData<fn(&R)>,
}

impl<C, R> StrictClient<C, R>
where
    C: RemoteClient<R>,
    R: Record,
{
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            _record: PhantomData,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

fn check(outcomes: Vec<Outcome>) -> Result<Vec<Outcome>> {
    let mut error = SaveError::new();
    for outcome in outcomes.iter().filter(|o| !o.success) {
        error.add(outcome.clone());
    }
    if error.is_empty() {
        Ok(outcomes)
    } else {
        Err(Error::Save(error))
    }
}

#[async_trait]
impl<C, R> RemoteClient<R> for StrictClient<C, R>
where
    C: RemoteClient<R>,
    R: Record,
{
    async fn create(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>> {
        check(self.inner.create(records, object_type).await?)
    }

    async fn update(&self, records: &[R], object_type: &str) -> Result<Vec<Outcome>> {
        check(self.inner.update(records, object_type).await?)
    }

    async fn upsert(
        &self,
        match_field: &str,
        records: &[R],
        object_type: &str,
    ) -> Result<Vec<Outcome>> {
        check(self.inner.upsert(match_field, records, object_type).await?)
    }

    async fn delete(&self, ids: &[String]) -> Result<Vec<Outcome>> {
        check(self.inner.delete(ids).await?)
    }
}
