//! Aggregated flush results.

use super::queue::BatchKind;
use crate::types::Outcome;
use serde::Serialize;

/// Outcomes accumulated across flushes and auto-flushes, one sequence per kind.
///
/// Append-only until [`reset`](Self::reset); arrival order is preserved and
/// nothing is deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedResults {
    pub created: Vec<Outcome>,
    pub updated: Vec<Outcome>,
    pub upserted: Vec<Outcome>,
    pub deleted: Vec<Outcome>,
}

impl AggregatedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, kind: BatchKind, outcomes: Vec<Outcome>) {
        self.get_mut(kind).extend(outcomes);
    }

    pub fn get(&self, kind: BatchKind) -> &[Outcome] {
        match kind {
            BatchKind::Create => &self.created,
            BatchKind::Update => &self.updated,
            BatchKind::Upsert => &self.upserted,
            BatchKind::Delete => &self.deleted,
        }
    }

    fn get_mut(&mut self, kind: BatchKind) -> &mut Vec<Outcome> {
        match kind {
            BatchKind::Create => &mut self.created,
            BatchKind::Update => &mut self.updated,
            BatchKind::Upsert => &mut self.upserted,
            BatchKind::Delete => &mut self.deleted,
        }
    }

    pub fn snapshot(&self) -> AggregatedResults {
        self.clone()
    }

    pub fn reset(&mut self) {
        self.created.clear();
        self.updated.clear();
        self.upserted.clear();
        self.deleted.clear();
    }

    /// Total number of outcomes across all four kinds.
    pub fn len(&self) -> usize {
        self.created.len() + self.updated.len() + self.upserted.len() + self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Failing outcomes with the kind they were recorded under, in flush order.
    pub fn failures(&self) -> impl Iterator<Item = (BatchKind, &Outcome)> {
        BatchKind::FLUSH_ORDER.into_iter().flat_map(move |kind| {
            self.get(kind)
                .iter()
                .filter(|o| !o.success)
                .map(move |o| (kind, o))
        })
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures().next().is_none()
    }
}
