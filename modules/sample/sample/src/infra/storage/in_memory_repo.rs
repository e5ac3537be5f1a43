//! In-memory implementation of the sample repository port.
//!
//! Used by tests and by the server's mock storage mode.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sample_sdk::{Sample, UpdateQuery};
use uuid::Uuid;

use crate::domain::repo::{SampleMatches, SampleRepository};

struct StoredSample {
    /// Insertion order, stands in for `created_at`.
    seq: u64,
    sample: Sample,
    deleted_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct State {
    next_seq: u64,
    rows: HashMap<Uuid, StoredSample>,
}

#[derive(Default)]
pub struct InMemorySampleRepository {
    state: RwLock<State>,
}

impl InMemorySampleRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, soft-deleted ones included.
    #[must_use]
    pub fn stored_len(&self) -> usize {
        self.state.read().rows.len()
    }

    /// When `id` was soft-deleted, if it was.
    #[must_use]
    pub fn deleted_at(&self, id: Uuid) -> Option<DateTime<Utc>> {
        self.state.read().rows.get(&id).and_then(|r| r.deleted_at)
    }
}

#[async_trait]
impl SampleRepository for InMemorySampleRepository {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Sample>> {
        let state = self.state.read();
        Ok(state
            .rows
            .get(&id)
            .filter(|r| r.deleted_at.is_none())
            .map(|r| r.sample.clone()))
    }

    async fn find_by_name_like(
        &self,
        pattern: &str,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<SampleMatches> {
        let state = self.state.read();
        let mut matching: Vec<&StoredSample> = state
            .rows
            .values()
            .filter(|r| r.deleted_at.is_none() && r.sample.name.contains(pattern))
            .collect();
        matching.sort_by_key(|r| r.seq);

        let total = i64::try_from(matching.len())?;
        let samples = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|r| r.sample.clone())
            .collect();

        Ok(SampleMatches { total, samples })
    }

    async fn insert(&self, sample: Sample) -> anyhow::Result<()> {
        let mut state = self.state.write();
        if state.rows.contains_key(&sample.id) {
            anyhow::bail!("sample {} already exists", sample.id);
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state.rows.insert(
            sample.id,
            StoredSample {
                seq,
                sample,
                deleted_at: None,
            },
        );
        Ok(())
    }

    async fn update(&self, update: UpdateQuery) -> anyhow::Result<()> {
        let mut state = self.state.write();
        if let Some(row) = state.rows.get_mut(&update.id) {
            row.sample = row.sample.with_update(&update);
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()> {
        let mut state = self.state.write();
        if let Some(row) = state.rows.get_mut(&id) {
            row.deleted_at.get_or_insert_with(Utc::now);
        }
        Ok(())
    }
}
