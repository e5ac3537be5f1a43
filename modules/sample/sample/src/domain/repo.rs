use async_trait::async_trait;
use sample_sdk::{Sample, UpdateQuery};
use uuid::Uuid;

/// Rows matching a name search: the full match count and the requested window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleMatches {
    pub total: i64,
    pub samples: Vec<Sample>,
}

/// Persistence port for samples.
///
/// Soft-deleted rows are retained but never returned by `find_by_id` or
/// `find_by_name_like`. Identity is assigned by the caller before `insert`.
#[async_trait]
pub trait SampleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Sample>>;

    /// Visible samples whose name contains `pattern`, oldest first.
    /// `total` counts every match, not just the returned window.
    async fn find_by_name_like(
        &self,
        pattern: &str,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<SampleMatches>;

    async fn insert(&self, sample: Sample) -> anyhow::Result<()>;

    /// Writes only the supplied fields. Unknown ids are not an error.
    async fn update(&self, update: UpdateQuery) -> anyhow::Result<()>;

    /// Marks the row deleted. Unknown or already deleted ids are not an error.
    async fn delete_by_id(&self, id: Uuid) -> anyhow::Result<()>;
}
