use std::sync::Arc;

use chrono::{FixedOffset, Offset, Utc};
use sample_sdk::{AddQuery, PagedSamples, Sample, SearchQuery, UpdateQuery};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::SampleRepository;

pub struct ServiceConfig {
    pub default_limit: u64,
    pub default_offset: u64,
    /// Offset in which birthdays are expressed.
    pub zone: FixedOffset,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            default_offset: 0,
            zone: Utc.fix(),
        }
    }
}

pub struct SampleService {
    repo: Arc<dyn SampleRepository>,
    config: ServiceConfig,
}

impl SampleService {
    #[must_use]
    pub fn new(repo: Arc<dyn SampleRepository>, config: ServiceConfig) -> Self {
        Self { repo, config }
    }

    #[must_use]
    pub fn zone(&self) -> FixedOffset {
        self.config.zone
    }

    #[instrument(name = "sample.service.get", skip(self), fields(sample.id = %id))]
    pub async fn get(&self, id: Uuid) -> Result<Sample, DomainError> {
        debug!("Getting sample by id");
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(id))
    }

    #[instrument(
        name = "sample.service.search",
        skip(self, query),
        fields(sample.name = %query.name)
    )]
    pub async fn search(&self, query: SearchQuery) -> Result<PagedSamples, DomainError> {
        let limit = query.limit.unwrap_or(self.config.default_limit);
        let offset = query.offset.unwrap_or(self.config.default_offset);
        debug!(limit, offset, "Searching samples");

        let matches = self
            .repo
            .find_by_name_like(&query.name, offset, limit)
            .await?;
        Ok(PagedSamples::new(matches.total, matches.samples)?)
    }

    #[instrument(name = "sample.service.add", skip(self, query))]
    pub async fn add(&self, query: AddQuery) -> Result<Uuid, DomainError> {
        let sample = query.into_sample(Uuid::new_v4());
        let id = sample.id;
        self.repo.insert(sample).await?;
        info!(sample.id = %id, "Added sample");
        Ok(id)
    }

    /// Applies the supplied fields. An unknown id is not reported.
    #[instrument(name = "sample.service.edit", skip(self, update), fields(sample.id = %update.id))]
    pub async fn edit(&self, update: UpdateQuery) -> Result<Uuid, DomainError> {
        let id = update.id;
        if update.is_noop() {
            debug!("Edit supplies no fields");
        }
        self.repo.update(update).await?;
        info!("Edited sample");
        Ok(id)
    }

    /// Soft-deletes the sample. An unknown or already deleted id is not reported.
    #[instrument(name = "sample.service.delete", skip(self), fields(sample.id = %id))]
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete_by_id(id).await?;
        info!("Deleted sample");
        Ok(())
    }
}
