use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::routes;
use crate::config::{ConfigError, SampleConfig};
use crate::domain::repo::SampleRepository;
use crate::domain::service::SampleService;
use crate::infra::storage::{InMemorySampleRepository, Migrator, SeaOrmSampleRepository};

/// Wires a repository, the service and the REST routes together.
pub struct SampleModule {
    service: Arc<SampleService>,
}

impl SampleModule {
    /// # Errors
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn new(repo: Arc<dyn SampleRepository>, config: &SampleConfig) -> Result<Self, ConfigError> {
        let service = SampleService::new(repo, config.service_config()?);
        Ok(Self {
            service: Arc::new(service),
        })
    }

    /// Module backed by process memory; nothing survives a restart.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if `config` is invalid.
    pub fn in_memory(config: &SampleConfig) -> Result<Self, ConfigError> {
        Self::new(Arc::new(InMemorySampleRepository::new()), config)
    }

    /// Module backed by `db`, optionally bringing the schema up to date first.
    ///
    /// # Errors
    /// Fails if `config` is invalid or migrations fail.
    pub async fn with_database(
        db: DatabaseConnection,
        config: &SampleConfig,
        run_migrations: bool,
    ) -> anyhow::Result<Self> {
        if run_migrations {
            Migrator::up(&db, None)
                .await
                .context("failed to run sample migrations")?;
            info!("Sample schema is up to date");
        }
        let zone = config.zone()?;
        Ok(Self::new(
            Arc::new(SeaOrmSampleRepository::new(db, zone)),
            config,
        )?)
    }

    #[must_use]
    pub fn service(&self) -> Arc<SampleService> {
        self.service.clone()
    }

    #[must_use]
    pub fn router(&self) -> Router {
        routes::router(self.service.clone())
    }
}
