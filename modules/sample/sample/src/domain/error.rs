use sample_sdk::PageError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("sample {id} not found")]
    NotFound { id: Uuid },

    #[error("invalid page: {0}")]
    InvalidPage(#[from] PageError),

    #[error("database error: {0:#}")]
    Database(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }
}
