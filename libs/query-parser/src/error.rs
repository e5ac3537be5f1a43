use chrono::NaiveDate;
use thiserror::Error;

/// Failure to convert a raw parameter value into the target type.
#[derive(Debug, Error)]
pub enum CoerceError {
    #[error("invalid boolean literal {0:?}, expected \"true\" or \"false\"")]
    Bool(String),

    #[error("invalid integer: {0}")]
    Int(#[from] std::num::ParseIntError),

    #[error("date {0:?} is not in YYYY-MM-DD form")]
    DateFormat(String),

    #[error("invalid date: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("midnight of {0} does not exist in the configured time zone")]
    NoLocalMidnight(NaiveDate),

    #[error("uuid {0:?} is not in canonical hyphenated form")]
    UuidFormat(String),

    #[error("invalid uuid: {0}")]
    Uuid(#[from] uuid::Error),
}

/// Failure to extract a named parameter.
///
/// Always scoped to a single key; callers stop at the first failing field.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("{key:?} not found")]
    KeyNotFound { key: &'static str },

    #[error("malformed value for {key:?}: {source}")]
    MalformedValue {
        key: &'static str,
        #[source]
        source: CoerceError,
    },
}

impl QueryError {
    /// Name of the parameter that failed.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::KeyNotFound { key } | Self::MalformedValue { key, .. } => key,
        }
    }

    #[must_use]
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. })
    }
}
