//! Public models for the sample module.

use chrono::{DateTime, FixedOffset};
use thiserror::Error;
use uuid::Uuid;

/// Local midnight of the sample's birth date.
pub type Birthday = DateTime<FixedOffset>;

/// A stored sample record.
///
/// `id` is assigned once, when the sample is added, and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: Uuid,
    pub name: String,
    pub birthday: Birthday,
    pub is_japanese: bool,
}

impl Sample {
    /// Returns a copy of `self` with every supplied field of `update` replaced.
    ///
    /// The identity is always kept, even if `update.id` differs.
    #[must_use]
    pub fn with_update(&self, update: &UpdateQuery) -> Self {
        Self {
            id: self.id,
            name: update.name.as_ref().apply(&self.name).clone(),
            birthday: update.birthday.apply(self.birthday),
            is_japanese: update.is_japanese.apply(self.is_japanese),
        }
    }
}

/// Whether a field of a partial update was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Supplied<T> {
    /// Leave the stored value unchanged.
    #[default]
    Absent,
    /// Replace the stored value.
    Present(T),
}

impl<T> Supplied<T> {
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    #[must_use]
    pub fn as_ref(&self) -> Supplied<&T> {
        match self {
            Self::Absent => Supplied::Absent,
            Self::Present(v) => Supplied::Present(v),
        }
    }

    /// The supplied value, or `current` if absent.
    #[must_use]
    pub fn apply(self, current: T) -> T {
        match self {
            Self::Absent => current,
            Self::Present(v) => v,
        }
    }

    #[must_use]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Absent => None,
            Self::Present(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for Supplied<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

/// Command to create a sample. All fields are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddQuery {
    pub name: String,
    pub birthday: Birthday,
    pub is_japanese: bool,
}

impl AddQuery {
    #[must_use]
    pub fn into_sample(self, id: Uuid) -> Sample {
        Sample {
            id,
            name: self.name,
            birthday: self.birthday,
            is_japanese: self.is_japanese,
        }
    }
}

/// Partial update command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateQuery {
    pub id: Uuid,
    pub name: Supplied<String>,
    pub birthday: Supplied<Birthday>,
    pub is_japanese: Supplied<bool>,
}

impl UpdateQuery {
    /// An update that changes nothing.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            name: Supplied::Absent,
            birthday: Supplied::Absent,
            is_japanese: Supplied::Absent,
        }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        !(self.name.is_present() || self.birthday.is_present() || self.is_japanese.is_present())
    }
}

/// Name-substring search. Unset paging values fall back to service defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub name: String,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("total must be non-negative, got {0}")]
    NegativeTotal(i64),
}

/// One page of search results plus the size of the whole match set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedSamples {
    total: u64,
    samples: Vec<Sample>,
}

impl PagedSamples {
    /// # Errors
    /// [`PageError::NegativeTotal`] if `total < 0`.
    pub fn new(total: i64, samples: Vec<Sample>) -> Result<Self, PageError> {
        let total = u64::try_from(total).map_err(|_| PageError::NegativeTotal(total))?;
        Ok(Self { total, samples })
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn into_parts(self) -> (u64, Vec<Sample>) {
        (self.total, self.samples)
    }
}
