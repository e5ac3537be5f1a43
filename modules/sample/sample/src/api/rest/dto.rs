use chrono::{DateTime, FixedOffset};
use sample_sdk::{PagedSamples, Sample};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// REST DTO for a sample. Keys and their order are part of the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SampleDto {
    #[serde(rename = "ID")]
    pub id: Uuid,
    #[serde(rename = "Name")]
    pub name: String,
    /// Local midnight, e.g. `1994-09-14T00:00:00+09:00`.
    #[serde(rename = "Birthday")]
    pub birthday: DateTime<FixedOffset>,
    #[serde(rename = "IsJapanese")]
    pub is_japanese: bool,
}

/// REST DTO for one page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PagedSamplesDto {
    /// Number of visible matches across all pages.
    #[serde(rename = "Total")]
    pub total: u64,
    #[serde(rename = "Samples")]
    pub samples: Vec<SampleDto>,
}

/// Response to a successful add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AddedSampleDto {
    #[serde(rename = "ID")]
    pub id: Uuid,
}

/// Response to an edit. Note the lowercase key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EditedSampleDto {
    pub id: Uuid,
}

impl From<Sample> for SampleDto {
    fn from(s: Sample) -> Self {
        Self {
            id: s.id,
            name: s.name,
            birthday: s.birthday,
            is_japanese: s.is_japanese,
        }
    }
}

impl From<PagedSamples> for PagedSamplesDto {
    fn from(page: PagedSamples) -> Self {
        let (total, samples) = page.into_parts();
        Self {
            total,
            samples: samples.into_iter().map(Into::into).collect(),
        }
    }
}
