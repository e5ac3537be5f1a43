//! Row <-> domain conversions.
//!
//! Only the calendar date of a birthday is stored; the zone is re-applied
//! on the way out.

use anyhow::Context;
use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};
use sample_sdk::{Birthday, Sample};

use super::entity::Model;

/// Local midnight of `date` in `zone`.
///
/// # Errors
/// Fails only if the resulting instant is out of chrono's range.
pub fn birthday_from_date(date: NaiveDate, zone: FixedOffset) -> anyhow::Result<Birthday> {
    zone.from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .with_context(|| format!("birthday {date} is out of range for offset {zone}"))
}

/// Calendar date of `birthday` in its own offset.
#[must_use]
pub fn date_from_birthday(birthday: &Birthday) -> NaiveDate {
    birthday.date_naive()
}

impl Model {
    /// # Errors
    /// See [`birthday_from_date`].
    pub fn into_sample(self, zone: FixedOffset) -> anyhow::Result<Sample> {
        Ok(Sample {
            id: self.id,
            birthday: birthday_from_date(self.birthday, zone)?,
            name: self.name,
            is_japanese: self.is_japanese,
        })
    }
}
