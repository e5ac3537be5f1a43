//! Base coercers: conversions from one raw string to one typed value.
//!
//! A coercer never sees the parameter map and knows nothing about presence;
//! see [`crate::presence`] for that.

use std::marker::PhantomData;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};

use crate::error::CoerceError;

pub trait Coercer {
    type Output;

    /// # Errors
    /// Returns [`CoerceError`] when `raw` is not a valid literal for the
    /// target type.
    fn coerce(&self, raw: &str) -> Result<Self::Output, CoerceError>;
}

/// Identity conversion. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValue;

impl Coercer for StringValue {
    type Output = String;

    fn coerce(&self, raw: &str) -> Result<String, CoerceError> {
        Ok(raw.to_owned())
    }
}

/// Accepts exactly `true` or `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolValue;

impl Coercer for BoolValue {
    type Output = bool;

    fn coerce(&self, raw: &str) -> Result<bool, CoerceError> {
        match raw {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(CoerceError::Bool(other.to_owned())),
        }
    }
}

/// Base-10 integer of type `T`, range checked by `T`'s own parser.
#[derive(Debug, Clone, Copy)]
pub struct IntValue<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T> Default for IntValue<T> {
    fn default() -> Self {
        Self {
            _target: PhantomData,
        }
    }
}

impl<T> Coercer for IntValue<T>
where
    T: FromStr<Err = ParseIntError>,
{
    type Output = T;

    fn coerce(&self, raw: &str) -> Result<T, CoerceError> {
        Ok(raw.parse::<T>()?)
    }
}

/// Calendar date in `YYYY-MM-DD` form, resolved to midnight in `tz`.
#[derive(Debug, Clone, Copy)]
pub struct DateValue<Tz> {
    tz: Tz,
}

impl<Tz: TimeZone> DateValue<Tz> {
    #[must_use]
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl<Tz: TimeZone> Coercer for DateValue<Tz> {
    type Output = DateTime<Tz>;

    fn coerce(&self, raw: &str) -> Result<DateTime<Tz>, CoerceError> {
        if !is_date_shaped(raw) {
            return Err(CoerceError::DateFormat(raw.to_owned()));
        }
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
        // Skipped midnights (DST gaps) have no earliest mapping.
        self.tz
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or(CoerceError::NoLocalMidnight(date))
    }
}

fn is_date_shaped(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// UUID in canonical hyphenated form (`8-4-4-4-12` hex digits).
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidValue;

impl Coercer for UuidValue {
    type Output = uuid::Uuid;

    fn coerce(&self, raw: &str) -> Result<uuid::Uuid, CoerceError> {
        // The uuid crate also accepts simple, braced and URN spellings.
        if raw.len() != 36 {
            return Err(CoerceError::UuidFormat(raw.to_owned()));
        }
        Ok(uuid::Uuid::parse_str(raw)?)
    }
}

#[must_use]
pub fn string() -> StringValue {
    StringValue
}

#[must_use]
pub fn boolean() -> BoolValue {
    BoolValue
}

#[must_use]
pub fn int<T>() -> IntValue<T>
where
    T: FromStr<Err = ParseIntError>,
{
    IntValue::default()
}

#[must_use]
pub fn date<Tz: TimeZone>(tz: Tz) -> DateValue<Tz> {
    DateValue::new(tz)
}

#[must_use]
pub fn uuid() -> UuidValue {
    UuidValue
}
