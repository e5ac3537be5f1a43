//! Sample SDK
//!
//! Transport-agnostic model types shared by the sample module and its
//! consumers:
//! - `Sample` and the `Birthday` timestamp alias
//! - `PagedSamples`, a count-checked page of search results
//! - `AddQuery`, `UpdateQuery` and `SearchQuery` commands
//! - `Supplied<T>`, the per-field "leave unchanged or replace" marker

#![forbid(unsafe_code)]

pub mod models;

pub use models::{
    AddQuery, Birthday, PageError, PagedSamples, Sample, SearchQuery, Supplied, UpdateQuery,
};
