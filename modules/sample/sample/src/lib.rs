//! Sample Module Implementation
//!
//! Model types live in `sample-sdk` and are re-exported here.

pub use sample_sdk::{
    AddQuery, Birthday, PageError, PagedSamples, Sample, SearchQuery, Supplied, UpdateQuery,
};

pub mod module;
pub use module::SampleModule;

pub mod config;
pub use config::{ConfigError, SampleConfig};

#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
