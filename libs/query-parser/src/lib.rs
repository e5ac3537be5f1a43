//! Typed extraction of single values from flat query parameter sets.
//!
//! A parser is assembled in three steps:
//!
//! 1. pick a base coercer ([`coerce::string`], [`coerce::boolean`],
//!    [`coerce::int`], [`coerce::date`], [`coerce::uuid`]), which only turns
//!    a raw string into the target type;
//! 2. apply exactly one presence policy, [`CoercerExt::required`] or
//!    [`CoercerExt::or_nil`];
//! 3. bind the result to a parameter name with `.key(..)`.
//!
//! ```
//! use query_parser::{coerce, CoercerExt, QueryError, QueryParams};
//!
//! let params = QueryParams::parse("limit=10&name=ninja");
//!
//! let parse_name = coerce::string().required().key("name");
//! let parse_limit = coerce::int::<u64>().or_nil().key("limit");
//! let parse_offset = coerce::int::<u64>().or_nil().key("offset");
//!
//! assert_eq!(parse_name.parse(&params).unwrap(), "ninja");
//! assert_eq!(parse_limit.parse(&params).unwrap(), Some(10));
//! assert_eq!(parse_offset.parse(&params).unwrap(), None);
//!
//! let parse_id = coerce::uuid().required().key("id");
//! assert!(matches!(
//!     parse_id.parse(&params),
//!     Err(QueryError::KeyNotFound { key: "id" })
//! ));
//! ```
//!
//! Presence policies do not implement [`Coercer`], so they cannot be stacked,
//! and only presence policies can be bound, so every bound parser carries
//! exactly one of them.

pub mod coerce;
pub mod error;
pub mod params;
pub mod presence;

pub use coerce::Coercer;
pub use error::{CoerceError, QueryError};
pub use params::QueryParams;
pub use presence::{Bound, CoercerExt, OrNil, Presence, Required};
