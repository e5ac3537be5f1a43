//! Presence policies and key binding.
//!
//! `Required` and `OrNil` wrap a coercer but are not coercers themselves, and
//! `key` is only defined on them. Stacking two policies, or binding a bare
//! coercer, does not type-check.

use crate::coerce::Coercer;
use crate::error::QueryError;
use crate::params::QueryParams;

mod sealed {
    pub trait Sealed {}
}

/// How a missing key is treated.
pub trait Presence: sealed::Sealed {
    type Output;

    /// # Errors
    /// See [`Bound::parse`].
    fn extract(&self, key: &'static str, params: &QueryParams)
    -> Result<Self::Output, QueryError>;
}

pub trait CoercerExt: Coercer + Sized {
    /// A missing key is an error.
    #[must_use]
    fn required(self) -> Required<Self> {
        Required(self)
    }

    /// A missing key yields `None`.
    #[must_use]
    fn or_nil(self) -> OrNil<Self> {
        OrNil(self)
    }
}

impl<C: Coercer> CoercerExt for C {}

#[derive(Debug, Clone, Copy)]
pub struct Required<C>(C);

#[derive(Debug, Clone, Copy)]
pub struct OrNil<C>(C);

impl<C: Coercer> Required<C> {
    #[must_use]
    pub fn key(self, key: &'static str) -> Bound<Self> {
        Bound {
            key,
            presence: self,
        }
    }
}

impl<C: Coercer> OrNil<C> {
    #[must_use]
    pub fn key(self, key: &'static str) -> Bound<Self> {
        Bound {
            key,
            presence: self,
        }
    }
}

impl<C> sealed::Sealed for Required<C> {}
impl<C> sealed::Sealed for OrNil<C> {}

impl<C: Coercer> Presence for Required<C> {
    type Output = C::Output;

    fn extract(&self, key: &'static str, params: &QueryParams) -> Result<C::Output, QueryError> {
        let raw = params.get(key).ok_or(QueryError::KeyNotFound { key })?;
        coerce_value(&self.0, key, raw)
    }
}

impl<C: Coercer> Presence for OrNil<C> {
    type Output = Option<C::Output>;

    fn extract(
        &self,
        key: &'static str,
        params: &QueryParams,
    ) -> Result<Option<C::Output>, QueryError> {
        params
            .get(key)
            .map(|raw| coerce_value(&self.0, key, raw))
            .transpose()
    }
}

fn coerce_value<C: Coercer>(
    coercer: &C,
    key: &'static str,
    raw: &str,
) -> Result<C::Output, QueryError> {
    coercer
        .coerce(raw)
        .map_err(|source| QueryError::MalformedValue { key, source })
}

/// A presence policy bound to one parameter name.
///
/// Parsing never touches any other key.
#[derive(Debug, Clone, Copy)]
pub struct Bound<P> {
    key: &'static str,
    presence: P,
}

impl<P: Presence> Bound<P> {
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Extract and coerce the first value of the bound key.
    ///
    /// # Errors
    /// - [`QueryError::KeyNotFound`] if the key is absent and the policy is
    ///   `Required`
    /// - [`QueryError::MalformedValue`] if the key is present and its first
    ///   value does not coerce
    pub fn parse(&self, params: &QueryParams) -> Result<P::Output, QueryError> {
        self.presence.extract(self.key, params)
    }
}
