//! Results of cache reads, tagged with how fresh they are.

use std::time::Instant;

use shipview_types::ReadFailure;

use crate::error::{Error, Result};

/// How a returned value relates to the collaborator's current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    /// Refreshed by this call, or cached and still within its TTL.
    Fresh,
    /// Cached but older than the TTL. Only reported by non-refreshing reads.
    Expired,
    /// The most recent read failed; the value is left over from an earlier one.
    Stale,
    /// No read has ever succeeded (or the entry was invalidated).
    NeverPopulated,
}

/// A value (or its absence) read through a cache, with the metadata a caller
/// needs to decide whether to retry.
#[derive(Debug, Clone)]
pub struct Lookup<T> {
    pub value: Option<T>,
    pub freshness: Freshness,
    pub refreshed_at: Option<Instant>,
    /// Failure from the read attempted by this call, or the last recorded
    /// failure for non-refreshing reads.
    pub failure: Option<ReadFailure>,
    /// Whether this call invoked the collaborator.
    pub fetched: bool,
    name: &'static str,
}

impl<T> Lookup<T> {
    pub(crate) fn new(name: &'static str, freshness: Freshness) -> Self {
        Self {
            value: None,
            freshness,
            refreshed_at: None,
            failure: None,
            fetched: false,
            name,
        }
    }

    pub(crate) fn with_value(mut self, value: Option<T>, refreshed_at: Option<Instant>) -> Self {
        self.value = value;
        self.refreshed_at = refreshed_at;
        self
    }

    pub(crate) fn with_failure(mut self, failure: Option<ReadFailure>) -> Self {
        self.failure = failure;
        self
    }

    pub(crate) fn fetched(mut self, fetched: bool) -> Self {
        self.fetched = fetched;
        self
    }

    /// Name of the cache this lookup came from.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_fresh(&self) -> bool {
        self.freshness == Freshness::Fresh
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Convert into a `Result`, turning an absent value into an error.
    pub fn into_result(self) -> Result<T> {
        match (self.value, self.failure) {
            (Some(value), _) => Ok(value),
            (None, Some(failure)) => Err(Error::Read(failure)),
            (None, None) => Err(Error::NotYetPopulated(self.name.to_string())),
        }
    }

    /// Transform the value, keeping the freshness metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        self.and_then(|v| Some(f(v)))
    }

    /// Transform the value with a function that may discard it.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> Lookup<U> {
        Lookup {
            value: self.value.and_then(f),
            freshness: self.freshness,
            refreshed_at: self.refreshed_at,
            failure: self.failure,
            fetched: self.fetched,
            name: self.name,
        }
    }
}
