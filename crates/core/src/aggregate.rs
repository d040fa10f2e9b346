//! Aggregate root trait for state-based domain models that record events.

use crate::error::{DomainError, DomainResult};

/// Aggregate root: a consistency boundary mutated only through its own operations.
///
/// Aggregates keep their current state in memory and record a domain event for every
/// business-significant change. The owner (typically an application service) drains
/// those events after each use-case and decides how to publish them.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Domain event type recorded by this aggregate.
    type Event: Clone + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Number of events raised over the aggregate's lifetime.
    ///
    /// Draining pending events does not reset it; it is the stream position used
    /// for optimistic concurrency.
    fn version(&self) -> u64;

    /// Events raised since the last drain, in the order they were raised.
    fn pending_events(&self) -> &[Self::Event];

    /// Remove and return all pending events.
    fn take_events(&mut self) -> Vec<Self::Event>;
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for migrations, fixtures, etc.).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
