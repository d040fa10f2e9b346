//! Order persistence abstraction.
//!
//! The repository stores the *current state* of each order (not its event history).
//! Optimistic concurrency uses the aggregate version: a save only succeeds when the
//! stored order is still at the version the caller loaded.

use std::sync::Arc;

use thiserror::Error;

use ordering_core::ExpectedVersion;
use ordering_orders::{Order, OrderId};

mod in_memory;

pub use in_memory::InMemoryOrderRepository;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// The stored order moved on since it was loaded.
    #[error("concurrency conflict: {0}")]
    Concurrency(String),

    /// The backend could not serve the request.
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Load/save orders by id.
///
/// Implementations must be safe to share across threads.
pub trait OrderRepository: Send + Sync {
    /// Fetch the current state of an order, if it exists.
    fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Persist `order`, requiring the stored version (0 when absent) to match `expected`.
    fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<(), RepositoryError>;
}

impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).get(id)
    }

    fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        (**self).save(order, expected)
    }
}
