use std::collections::HashMap;
use std::sync::RwLock;

use ordering_core::{AggregateRoot, ExpectedVersion};
use ordering_orders::{Order, OrderId};

use super::{OrderRepository, RepositoryError};

/// In-memory order repository.
///
/// Intended for tests/dev. Stored orders never carry pending events.
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders. Still answers after a writer panicked mid-save.
    pub fn len(&self) -> usize {
        self.orders
            .read()
            .map(|orders| orders.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn get(&self, id: &OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(orders.get(id).cloned())
    }

    fn save(&self, order: &Order, expected: ExpectedVersion) -> Result<(), RepositoryError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;

        let current = orders.get(order.id()).map(Order::version).unwrap_or(0);
        expected
            .check(current)
            .map_err(|e| RepositoryError::Concurrency(e.to_string()))?;

        let mut stored = order.clone();
        let _ = stored.take_events();
        orders.insert(*order.id(), stored);
        Ok(())
    }
}
