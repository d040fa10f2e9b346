//! Order application service (use-case orchestration).
//!
//! Each use-case runs the same pipeline:
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the order (or build it, for creation)
//!   ↓
//! 2. Invoke one aggregate operation (business rules live there)
//!   ↓
//! 3. Drain the events it raised
//!   ↓
//! 4. Save with an optimistic version check
//!   ↓
//! 5. Publish the drained events, in order, as envelopes
//! ```
//!
//! A rejected operation is never saved and publishes nothing. Publication happens only
//! after a successful save; if it fails the order is already stored and the envelopes
//! not yet published come back in [`ServiceError::Publish`] for the caller to
//! [`republish`](OrderApplicationService::republish) (at-least-once).

use thiserror::Error;

use ordering_core::{AggregateRoot, ExpectedVersion};
use ordering_events::{EventBus, EventEnvelope};
use ordering_orders::{Address, Order, OrderError, OrderEvent, OrderId, OrderItem};

use crate::config::ServiceConfig;
use crate::dto::{
    ChangeAddressDetailCommand, ChangeProductCountCommand, CreateOrderCommand, OrderRepresentation,
    PayOrderCommand,
};
use crate::repository::{OrderRepository, RepositoryError};

/// Envelope type published for order events.
pub type OrderEnvelope = EventEnvelope<OrderEvent>;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// A business rule rejected the operation.
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Publication failed after a successful save.
    ///
    /// `unsent` holds the envelope that failed and every one after it, in order;
    /// hand them to [`OrderApplicationService::republish`] to retry.
    #[error("event publication failed for order {order_id}: {reason}")]
    Publish {
        order_id: OrderId,
        reason: String,
        unsent: Vec<OrderEnvelope>,
    },
}

#[derive(Debug)]
pub struct OrderApplicationService<R, B> {
    repository: R,
    bus: B,
    config: ServiceConfig,
}

impl<R, B> OrderApplicationService<R, B> {
    pub fn new(repository: R, bus: B, config: ServiceConfig) -> Self {
        Self {
            repository,
            bus,
            config,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl<R, B> OrderApplicationService<R, B>
where
    R: OrderRepository,
    B: EventBus<OrderEnvelope>,
{
    pub fn create_order(&self, command: CreateOrderCommand) -> Result<OrderId, ServiceError> {
        let items = command
            .items
            .into_iter()
            .map(|line| OrderItem::new(line.product_id, line.count, line.item_price))
            .collect::<Result<Vec<_>, _>>()
            .map_err(OrderError::from)
            .inspect_err(|e| tracing::warn!(error = %e, "create_order rejected"))?;
        let address = Address::new(
            command.address.province,
            command.address.city,
            command.address.detail,
        );

        let order = Order::create(OrderId::generate(), items, address)
            .inspect_err(|e| tracing::warn!(error = %e, "create_order rejected"))?;
        let order_id = order.id_typed();

        let published = self.commit(order, 0)?;
        tracing::info!(%order_id, events = published, "order created");
        Ok(order_id)
    }

    pub fn change_product_count(
        &self,
        order_id: &OrderId,
        command: ChangeProductCountCommand,
    ) -> Result<(), ServiceError> {
        self.execute(order_id, "change_product_count", |order| {
            order.change_product_count(&command.product_id, command.count)
        })
    }

    pub fn pay(&self, order_id: &OrderId, command: PayOrderCommand) -> Result<(), ServiceError> {
        self.execute(order_id, "pay", |order| order.pay(command.paid_price))
    }

    pub fn change_address_detail(
        &self,
        order_id: &OrderId,
        command: ChangeAddressDetailCommand,
    ) -> Result<(), ServiceError> {
        self.execute(order_id, "change_address_detail", |order| {
            order.change_address_detail(command.detail)
        })
    }

    pub fn order_by_id(&self, order_id: &OrderId) -> Result<OrderRepresentation, ServiceError> {
        let order = self.load(order_id)?;
        Ok(OrderRepresentation::from(&order))
    }

    /// Retry publication of envelopes returned in [`ServiceError::Publish`].
    ///
    /// The order is already saved; this only touches the bus.
    pub fn republish(&self, unsent: Vec<OrderEnvelope>) -> Result<(), ServiceError> {
        let Some(first) = unsent.first() else {
            return Ok(());
        };
        let order_id = OrderId::new(first.aggregate_id());
        self.publish_envelopes(order_id, unsent)?;
        tracing::info!(%order_id, "order events republished");
        Ok(())
    }

    fn load(&self, order_id: &OrderId) -> Result<Order, ServiceError> {
        self.repository
            .get(order_id)?
            .ok_or(ServiceError::NotFound(*order_id))
    }

    fn execute(
        &self,
        order_id: &OrderId,
        use_case: &'static str,
        operation: impl FnOnce(&mut Order) -> Result<(), OrderError>,
    ) -> Result<(), ServiceError> {
        let mut order = self.load(order_id)?;
        let loaded_version = order.version();

        if let Err(e) = operation(&mut order) {
            tracing::warn!(%order_id, use_case, error = %e, "order use-case rejected");
            return Err(e.into());
        }

        let published = self.commit(order, loaded_version)?;
        tracing::info!(%order_id, use_case, events = published, "order updated");
        Ok(())
    }

    /// Drain, save, then publish. Returns the number of drained events.
    fn commit(&self, mut order: Order, loaded_version: u64) -> Result<usize, ServiceError> {
        let events = order.take_events();
        self.repository
            .save(&order, ExpectedVersion::Exact(loaded_version))?;

        let drained = events.len();
        if !self.config.publish_events {
            tracing::debug!(order_id = %order.id_typed(), drained, "event publication disabled");
            return Ok(drained);
        }

        let order_id = order.id_typed();
        let envelopes = (loaded_version + 1..)
            .zip(events)
            .map(|(sequence_number, event)| {
                EventEnvelope::wrap(
                    order_id.aggregate_id(),
                    self.config.aggregate_type.as_str(),
                    sequence_number,
                    event,
                )
            })
            .collect();
        self.publish_envelopes(order_id, envelopes)?;

        Ok(drained)
    }

    fn publish_envelopes(
        &self,
        order_id: OrderId,
        envelopes: Vec<OrderEnvelope>,
    ) -> Result<(), ServiceError> {
        let mut remaining = envelopes.into_iter();
        while let Some(envelope) = remaining.next() {
            tracing::debug!(
                event_type = envelope.event_type(),
                sequence_number = envelope.sequence_number(),
                "publishing order event"
            );
            if let Err(e) = self.bus.publish(envelope.clone()) {
                let mut unsent = vec![envelope];
                unsent.extend(remaining);
                tracing::error!(%order_id, unsent = unsent.len(), "order event publication failed: {e:?}");
                return Err(ServiceError::Publish {
                    order_id,
                    reason: format!("{e:?}"),
                    unsent,
                });
            }
        }
        Ok(())
    }
}
