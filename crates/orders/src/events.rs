use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ordering_events::Event;

use crate::order::{OrderId, OrderSnapshot};

/// Event: OrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order: OrderSnapshot,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderProductChanged (a line's count changed; `order` reflects the new total).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProductChanged {
    pub order: OrderSnapshot,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderPaid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPaid {
    pub order_id: OrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderAddressChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAddressChanged {
    pub order_id: OrderId,
    pub old_detail: String,
    pub new_detail: String,
    pub occurred_at: DateTime<Utc>,
}

/// Every event the `Order` aggregate can raise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    OrderCreated(OrderCreated),
    OrderProductChanged(OrderProductChanged),
    OrderPaid(OrderPaid),
    OrderAddressChanged(OrderAddressChanged),
}

impl OrderEvent {
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderCreated(e) => e.order.id,
            OrderEvent::OrderProductChanged(e) => e.order.id,
            OrderEvent::OrderPaid(e) => e.order_id,
            OrderEvent::OrderAddressChanged(e) => e.order_id,
        }
    }
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated(_) => "orders.order.created",
            OrderEvent::OrderProductChanged(_) => "orders.order.product_changed",
            OrderEvent::OrderPaid(_) => "orders.order.paid",
            OrderEvent::OrderAddressChanged(_) => "orders.order.address_changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::OrderCreated(e) => e.occurred_at,
            OrderEvent::OrderProductChanged(e) => e.occurred_at,
            OrderEvent::OrderPaid(e) => e.occurred_at,
            OrderEvent::OrderAddressChanged(e) => e.occurred_at,
        }
    }
}
