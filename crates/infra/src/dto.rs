//! Use-case inputs and read representations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ordering_orders::{Address, Order, OrderId, OrderItem, OrderStatus, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemCommand {
    pub product_id: ProductId,
    pub count: u32,
    pub item_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCommand {
    pub province: String,
    pub city: String,
    pub detail: String,
}

/// Command: create an order (the service assigns the id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderCommand {
    pub items: Vec<OrderItemCommand>,
    pub address: AddressCommand,
}

/// Command: set the count of one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeProductCountCommand {
    pub product_id: ProductId,
    pub count: u32,
}

/// Command: pay the order in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayOrderCommand {
    pub paid_price: Decimal,
}

/// Command: change the street-level detail of the delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeAddressDetailCommand {
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItemRepresentation {
    pub product_id: ProductId,
    pub count: u32,
    pub item_price: Decimal,
    pub total_price: Decimal,
}

/// Read view of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRepresentation {
    pub id: OrderId,
    pub items: Vec<OrderItemRepresentation>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderItem> for OrderItemRepresentation {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: *item.product_id(),
            count: item.count(),
            item_price: item.item_price(),
            total_price: item.total_price(),
        }
    }
}

impl From<&Order> for OrderRepresentation {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id_typed(),
            items: order.items().iter().map(OrderItemRepresentation::from).collect(),
            total_price: order.total_price(),
            status: order.status(),
            address: order.address().clone(),
            created_at: order.created_at(),
        }
    }
}
