//! Orders domain module.
//!
//! This crate contains the business rules for customer orders: the `Order` aggregate,
//! its line items and delivery address, and the domain events it raises. Everything
//! here is deterministic, in-memory domain logic (no IO, no HTTP, no storage).

pub mod address;
pub mod error;
pub mod events;
pub mod item;
pub mod order;

pub use address::Address;
pub use error::OrderError;
pub use events::{OrderAddressChanged, OrderCreated, OrderEvent, OrderPaid, OrderProductChanged};
pub use item::{OrderItem, ProductId};
pub use order::{Order, OrderId, OrderSnapshot, OrderStatus};
