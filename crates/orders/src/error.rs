//! Business-rule failures raised by the `Order` aggregate.

use rust_decimal::Decimal;
use thiserror::Error;

use ordering_core::DomainError;

use crate::item::ProductId;
use crate::order::OrderId;

/// Order-level error.
///
/// Every variant is a deterministic precondition failure: the aggregate is left exactly
/// as it was and no event is raised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// A structural change was attempted on a paid order.
    #[error("order {order_id} cannot be modified once it is paid")]
    CannotBeModified { order_id: OrderId },

    /// A count change targeted a product the order does not contain.
    #[error("product {product_id} is not in order {order_id}")]
    ProductNotInOrder {
        product_id: ProductId,
        order_id: OrderId,
    },

    /// The paid amount differs from the order's total price.
    #[error("paid price {paid} does not match price {expected} of order {order_id}")]
    PaidPriceMismatch {
        order_id: OrderId,
        expected: Decimal,
        paid: Decimal,
    },

    /// Payment was attempted on an order that is already paid.
    #[error("order {order_id} is already paid")]
    AlreadyPaid { order_id: OrderId },

    /// Two lines of a new order reference the same product.
    #[error("product {product_id} appears more than once in the order")]
    DuplicateProduct { product_id: ProductId },

    /// A line item rejected its input (e.g. zero count).
    #[error(transparent)]
    Domain(#[from] DomainError),
}
