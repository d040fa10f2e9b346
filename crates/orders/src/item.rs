use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ordering_core::{AggregateId, DomainError, DomainResult, Entity};

/// Product identifier, as referenced from order lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Order line: product, count, unit price.
///
/// Identified within its order by `product_id`. The line total is computed (checked)
/// whenever the count changes, so reading it never overflows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderItemFields")]
pub struct OrderItem {
    product_id: ProductId,
    count: u32,
    item_price: Decimal,
    total_price: Decimal,
}

/// Wire shape of an `OrderItem`; deserialization re-runs validation.
#[derive(Deserialize)]
struct OrderItemFields {
    product_id: ProductId,
    count: u32,
    item_price: Decimal,
}

impl TryFrom<OrderItemFields> for OrderItem {
    type Error = DomainError;

    fn try_from(fields: OrderItemFields) -> Result<Self, Self::Error> {
        Self::new(fields.product_id, fields.count, fields.item_price)
    }
}

impl OrderItem {
    pub fn new(product_id: ProductId, count: u32, item_price: Decimal) -> DomainResult<Self> {
        if item_price < Decimal::ZERO {
            return Err(DomainError::validation("item_price must not be negative"));
        }
        let total_price = line_total(item_price, count)?;

        Ok(Self {
            product_id,
            count,
            item_price,
            total_price,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn item_price(&self) -> Decimal {
        self.item_price
    }

    /// `item_price × count`.
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Replace the count. The item is left untouched when validation fails.
    pub fn update_count(&mut self, count: u32) -> DomainResult<()> {
        let total_price = line_total(self.item_price, count)?;
        self.count = count;
        self.total_price = total_price;
        Ok(())
    }
}

impl Entity for OrderItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}

fn line_total(item_price: Decimal, count: u32) -> DomainResult<Decimal> {
    if count == 0 {
        return Err(DomainError::validation("count must be positive"));
    }
    item_price
        .checked_mul(Decimal::from(count))
        .ok_or_else(|| DomainError::validation("line total exceeds the supported amount range"))
}
