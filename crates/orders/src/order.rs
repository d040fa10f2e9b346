use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ordering_core::{AggregateId, AggregateRoot, DomainError};
use ordering_events::EventRecorder;

use crate::address::Address;
use crate::error::OrderError;
use crate::events::{OrderAddressChanged, OrderCreated, OrderEvent, OrderPaid, OrderProductChanged};
use crate::item::{OrderItem, ProductId};

/// Order identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub AggregateId);

impl OrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    /// Fresh, time-ordered identifier.
    pub fn generate() -> Self {
        Self(AggregateId::new())
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.0
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for OrderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Order status lifecycle: `Created → Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Paid,
}

/// Point-in-time copy of an order's state, carried by events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

/// Aggregate root: Order.
///
/// Invariants after every successful operation:
/// - `total_price` equals the sum of the items' totals
/// - a paid order accepts no structural change
/// - each successful mutation records exactly one event, after the state change
/// - `id` and `created_at` never change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    items: Vec<OrderItem>,
    total_price: Decimal,
    status: OrderStatus,
    address: Address,
    created_at: DateTime<Utc>,
    events: EventRecorder<OrderEvent>,
}

impl Order {
    /// Create a new order stamped with the current time.
    ///
    /// An empty `items` list is accepted (total price 0). Two lines for the same
    /// product are not.
    pub fn create(id: OrderId, items: Vec<OrderItem>, address: Address) -> Result<Self, OrderError> {
        Self::create_at(id, items, address, Utc::now())
    }

    /// Same as [`Order::create`], with an explicit creation time.
    pub fn create_at(
        id: OrderId,
        items: Vec<OrderItem>,
        address: Address,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        ensure_unique_products(&items)?;
        let total_price = total_of(&items)?;

        let mut order = Self {
            id,
            total_price,
            items,
            status: OrderStatus::Created,
            address,
            created_at,
            events: EventRecorder::new(),
        };

        let snapshot = order.snapshot();
        order.events.record(OrderEvent::OrderCreated(OrderCreated {
            order: snapshot,
            occurred_at: created_at,
        }));

        Ok(order)
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_modifiable(&self) -> bool {
        self.status != OrderStatus::Paid
    }

    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            id: self.id,
            items: self.items.clone(),
            total_price: self.total_price,
            status: self.status,
            address: self.address.clone(),
            created_at: self.created_at,
        }
    }

    /// Set the count of the line holding `product_id`.
    ///
    /// The paid check runs before the lookup, so a paid order reports
    /// `CannotBeModified` even for unknown products.
    pub fn change_product_count(&mut self, product_id: &ProductId, count: u32) -> Result<(), OrderError> {
        self.ensure_modifiable()?;

        let index = self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)
            .ok_or(OrderError::ProductNotInOrder {
                product_id: *product_id,
                order_id: self.id,
            })?;

        // Validate the new line and the new total before touching any state.
        let mut updated = self.items[index].clone();
        updated.update_count(count)?;
        let total_price = total_of(
            self.items
                .iter()
                .enumerate()
                .map(|(i, item)| if i == index { &updated } else { item }),
        )?;

        self.items[index] = updated;
        self.total_price = total_price;

        let snapshot = self.snapshot();
        self.events.record(OrderEvent::OrderProductChanged(OrderProductChanged {
            order: snapshot,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Mark the order paid. `paid_price` must equal the total price exactly.
    pub fn pay(&mut self, paid_price: Decimal) -> Result<(), OrderError> {
        if self.status == OrderStatus::Paid {
            return Err(OrderError::AlreadyPaid { order_id: self.id });
        }
        if self.total_price != paid_price {
            return Err(OrderError::PaidPriceMismatch {
                order_id: self.id,
                expected: self.total_price,
                paid: paid_price,
            });
        }

        self.status = OrderStatus::Paid;
        self.events.record(OrderEvent::OrderPaid(OrderPaid {
            order_id: self.id,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    /// Replace the address detail, keeping province and city.
    pub fn change_address_detail(&mut self, detail: impl Into<String>) -> Result<(), OrderError> {
        self.ensure_modifiable()?;

        let new_detail = detail.into();
        let old_detail = self.address.detail().to_string();
        self.address = self.address.change_detail_to(new_detail.clone());

        self.events.record(OrderEvent::OrderAddressChanged(OrderAddressChanged {
            order_id: self.id,
            old_detail,
            new_detail,
            occurred_at: Utc::now(),
        }));
        Ok(())
    }

    fn ensure_modifiable(&self) -> Result<(), OrderError> {
        if !self.is_modifiable() {
            return Err(OrderError::CannotBeModified { order_id: self.id });
        }
        Ok(())
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;
    type Event = OrderEvent;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.events.recorded()
    }

    fn pending_events(&self) -> &[Self::Event] {
        self.events.pending()
    }

    fn take_events(&mut self) -> Vec<Self::Event> {
        self.events.drain()
    }
}

fn total_of<'a>(items: impl IntoIterator<Item = &'a OrderItem>) -> Result<Decimal, DomainError> {
    items.into_iter().try_fold(Decimal::ZERO, |total, item| {
        total
            .checked_add(item.total_price())
            .ok_or_else(|| DomainError::validation("order total exceeds the supported amount range"))
    })
}

fn ensure_unique_products(items: &[OrderItem]) -> Result<(), OrderError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(*item.product_id()) {
            return Err(OrderError::DuplicateProduct {
                product_id: *item.product_id(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_order_id() -> OrderId {
        OrderId::generate()
    }

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    fn test_address() -> Address {
        Address::new("Sichuan", "Chengdu", "No. 1 Tianfu Ave")
    }

    fn money(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(product_id: ProductId, count: u32, price: &str) -> OrderItem {
        OrderItem::new(product_id, count, money(price)).unwrap()
    }

    /// 10.00 × 2 + 5.00 × 1 = 25.00
    fn two_item_order() -> (Order, ProductId, ProductId) {
        let first = test_product_id();
        let second = test_product_id();
        let order = Order::create(
            test_order_id(),
            vec![item(first, 2, "10.00"), item(second, 1, "5.00")],
            test_address(),
        )
        .unwrap();
        (order, first, second)
    }

    fn assert_total_invariant(order: &Order) {
        let expected: Decimal = order.items().iter().map(OrderItem::total_price).sum();
        assert_eq!(order.total_price(), expected);
    }

    #[test]
    fn create_computes_total_and_raises_created_event() {
        let (order, first, _) = two_item_order();

        assert_eq!(order.total_price(), money("25.00"));
        assert_eq!(order.status(), OrderStatus::Created);
        assert_eq!(order.items().len(), 2);
        assert_eq!(order.items()[0].product_id(), &first);
        assert_eq!(order.version(), 1);

        let events = order.pending_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            OrderEvent::OrderCreated(e) => {
                assert_eq!(e.order, order.snapshot());
                assert_eq!(e.occurred_at, order.created_at());
            }
            other => panic!("Expected OrderCreated event, got {other:?}"),
        }
    }

    #[test]
    fn empty_order_is_accepted_with_zero_total() {
        let order = Order::create(test_order_id(), vec![], test_address()).unwrap();
        assert_eq!(order.total_price(), Decimal::ZERO);
        assert_eq!(order.pending_events().len(), 1);
    }

    #[test]
    fn duplicate_products_are_rejected_at_creation() {
        let product_id = test_product_id();
        let err = Order::create(
            test_order_id(),
            vec![item(product_id, 1, "1.00"), item(product_id, 2, "1.00")],
            test_address(),
        )
        .unwrap_err();

        assert_eq!(err, OrderError::DuplicateProduct { product_id });
    }

    #[test]
    fn changing_count_recomputes_total_and_raises_event() {
        let (mut order, first, _) = two_item_order();

        order.change_product_count(&first, 3).unwrap();

        assert_eq!(order.total_price(), money("35.00"));
        assert_eq!(order.items()[0].count(), 3);

        let events = order.take_events();
        assert_eq!(events.len(), 2);
        match &events[1] {
            OrderEvent::OrderProductChanged(e) => {
                assert_eq!(e.order.total_price, money("35.00"));
                assert_eq!(e.order.id, order.id_typed());
            }
            other => panic!("Expected OrderProductChanged event, got {other:?}"),
        }
    }

    #[test]
    fn paid_order_rejects_count_change() {
        let (mut order, first, _) = two_item_order();
        order.change_product_count(&first, 3).unwrap();
        order.pay(money("35.00")).unwrap();
        let _ = order.take_events();
        let before = order.snapshot();

        let err = order.change_product_count(&first, 1).unwrap_err();

        assert_eq!(err, OrderError::CannotBeModified { order_id: order.id_typed() });
        assert_eq!(order.total_price(), money("35.00"));
        assert_eq!(order.snapshot(), before);
        assert!(order.pending_events().is_empty());
    }

    #[test]
    fn paid_check_precedes_product_lookup() {
        let (mut order, _, _) = two_item_order();
        order.pay(money("25.00")).unwrap();

        let err = order.change_product_count(&test_product_id(), 1).unwrap_err();
        assert!(matches!(err, OrderError::CannotBeModified { .. }));
    }

    #[test]
    fn pay_transitions_to_paid_and_raises_event_with_order_id() {
        let (mut order, _, _) = two_item_order();
        let _ = order.take_events();

        order.pay(money("25.00")).unwrap();

        assert_eq!(order.status(), OrderStatus::Paid);
        match order.pending_events() {
            [OrderEvent::OrderPaid(e)] => assert_eq!(e.order_id, order.id_typed()),
            other => panic!("Expected a single OrderPaid event, got {other:?}"),
        }
    }

    #[test]
    fn pay_compares_amounts_numerically() {
        let (mut order, _, _) = two_item_order();
        order.pay(money("25")).unwrap();
        assert_eq!(order.status(), OrderStatus::Paid);
    }

    #[test]
    fn mismatched_payment_is_rejected() {
        let (mut order, _, _) = two_item_order();

        let err = order.pay(money("10.00")).unwrap_err();

        assert_eq!(
            err,
            OrderError::PaidPriceMismatch {
                order_id: order.id_typed(),
                expected: money("25.00"),
                paid: money("10.00"),
            }
        );
        assert_eq!(order.status(), OrderStatus::Created);
        assert_eq!(order.pending_events().len(), 1);
    }

    #[test]
    fn paying_twice_is_rejected() {
        let (mut order, _, _) = two_item_order();
        order.pay(money("25.00")).unwrap();
        let version = order.version();

        let err = order.pay(money("25.00")).unwrap_err();

        assert_eq!(err, OrderError::AlreadyPaid { order_id: order.id_typed() });
        assert_eq!(order.version(), version);
    }

    #[test]
    fn unknown_product_is_rejected_without_change() {
        let (mut order, _, _) = two_item_order();
        let before = order.clone();
        let missing = test_product_id();

        let err = order.change_product_count(&missing, 5).unwrap_err();

        assert_eq!(
            err,
            OrderError::ProductNotInOrder {
                product_id: missing,
                order_id: order.id_typed(),
            }
        );
        assert_eq!(order, before);
    }

    #[test]
    fn invalid_count_is_rejected_without_change() {
        let (mut order, first, _) = two_item_order();
        let before = order.clone();

        let err = order.change_product_count(&first, 0).unwrap_err();

        assert!(matches!(err, OrderError::Domain(DomainError::Validation(_))));
        assert_eq!(order, before);
    }

    #[test]
    fn overflowing_order_total_is_rejected_at_creation() {
        let err = Order::create(
            test_order_id(),
            vec![
                OrderItem::new(test_product_id(), 1, Decimal::MAX).unwrap(),
                OrderItem::new(test_product_id(), 1, Decimal::MAX).unwrap(),
            ],
            test_address(),
        )
        .unwrap_err();

        assert!(matches!(err, OrderError::Domain(DomainError::Validation(_))));
    }

    #[test]
    fn overflowing_line_total_is_rejected_without_change() {
        let product_id = test_product_id();
        let mut order = Order::create(
            test_order_id(),
            vec![OrderItem::new(product_id, 1, Decimal::MAX).unwrap()],
            test_address(),
        )
        .unwrap();
        let before = order.clone();

        let err = order.change_product_count(&product_id, 2).unwrap_err();

        assert!(matches!(err, OrderError::Domain(DomainError::Validation(_))));
        assert_eq!(order, before);
    }

    #[test]
    fn overflowing_order_total_is_rejected_without_change() {
        let quarter = Decimal::MAX / Decimal::from(4);
        let half = Decimal::MAX / Decimal::from(2);
        let small = test_product_id();
        let mut order = Order::create(
            test_order_id(),
            vec![
                OrderItem::new(small, 1, quarter).unwrap(),
                OrderItem::new(test_product_id(), 1, half).unwrap(),
            ],
            test_address(),
        )
        .unwrap();
        let before = order.clone();

        // The line itself (3/4 of the range) fits; the order total does not.
        let err = order.change_product_count(&small, 3).unwrap_err();

        assert!(matches!(err, OrderError::Domain(DomainError::Validation(msg)) if msg.contains("order total")));
        assert_eq!(order, before);
        assert_total_invariant(&order);
    }

    #[test]
    fn address_change_reports_old_and_new_detail() {
        let (mut order, _, _) = two_item_order();
        let _ = order.take_events();

        order.change_address_detail("No. 9 Jinli St").unwrap();

        assert_eq!(order.address().detail(), "No. 9 Jinli St");
        assert_eq!(order.address().city(), "Chengdu");
        assert_eq!(order.address().province(), "Sichuan");
        match order.pending_events() {
            [OrderEvent::OrderAddressChanged(e)] => {
                assert_eq!(e.order_id, order.id_typed());
                assert_eq!(e.old_detail, "No. 1 Tianfu Ave");
                assert_eq!(e.new_detail, "No. 9 Jinli St");
            }
            other => panic!("Expected a single OrderAddressChanged event, got {other:?}"),
        }
    }

    #[test]
    fn paid_order_rejects_address_change() {
        let (mut order, _, _) = two_item_order();
        order.pay(money("25.00")).unwrap();
        let before = order.clone();

        let err = order.change_address_detail("elsewhere").unwrap_err();

        assert!(matches!(err, OrderError::CannotBeModified { .. }));
        assert_eq!(order, before);
    }

    #[test]
    fn events_accumulate_in_call_order_and_drain_keeps_version() {
        let created_at = Utc::now();
        let product_id = test_product_id();
        let mut order = Order::create_at(
            test_order_id(),
            vec![item(product_id, 1, "4.50")],
            test_address(),
            created_at,
        )
        .unwrap();
        let id = order.id_typed();

        order.change_product_count(&product_id, 2).unwrap();
        order.change_address_detail("No. 2 Tianfu Ave").unwrap();
        order.pay(money("9.00")).unwrap();

        let kinds: Vec<&str> = order
            .pending_events()
            .iter()
            .map(ordering_events::Event::event_type)
            .collect();
        assert_eq!(
            kinds,
            vec![
                "orders.order.created",
                "orders.order.product_changed",
                "orders.order.address_changed",
                "orders.order.paid",
            ]
        );

        assert_eq!(order.take_events().len(), 4);
        assert!(order.pending_events().is_empty());
        assert_eq!(order.version(), 4);
        assert_eq!(order.id_typed(), id);
        assert_eq!(order.created_at(), created_at);
    }

    #[test]
    fn paid_event_serializes_with_order_id_only() {
        let (mut order, _, _) = two_item_order();
        order.pay(money("25.00")).unwrap();
        let events = order.take_events();

        let json = serde_json::to_value(&events[1]).unwrap();
        let paid = &json["OrderPaid"];
        assert_eq!(paid["order_id"], order.id_typed().to_string());
        assert_eq!(paid.as_object().unwrap().len(), 2);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: whatever count changes are applied (valid or not), the total price
        /// always equals the sum of line totals, and a failed change leaves the order
        /// untouched with no new event.
        #[test]
        fn total_price_tracks_items_and_failures_are_atomic(
            lines in prop::collection::vec((0i64..100_000i64, 1u32..50u32), 1..8),
            changes in prop::collection::vec((any::<prop::sample::Index>(), 0u32..50u32, any::<bool>()), 0..20)
        ) {
            let items: Vec<OrderItem> = lines
                .iter()
                .map(|(cents, count)| {
                    OrderItem::new(test_product_id(), *count, Decimal::new(*cents, 2)).unwrap()
                })
                .collect();
            let product_ids: Vec<ProductId> = items.iter().map(|i| *i.product_id()).collect();
            let mut order = Order::create(test_order_id(), items, test_address()).unwrap();
            assert_total_invariant(&order);

            for (index, count, target_known) in changes {
                let product_id = if target_known {
                    *index.get(&product_ids)
                } else {
                    test_product_id()
                };
                let before = order.clone();

                match order.change_product_count(&product_id, count) {
                    Ok(()) => {
                        prop_assert_eq!(order.version(), before.version() + 1);
                    }
                    Err(_) => {
                        prop_assert_eq!(&order, &before);
                    }
                }
                assert_total_invariant(&order);
            }

            let total = order.total_price();
            order.pay(total).unwrap();
            let before = order.clone();
            prop_assert!(order.change_product_count(&product_ids[0], 1).is_err());
            prop_assert_eq!(&order, &before);
        }
    }
}
