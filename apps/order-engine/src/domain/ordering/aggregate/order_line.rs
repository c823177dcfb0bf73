//! Order line items.

use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, OrderId, OrderItemId, ProductId};

/// One product+quantity entry in a submitted basket, before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedLine {
    /// Product reference.
    pub product_id: ProductId,
    /// Requested units; must be positive.
    pub quantity: i32,
}

/// A validated, priced line waiting to be persisted with its order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLineDraft {
    /// Product reference.
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price snapshotted at order-creation time.
    pub price_at_order_time: Money,
}

impl OrderLineDraft {
    /// `price_at_order_time × quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.price_at_order_time * self.quantity
    }
}

/// A persisted line item, owned by exactly one order.
///
/// `price_at_order_time` is immutable: catalog price or discount changes
/// after placement never alter it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Line identifier.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product reference (not ownership).
    pub product_id: ProductId,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price snapshot.
    pub price_at_order_time: Money,
}
