//! Order entity and the draft builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;
use crate::domain::ordering::errors::OrderError;
use crate::domain::ordering::pricing;
use crate::domain::ordering::value_objects::{OrderStatus, PaymentMethod, PaymentStatus};
use crate::domain::shared::{Money, OrderId, UserId};

use super::order_line::{OrderLineDraft, RequestedLine};

/// A submitted basket, as handed to the draft builder.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    /// Ordering customer.
    pub user_id: UserId,
    /// Delivery address.
    pub shipping_address: String,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Requested lines; must be non-empty.
    pub lines: Vec<RequestedLine>,
    /// Voucher amount subtracted from the total.
    pub voucher_discount: Money,
    /// Shipping fee added to the total.
    pub shipping_fee: Money,
}

/// A validated order aggregate that has not been persisted yet.
///
/// Produced by [`OrderDraft::build`]; consumed whole by the transactional
/// writer. Holds everything needed to insert the order row and its lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDraft {
    /// Ordering customer.
    pub user_id: UserId,
    /// Always [`OrderStatus::Pending`] at creation.
    pub status: OrderStatus,
    /// Σ line subtotals + shipping − voucher.
    pub total_amount: Money,
    /// Delivery address.
    pub shipping_address: String,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Derived from the payment method at placement.
    pub payment_status: PaymentStatus,
    /// Priced lines with snapshotted unit prices.
    pub lines: Vec<OrderLineDraft>,
}

impl OrderDraft {
    /// Validate a basket against the catalog and price it.
    ///
    /// Checks, in order: basket shape, product existence, stock cover. Prices
    /// each line at `price × (1 − discount/100)` and snapshots it; the total
    /// adds the shipping fee and subtracts the voucher.
    ///
    /// Stock is only *checked* here. Deduction happens at confirmation, so
    /// two baskets validated concurrently may both pass against the same
    /// stock; the conflict surfaces when the second one is confirmed.
    ///
    /// # Errors
    ///
    /// [`OrderError::Validation`] for shape violations,
    /// [`OrderError::UnknownProduct`] / [`OrderError::InsufficientStock`] per
    /// the failed line.
    pub fn build(new_order: NewOrder, products: &[Product]) -> Result<Self, OrderError> {
        if new_order.lines.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one product".to_string(),
            ));
        }
        if new_order.shipping_address.trim().is_empty() {
            return Err(OrderError::Validation(
                "shipping address must not be blank".to_string(),
            ));
        }

        let mut lines = Vec::with_capacity(new_order.lines.len());
        let mut subtotal = Money::ZERO;

        for requested in &new_order.lines {
            if requested.quantity <= 0 {
                return Err(OrderError::Validation(format!(
                    "quantity for product {} must be positive",
                    requested.product_id
                )));
            }

            let product = products
                .iter()
                .find(|p| p.id == requested.product_id)
                .ok_or(OrderError::UnknownProduct {
                    product_id: requested.product_id,
                })?;

            if !product.has_stock(requested.quantity) {
                return Err(OrderError::InsufficientStock {
                    name: product.name.clone(),
                });
            }

            let unit_price = pricing::effective_unit_price(product.price, product.discount);
            let line = OrderLineDraft {
                product_id: requested.product_id,
                quantity: requested.quantity,
                price_at_order_time: unit_price,
            };
            subtotal = subtotal + line.subtotal();
            lines.push(line);
        }

        let total_amount = pricing::order_total(
            subtotal,
            new_order.shipping_fee,
            new_order.voucher_discount,
        );
        if total_amount.is_negative() {
            return Err(OrderError::Validation(
                "voucher discount exceeds order value".to_string(),
            ));
        }

        Ok(Self {
            user_id: new_order.user_id,
            status: OrderStatus::Pending,
            total_amount,
            shipping_address: new_order.shipping_address,
            payment_method: new_order.payment_method,
            payment_status: PaymentStatus::on_placement(new_order.payment_method),
            lines,
        })
    }

    /// Product ids of every line, in basket order.
    ///
    /// These are the cart lines the writer removes on commit.
    #[must_use]
    pub fn product_ids(&self) -> Vec<crate::domain::shared::ProductId> {
        self.lines.iter().map(|l| l.product_id).collect()
    }
}

/// A persisted order.
///
/// Created `pending` by the writer; the status only moves through the
/// transition state machine and the row is never hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Ordering customer.
    pub user_id: UserId,
    /// When the order was placed.
    pub order_date: DateTime<Utc>,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Σ line subtotals + shipping − voucher, snapshotted at placement.
    pub total_amount: Money,
    /// Delivery address.
    pub shipping_address: String,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Settlement state.
    pub payment_status: PaymentStatus,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last row update time.
    pub updated_at: DateTime<Utc>,
}
