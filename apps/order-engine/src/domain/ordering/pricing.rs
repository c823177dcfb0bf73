//! Line pricing.
//!
//! Prices are derived once, at order-creation time, and snapshotted onto the
//! line item. Later catalog changes never touch an existing order.

use rust_decimal::Decimal;

use crate::domain::shared::Money;

/// Effective unit price after the catalog discount.
///
/// `unit_price = price × (1 − discount/100)`, exact decimal arithmetic.
#[must_use]
pub fn effective_unit_price(price: Money, discount_percent: Decimal) -> Money {
    price * (Decimal::ONE - discount_percent / Decimal::ONE_HUNDRED)
}

/// Order total: sum of line subtotals plus shipping, minus any voucher.
#[must_use]
pub fn order_total(line_subtotals: Money, shipping_fee: Money, voucher_discount: Money) -> Money {
    line_subtotals + shipping_fee - voucher_discount
}
