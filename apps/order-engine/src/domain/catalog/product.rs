//! Product entity as seen by the order engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{Money, ProductId};

/// A catalog product.
///
/// Owned by the catalog subsystem; the order engine reads price, discount and
/// stock, and decrements `stock_quantity` exactly once per confirmed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name, used in stock error messages.
    pub name: String,
    /// Base unit price before discount.
    pub price: Money,
    /// Discount percentage in `[0, 100]`.
    pub discount: Decimal,
    /// Units on hand. Never negative after a committed transaction.
    pub stock_quantity: i32,
}

impl Product {
    /// Returns true if at least `quantity` units are on hand.
    #[must_use]
    pub const fn has_stock(&self, quantity: i32) -> bool {
        self.stock_quantity >= quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(stock: i32) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Ceramic mug".to_string(),
            price: Money::new(dec!(100)),
            discount: dec!(10),
            stock_quantity: stock,
        }
    }

    #[test]
    fn has_stock_boundary() {
        let p = product(5);
        assert!(p.has_stock(5));
        assert!(p.has_stock(1));
        assert!(!p.has_stock(6));
    }

    #[test]
    fn zero_stock_has_nothing() {
        let p = product(0);
        assert!(!p.has_stock(1));
        assert!(p.has_stock(0));
    }
}
