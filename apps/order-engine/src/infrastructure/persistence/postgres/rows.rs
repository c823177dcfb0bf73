//! Row types mapping table shapes onto domain types.
//!
//! The domain stays free of sqlx; rows carry raw column types and convert
//! with `TryFrom`, failing with a persistence error on data the domain
//! cannot represent.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::application::ports::CartLine;
use crate::domain::catalog::Product;
use crate::domain::ordering::{Order, OrderItem};
use crate::domain::shared::{
    CartId, CartItemId, Money, OrderId, OrderItemId, ProductId, UserId,
};
use crate::domain::ordering::OrderError;

#[derive(Debug, FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub discount: Decimal,
    pub stock_quantity: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: Money::new(row.price),
            discount: row.discount,
            stock_quantity: row.stock_quantity,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub payment_method: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = OrderError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            order_date: row.order_date,
            status: row.status.parse().map_err(OrderError::Persistence)?,
            total_amount: Money::new(row.total_amount),
            shipping_address: row.shipping_address,
            payment_method: row.payment_method.parse().map_err(OrderError::Persistence)?,
            payment_status: row.payment_status.parse().map_err(OrderError::Persistence)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_order_time: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price_at_order_time: Money::new(row.price_at_order_time),
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CartItemRow {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i32,
}

impl From<CartItemRow> for CartLine {
    fn from(row: CartItemRow) -> Self {
        Self {
            cart_item_id: CartItemId::new(row.id),
            cart_id: CartId::new(row.cart_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn order_row(status: &str) -> OrderRow {
        OrderRow {
            id: 1,
            user_id: 2,
            order_date: Utc::now(),
            status: status.to_string(),
            total_amount: dec!(30270),
            shipping_address: "12 Elm Street".to_string(),
            payment_method: "cod".to_string(),
            payment_status: "unpaid".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn order_row_converts() {
        let order = Order::try_from(order_row("pending")).unwrap();
        assert_eq!(order.id, OrderId::new(1));
        assert_eq!(order.total_amount.amount(), dec!(30270));
    }

    #[test]
    fn order_row_rejects_garbage_status() {
        let err = Order::try_from(order_row("exploded")).unwrap_err();
        assert!(matches!(err, OrderError::Persistence(_)));
    }
}
