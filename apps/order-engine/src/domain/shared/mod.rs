//! Shared domain types.

pub mod value_objects;

pub use value_objects::{CartId, CartItemId, Money, OrderId, OrderItemId, ProductId, UserId};
