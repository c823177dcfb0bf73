//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod money;

pub use identifiers::{CartId, CartItemId, OrderId, OrderItemId, ProductId, UserId};
pub use money::Money;
