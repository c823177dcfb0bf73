//! Cart store port.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::catalog::Product;
use crate::domain::ordering::OrderError;
use crate::domain::shared::{CartId, CartItemId, ProductId, UserId};

/// A cart line as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Line identifier.
    pub cart_item_id: CartItemId,
    /// Owning cart.
    pub cart_id: CartId,
    /// Product reference.
    pub product_id: ProductId,
    /// Units in the cart.
    pub quantity: i32,
}

/// A cart line joined with its product, for the cart view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartViewLine {
    /// Line identifier.
    pub cart_item_id: CartItemId,
    /// Units in the cart.
    pub quantity: i32,
    /// The referenced product.
    pub product: Product,
}

/// A user's cart with product detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    /// Cart identifier.
    pub cart_id: CartId,
    /// Lines with product detail.
    pub items: Vec<CartViewLine>,
}

/// Cart persistence.
///
/// The purchase-time mutation — removing ordered lines — is not here: it runs
/// inside [`super::OrderStore::create_order`]'s transaction. This port covers
/// the customer-facing cart surface.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// The user's cart with product detail, or `None` if they have none yet.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn cart_for_user(&self, user_id: UserId) -> Result<Option<CartView>, OrderError>;

    /// Add `quantity` of a product to the user's cart.
    ///
    /// Creates the cart lazily; an existing line for the same product has the
    /// quantity merged in.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the write fails.
    async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, OrderError>;
}
