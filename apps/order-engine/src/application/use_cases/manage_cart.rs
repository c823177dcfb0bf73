//! Cart Use Case

use std::sync::Arc;

use crate::application::dto::AddCartItemDto;
use crate::application::ports::{CartLine, CartStore, CartView, ProductLedger};
use crate::domain::ordering::OrderError;
use crate::domain::shared::{ProductId, UserId};

/// Customer-facing cart operations.
pub struct ManageCartUseCase<C, L>
where
    C: CartStore,
    L: ProductLedger,
{
    carts: Arc<C>,
    ledger: Arc<L>,
}

impl<C, L> ManageCartUseCase<C, L>
where
    C: CartStore,
    L: ProductLedger,
{
    /// Create a new use case.
    pub const fn new(carts: Arc<C>, ledger: Arc<L>) -> Self {
        Self { carts, ledger }
    }

    /// The caller's cart with product detail, if any.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn view(&self, user_id: UserId) -> Result<Option<CartView>, OrderError> {
        self.carts.cart_for_user(user_id).await
    }

    /// Add a product to the caller's cart, merging into an existing line.
    ///
    /// # Errors
    ///
    /// [`OrderError::Validation`] on a non-positive quantity,
    /// [`OrderError::UnknownProduct`] when the product does not exist.
    pub async fn add(&self, user_id: UserId, request: AddCartItemDto) -> Result<CartLine, OrderError> {
        request.validate()?;

        let product_id = ProductId::new(request.product_id);
        if self.ledger.find_by_id(product_id).await?.is_none() {
            return Err(OrderError::UnknownProduct { product_id });
        }

        let line = self
            .carts
            .add_item(user_id, product_id, request.quantity)
            .await?;

        tracing::debug!(
            user_id = %user_id,
            product_id = %product_id,
            quantity = line.quantity,
            "cart line updated"
        );

        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::shared::Money;
    use crate::infrastructure::persistence::InMemoryStore;
    use rust_decimal_macros::dec;

    fn store() -> Arc<InMemoryStore> {
        let store = Arc::new(InMemoryStore::new());
        store.seed_product(Product {
            id: ProductId::new(1),
            name: "Ceramic mug".to_string(),
            price: Money::new(dec!(100)),
            discount: dec!(10),
            stock_quantity: 5,
        });
        store
    }

    fn use_case(store: &Arc<InMemoryStore>) -> ManageCartUseCase<InMemoryStore, InMemoryStore> {
        ManageCartUseCase::new(Arc::clone(store), Arc::clone(store))
    }

    #[tokio::test]
    async fn view_of_a_missing_cart_is_none() {
        let store = store();
        assert!(use_case(&store).view(UserId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn add_creates_cart_lazily_and_merges_quantity() {
        let store = store();
        let use_case = use_case(&store);
        let user = UserId::new(1);

        let line = use_case
            .add(
                user,
                AddCartItemDto {
                    product_id: 1,
                    quantity: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(line.quantity, 2);

        let line = use_case
            .add(
                user,
                AddCartItemDto {
                    product_id: 1,
                    quantity: 3,
                },
            )
            .await
            .unwrap();
        assert_eq!(line.quantity, 5);

        let cart = use_case.view(user).await.unwrap().unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].product.name, "Ceramic mug");
    }

    #[tokio::test]
    async fn add_rejects_unknown_products() {
        let store = store();
        let err = use_case(&store)
            .add(
                UserId::new(1),
                AddCartItemDto {
                    product_id: 404,
                    quantity: 1,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::UnknownProduct { .. }));
    }

    #[tokio::test]
    async fn add_rejects_non_positive_quantity() {
        let store = store();
        let err = use_case(&store)
            .add(
                UserId::new(1),
                AddCartItemDto {
                    product_id: 1,
                    quantity: -1,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Validation(_)));
    }
}
