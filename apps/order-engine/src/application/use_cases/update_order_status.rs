//! Update Order Status Use Case

use std::sync::Arc;

use crate::application::ports::OrderStore;
use crate::domain::ordering::{Order, OrderError, OrderStatus};
use crate::domain::shared::OrderId;

/// Use case for driving an order through its status lifecycle.
///
/// The store executes the planned transition atomically; confirmation is the
/// only transition with a side effect (the one-time stock deduction).
pub struct UpdateOrderStatusUseCase<S>
where
    S: OrderStore,
{
    store: Arc<S>,
}

impl<S> UpdateOrderStatusUseCase<S>
where
    S: OrderStore,
{
    /// Create a new use case.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Execute the transition.
    ///
    /// # Errors
    ///
    /// Not-found, invalid-transition, stock and persistence failures from the
    /// store. On failure the order keeps its previous status and no stock
    /// level changes.
    pub async fn execute(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let order = self.store.transition_status(order_id, new_status).await?;

        tracing::info!(
            order_id = %order.id,
            status = %order.status,
            payment_status = %order.payment_status,
            "order status updated"
        );

        Ok(order)
    }
}
