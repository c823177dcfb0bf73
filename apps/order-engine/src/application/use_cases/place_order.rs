//! Place Order Use Case

use std::sync::Arc;

use crate::application::dto::PlaceOrderDto;
use crate::application::ports::{OrderStore, PlacedOrder, ProductLedger};
use crate::domain::ordering::{OrderDraft, OrderError};
use crate::domain::shared::{Money, ProductId, UserId};

/// Use case for turning a submitted basket into a persisted pending order.
///
/// Validation and pricing are pure domain logic; this use case only fetches
/// the referenced products and hands the resulting draft to the writer.
pub struct PlaceOrderUseCase<L, S>
where
    L: ProductLedger,
    S: OrderStore,
{
    ledger: Arc<L>,
    store: Arc<S>,
    default_shipping_fee: Money,
}

impl<L, S> PlaceOrderUseCase<L, S>
where
    L: ProductLedger,
    S: OrderStore,
{
    /// Create a new use case.
    pub const fn new(ledger: Arc<L>, store: Arc<S>, default_shipping_fee: Money) -> Self {
        Self {
            ledger,
            store,
            default_shipping_fee,
        }
    }

    /// Execute the use case for the authenticated customer.
    ///
    /// # Errors
    ///
    /// Validation, unknown-product and stock failures from the draft builder;
    /// persistence failures from the writer. A failure leaves no order row,
    /// no line items and no cart mutation behind.
    pub async fn execute(
        &self,
        user_id: UserId,
        request: PlaceOrderDto,
    ) -> Result<PlacedOrder, OrderError> {
        let command = request.into_command(user_id, self.default_shipping_fee);

        let ids: Vec<ProductId> = command.lines.iter().map(|l| l.product_id).collect();
        let products = self.ledger.find_by_ids(&ids).await?;

        let draft = OrderDraft::build(command, &products)?;
        let placed = self.store.create_order(draft).await?;

        tracing::info!(
            order_id = %placed.order.id,
            user_id = %user_id,
            total_amount = %placed.order.total_amount,
            lines = placed.order_items.len(),
            "order placed"
        );

        Ok(placed)
    }
}
