//! Inventory ledger port.

use async_trait::async_trait;

use crate::domain::catalog::Product;
use crate::domain::ordering::OrderError;
use crate::domain::shared::ProductId;

/// Read access to the authoritative stock ledger.
///
/// The order engine only reads through this port. The one write it ever
/// performs — the confirmation-time decrement — happens inside the order
/// store's transaction so the check and the status write commit together.
#[async_trait]
pub trait ProductLedger: Send + Sync {
    /// Look up a single product.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, OrderError>;

    /// Look up every product in `ids`.
    ///
    /// Missing ids are simply absent from the result; the draft builder turns
    /// an absence into its own validation failure.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, OrderError>;
}
