//! Order store port: the transactional writer and the read side.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::ordering::{Order, OrderDraft, OrderError, OrderItem, OrderStatus};
use crate::domain::shared::{Money, OrderId, UserId};

/// Result of a committed order creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOrder {
    /// The persisted order row.
    pub order: Order,
    /// The persisted line items.
    pub order_items: Vec<OrderItem>,
}

/// An order with its nested line items, for list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithItems {
    /// The order row.
    #[serde(flatten)]
    pub order: Order,
    /// Line items belonging to the order.
    pub order_items: Vec<OrderItem>,
}

/// Atomic persistence for orders.
///
/// Every mutating method is one atomic unit: all effects commit together or
/// none are observable. Implementations must guarantee rollback before
/// propagating a failure.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a validated draft.
    ///
    /// In one transaction: insert the order row, bulk-insert its line items,
    /// and delete the user's cart lines whose product id is among the ordered
    /// ids (no cart is a no-op; unrelated cart lines survive). Stock is not
    /// touched here.
    ///
    /// # Errors
    ///
    /// [`OrderError::Persistence`] wrapping the cause after rollback.
    async fn create_order(&self, draft: OrderDraft) -> Result<PlacedOrder, OrderError>;

    /// Apply a status transition planned by the domain state machine.
    ///
    /// In one transaction: load the order, plan the transition, re-check and
    /// decrement stock per line when the plan calls for it, and persist the
    /// new status (and payment status). Any per-product shortfall aborts the
    /// whole transition with status and stock unchanged.
    ///
    /// # Errors
    ///
    /// [`OrderError::OrderNotFound`], [`OrderError::InvalidTransition`],
    /// [`OrderError::InsufficientStock`], or [`OrderError::Persistence`].
    async fn transition_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError>;

    /// All orders of one user with nested items, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderWithItems>, OrderError>;

    /// Every order with nested items, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn list_all(&self) -> Result<Vec<OrderWithItems>, OrderError>;

    /// The latest `limit` orders, newest first, without items.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, OrderError>;

    /// Orders placed in `[from, to)`, newest first, without items.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderError>;

    /// Sum of `total_amount` over non-cancelled orders placed in `[from, to)`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the query fails.
    async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Money, OrderError>;
}
