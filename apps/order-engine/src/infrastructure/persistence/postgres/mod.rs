//! Postgres store.
//!
//! One adapter implements the ledger, order store and cart store over a
//! shared connection pool. Every atomic unit is an explicit sqlx transaction;
//! helper functions take `&mut PgConnection` so the same code runs against a
//! pooled connection or inside a transaction, and the transaction handle is
//! always passed down rather than held as ambient state. An early return
//! drops the transaction, which rolls it back.

mod carts;
mod orders;
mod products;
mod rows;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::application::ports::{
    CartLine, CartStore, CartView, OrderStore, OrderWithItems, PlacedOrder, ProductLedger,
};
use crate::domain::catalog::Product;
use crate::domain::ordering::{Order, OrderDraft, OrderError, OrderStatus, StatusTransition};
use crate::domain::shared::{Money, OrderId, ProductId, UserId};

/// Map an sqlx failure onto the domain error taxonomy.
pub(crate) fn db_err(err: sqlx::Error) -> OrderError {
    OrderError::Persistence(err.to_string())
}

/// Postgres-backed implementation of the persistence ports.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if the pool cannot be established.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, OrderError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(db_err)?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), OrderError> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(|e| OrderError::Persistence(e.to_string()))
    }
}

#[async_trait]
impl ProductLedger for PgStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        products::find_by_id(&mut conn, id).await
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        products::find_by_ids(&mut conn, ids).await
    }
}

#[async_trait]
impl OrderStore for PgStore {
    async fn create_order(&self, draft: OrderDraft) -> Result<PlacedOrder, OrderError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let order = orders::insert_order(&mut tx, &draft).await?;
        let order_items = orders::insert_items(&mut tx, order.id, &draft.lines).await?;

        // Purchased lines leave the cart in the same unit of work; a user
        // without a cart is a no-op.
        if let Some(cart_id) = carts::cart_id_of(&mut tx, draft.user_id).await? {
            carts::remove_items(&mut tx, cart_id, &draft.product_ids()).await?;
        }

        tx.commit().await.map_err(db_err)?;

        Ok(PlacedOrder { order, order_items })
    }

    async fn transition_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Row lock: concurrent transitions of the same order serialize here,
        // so the idempotent-confirm guard holds under racing requests.
        let order = orders::find_for_update(&mut tx, order_id)
            .await?
            .ok_or(OrderError::OrderNotFound { order_id })?;

        let plan = StatusTransition::plan(order.status, new_status)?;

        if plan.deduct_stock {
            let items = orders::items_of(&mut tx, order_id).await?;
            for item in &items {
                products::decrement_stock(&mut tx, item.product_id, item.quantity).await?;
            }
        }

        let updated = orders::update_status(&mut tx, order_id, plan).await?;

        tx.commit().await.map_err(db_err)?;
        Ok(updated)
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderWithItems>, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let orders = orders::list_for_user(&mut conn, user_id).await?;
        orders::attach_items(&mut conn, orders).await
    }

    async fn list_all(&self) -> Result<Vec<OrderWithItems>, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        let orders = orders::list_all(&mut conn).await?;
        orders::attach_items(&mut conn, orders).await
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        orders::list_recent(&mut conn, limit).await
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        orders::list_between(&mut conn, from, to).await
    }

    async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Money, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        orders::revenue_between(&mut conn, from, to).await
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn cart_for_user(&self, user_id: UserId) -> Result<Option<CartView>, OrderError> {
        let mut conn = self.pool.acquire().await.map_err(db_err)?;
        carts::view(&mut conn, user_id).await
    }

    async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, OrderError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        let line = carts::upsert_line(&mut tx, user_id, product_id, quantity).await?;
        tx.commit().await.map_err(db_err)?;
        Ok(line)
    }
}
