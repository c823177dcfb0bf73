//! In-memory store for testing and development.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::ports::{
    CartLine, CartStore, CartView, CartViewLine, OrderStore, OrderWithItems, PlacedOrder,
    ProductLedger,
};
use crate::domain::catalog::Product;
use crate::domain::ordering::{
    Order, OrderDraft, OrderError, OrderItem, OrderStatus, StatusTransition,
};
use crate::domain::shared::{
    CartId, CartItemId, Money, OrderId, OrderItemId, ProductId, UserId,
};

#[derive(Debug)]
struct CartRecord {
    id: CartId,
    user_id: UserId,
    lines: Vec<CartLine>,
}

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    carts: Vec<CartRecord>,
    next_order_id: i64,
    next_order_item_id: i64,
    next_cart_id: i64,
    next_cart_item_id: i64,
}

/// In-memory implementation of the ledger, order store and cart store.
///
/// One mutex guards the whole state, so every trait method is one atomic
/// unit, mirroring the transactional guarantees of the Postgres adapter.
/// Suitable for tests and development, not production.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, OrderError> {
        self.state
            .lock()
            .map_err(|_| OrderError::Persistence("store mutex poisoned".to_string()))
    }

    /// Insert a product (test/dev setup).
    pub fn seed_product(&self, product: Product) {
        if let Ok(mut state) = self.state.lock() {
            state.products.insert(product.id, product);
        }
    }

    /// Overwrite a product's stock (test/dev setup).
    pub fn set_stock(&self, product_id: ProductId, stock: i32) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(p) = state.products.get_mut(&product_id) {
                p.stock_quantity = stock;
            }
        }
    }

    /// Current stock of a product, if it exists.
    #[must_use]
    pub fn stock_of(&self, product_id: ProductId) -> Option<i32> {
        self.state
            .lock()
            .ok()
            .and_then(|state| state.products.get(&product_id).map(|p| p.stock_quantity))
    }

    /// Put a line into a user's cart, creating the cart if needed
    /// (test/dev setup).
    pub fn seed_cart_line(&self, user_id: UserId, product_id: ProductId, quantity: i32) {
        if let Ok(mut state) = self.state.lock() {
            let _ = upsert_cart_line(&mut state, user_id, product_id, quantity);
        }
    }
}

fn upsert_cart_line(
    state: &mut State,
    user_id: UserId,
    product_id: ProductId,
    quantity: i32,
) -> CartLine {
    let cart_idx = match state.carts.iter().position(|c| c.user_id == user_id) {
        Some(idx) => idx,
        None => {
            state.next_cart_id += 1;
            let record = CartRecord {
                id: CartId::new(state.next_cart_id),
                user_id,
                lines: Vec::new(),
            };
            state.carts.push(record);
            state.carts.len() - 1
        }
    };

    let cart_id = state.carts[cart_idx].id;

    if let Some(line) = state.carts[cart_idx]
        .lines
        .iter_mut()
        .find(|l| l.product_id == product_id)
    {
        line.quantity += quantity;
        return *line;
    }

    state.next_cart_item_id += 1;
    let line = CartLine {
        cart_item_id: CartItemId::new(state.next_cart_item_id),
        cart_id,
        product_id,
        quantity,
    };
    state.carts[cart_idx].lines.push(line);
    line
}

/// Orders sorted newest first; ids break timestamp ties.
fn sorted_desc(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| (b.order_date, b.id).cmp(&(a.order_date, a.id)));
    orders
}

fn attach_items(state: &State, orders: Vec<Order>) -> Vec<OrderWithItems> {
    orders
        .into_iter()
        .map(|order| {
            let order_items = state
                .order_items
                .iter()
                .filter(|i| i.order_id == order.id)
                .cloned()
                .collect();
            OrderWithItems { order, order_items }
        })
        .collect()
}

#[async_trait]
impl ProductLedger for InMemoryStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, OrderError> {
        Ok(self.lock()?.products.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, OrderError> {
        let state = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create_order(&self, draft: OrderDraft) -> Result<PlacedOrder, OrderError> {
        let mut state = self.lock()?;
        let now = Utc::now();

        state.next_order_id += 1;
        let order = Order {
            id: OrderId::new(state.next_order_id),
            user_id: draft.user_id,
            order_date: now,
            status: draft.status,
            total_amount: draft.total_amount,
            shipping_address: draft.shipping_address.clone(),
            payment_method: draft.payment_method,
            payment_status: draft.payment_status,
            created_at: now,
            updated_at: now,
        };

        let mut order_items = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            state.next_order_item_id += 1;
            order_items.push(OrderItem {
                id: OrderItemId::new(state.next_order_item_id),
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price_at_order_time: line.price_at_order_time,
            });
        }

        // Clear purchased lines from the cart; untouched lines survive and a
        // missing cart is a no-op.
        let ordered: Vec<ProductId> = draft.product_ids();
        if let Some(cart) = state.carts.iter_mut().find(|c| c.user_id == draft.user_id) {
            cart.lines.retain(|l| !ordered.contains(&l.product_id));
        }

        state.orders.push(order.clone());
        state.order_items.extend(order_items.iter().cloned());

        Ok(PlacedOrder { order, order_items })
    }

    async fn transition_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mut state = self.lock()?;

        let idx = state
            .orders
            .iter()
            .position(|o| o.id == order_id)
            .ok_or(OrderError::OrderNotFound { order_id })?;

        let plan = StatusTransition::plan(state.orders[idx].status, new_status)?;

        if plan.deduct_stock {
            let items: Vec<OrderItem> = state
                .order_items
                .iter()
                .filter(|i| i.order_id == order_id)
                .cloned()
                .collect();

            // Check every line before touching anything, so a shortfall on
            // the last line leaves earlier lines undeducted.
            for item in &items {
                let product =
                    state
                        .products
                        .get(&item.product_id)
                        .ok_or(OrderError::UnknownProduct {
                            product_id: item.product_id,
                        })?;
                if !product.has_stock(item.quantity) {
                    return Err(OrderError::InsufficientStock {
                        name: product.name.clone(),
                    });
                }
            }
            for item in &items {
                if let Some(product) = state.products.get_mut(&item.product_id) {
                    product.stock_quantity -= item.quantity;
                }
            }
        }

        let order = &mut state.orders[idx];
        order.status = plan.next;
        if plan.mark_paid {
            order.payment_status = crate::domain::ordering::PaymentStatus::Paid;
        }
        order.updated_at = Utc::now();

        Ok(order.clone())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<OrderWithItems>, OrderError> {
        let state = self.lock()?;
        let orders = sorted_desc(
            state
                .orders
                .iter()
                .filter(|o| o.user_id == user_id)
                .cloned()
                .collect(),
        );
        Ok(attach_items(&state, orders))
    }

    async fn list_all(&self) -> Result<Vec<OrderWithItems>, OrderError> {
        let state = self.lock()?;
        let orders = sorted_desc(state.orders.clone());
        Ok(attach_items(&state, orders))
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<Order>, OrderError> {
        let state = self.lock()?;
        let mut orders = sorted_desc(state.orders.clone());
        orders.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(orders)
    }

    async fn list_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderError> {
        let state = self.lock()?;
        Ok(sorted_desc(
            state
                .orders
                .iter()
                .filter(|o| o.order_date >= from && o.order_date < to)
                .cloned()
                .collect(),
        ))
    }

    async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Money, OrderError> {
        let state = self.lock()?;
        Ok(state
            .orders
            .iter()
            .filter(|o| {
                o.status != OrderStatus::Cancelled && o.order_date >= from && o.order_date < to
            })
            .fold(Money::ZERO, |acc, o| acc + o.total_amount))
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn cart_for_user(&self, user_id: UserId) -> Result<Option<CartView>, OrderError> {
        let state = self.lock()?;
        let Some(cart) = state.carts.iter().find(|c| c.user_id == user_id) else {
            return Ok(None);
        };

        let mut items = Vec::with_capacity(cart.lines.len());
        for line in &cart.lines {
            let product =
                state
                    .products
                    .get(&line.product_id)
                    .ok_or(OrderError::Persistence(format!(
                        "cart references missing product {}",
                        line.product_id
                    )))?;
            items.push(CartViewLine {
                cart_item_id: line.cart_item_id,
                quantity: line.quantity,
                product: product.clone(),
            });
        }

        Ok(Some(CartView {
            cart_id: cart.id,
            items,
        }))
    }

    async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, OrderError> {
        let mut state = self.lock()?;
        Ok(upsert_cart_line(&mut state, user_id, product_id, quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ordering::aggregate::OrderLineDraft;
    use crate::domain::ordering::{PaymentMethod, PaymentStatus};
    use rust_decimal_macros::dec;

    fn product(id: i64, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            price: Money::new(dec!(10)),
            discount: dec!(0),
            stock_quantity: stock,
        }
    }

    fn draft(user: i64, lines: Vec<(i64, i32)>) -> OrderDraft {
        let lines: Vec<OrderLineDraft> = lines
            .into_iter()
            .map(|(product_id, quantity)| OrderLineDraft {
                product_id: ProductId::new(product_id),
                quantity,
                price_at_order_time: Money::new(dec!(10)),
            })
            .collect();
        let total = lines
            .iter()
            .fold(Money::ZERO, |acc, l| acc + l.subtotal());
        OrderDraft {
            user_id: UserId::new(user),
            status: OrderStatus::Pending,
            total_amount: total,
            shipping_address: "12 Elm Street".to_string(),
            payment_method: PaymentMethod::Cod,
            payment_status: PaymentStatus::Unpaid,
            lines,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_links_items() {
        let store = InMemoryStore::new();
        store.seed_product(product(1, 10));

        let first = store.create_order(draft(1, vec![(1, 2)])).await.unwrap();
        let second = store.create_order(draft(1, vec![(1, 1)])).await.unwrap();

        assert_ne!(first.order.id, second.order.id);
        assert_eq!(first.order_items[0].order_id, first.order.id);
    }

    #[tokio::test]
    async fn ledger_lookup_skips_missing_ids() {
        let store = InMemoryStore::new();
        store.seed_product(product(1, 10));

        let found = store
            .find_by_ids(&[ProductId::new(1), ProductId::new(2)])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn shortfall_on_a_later_line_leaves_earlier_lines_undeducted() {
        let store = InMemoryStore::new();
        store.seed_product(product(1, 10));
        store.seed_product(product(2, 1));

        let placed = store
            .create_order(draft(1, vec![(1, 2), (2, 1)]))
            .await
            .unwrap();
        store.set_stock(ProductId::new(2), 0);

        let err = store
            .transition_status(placed.order.id, OrderStatus::Confirmed)
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::InsufficientStock { .. }));
        assert_eq!(store.stock_of(ProductId::new(1)), Some(10));
        assert_eq!(store.stock_of(ProductId::new(2)), Some(0));
    }

    #[tokio::test]
    async fn revenue_window_is_half_open() {
        let store = InMemoryStore::new();
        store.seed_product(product(1, 10));
        let placed = store.create_order(draft(1, vec![(1, 1)])).await.unwrap();

        let placed_at = placed.order.order_date;
        let revenue = store
            .revenue_between(placed_at, placed_at + chrono::Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(revenue.amount(), dec!(10));

        let revenue = store
            .revenue_between(placed_at - chrono::Duration::seconds(1), placed_at)
            .await
            .unwrap();
        assert!(revenue.is_zero());
    }
}
