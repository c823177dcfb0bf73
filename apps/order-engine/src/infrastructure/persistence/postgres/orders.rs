//! Order table queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::application::ports::OrderWithItems;
use crate::domain::ordering::{Order, OrderDraft, OrderError, OrderItem, OrderLineDraft, TransitionPlan};
use crate::domain::shared::{Money, OrderId, UserId};

use super::db_err;
use super::rows::{OrderItemRow, OrderRow};

const ORDER_COLUMNS: &str = "id, user_id, order_date, status, total_amount, \
     shipping_address, payment_method, payment_status, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price_at_order_time";

pub(crate) async fn insert_order(
    conn: &mut PgConnection,
    draft: &OrderDraft,
) -> Result<Order, OrderError> {
    let sql = format!(
        "INSERT INTO orders \
         (user_id, order_date, status, total_amount, shipping_address, payment_method, payment_status) \
         VALUES ($1, now(), $2, $3, $4, $5, $6) \
         RETURNING {ORDER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(draft.user_id.value())
        .bind(draft.status.as_str())
        .bind(draft.total_amount.amount())
        .bind(&draft.shipping_address)
        .bind(draft.payment_method.as_str())
        .bind(draft.payment_status.as_str())
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;
    Order::try_from(row)
}

pub(crate) async fn insert_items(
    conn: &mut PgConnection,
    order_id: OrderId,
    lines: &[OrderLineDraft],
) -> Result<Vec<OrderItem>, OrderError> {
    let sql = format!(
        "INSERT INTO order_items (order_id, product_id, quantity, price_at_order_time) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {ITEM_COLUMNS}"
    );

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let row = sqlx::query_as::<_, OrderItemRow>(&sql)
            .bind(order_id.value())
            .bind(line.product_id.value())
            .bind(line.quantity)
            .bind(line.price_at_order_time.amount())
            .fetch_one(&mut *conn)
            .await
            .map_err(db_err)?;
        items.push(OrderItem::from(row));
    }
    Ok(items)
}

/// Load an order and take a row lock for the rest of the transaction.
pub(crate) async fn find_for_update(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Option<Order>, OrderError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(order_id.value())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
    row.map(Order::try_from).transpose()
}

pub(crate) async fn items_of(
    conn: &mut PgConnection,
    order_id: OrderId,
) -> Result<Vec<OrderItem>, OrderError> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
    let rows = sqlx::query_as::<_, OrderItemRow>(&sql)
        .bind(order_id.value())
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().map(OrderItem::from).collect())
}

pub(crate) async fn update_status(
    conn: &mut PgConnection,
    order_id: OrderId,
    plan: TransitionPlan,
) -> Result<Order, OrderError> {
    let sql = format!(
        "UPDATE orders \
         SET status = $2, \
             payment_status = CASE WHEN $3 THEN 'paid' ELSE payment_status END, \
             updated_at = now() \
         WHERE id = $1 \
         RETURNING {ORDER_COLUMNS}"
    );
    let row = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(order_id.value())
        .bind(plan.next.as_str())
        .bind(plan.mark_paid)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;
    Order::try_from(row)
}

pub(crate) async fn list_for_user(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Vec<Order>, OrderError> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY order_date DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(user_id.value())
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
    rows.into_iter().map(Order::try_from).collect()
}

pub(crate) async fn list_all(conn: &mut PgConnection) -> Result<Vec<Order>, OrderError> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC, id DESC");
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
    rows.into_iter().map(Order::try_from).collect()
}

pub(crate) async fn list_recent(
    conn: &mut PgConnection,
    limit: i64,
) -> Result<Vec<Order>, OrderError> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_date DESC, id DESC LIMIT $1"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
    rows.into_iter().map(Order::try_from).collect()
}

pub(crate) async fn list_between(
    conn: &mut PgConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Order>, OrderError> {
    let sql = format!(
        "SELECT {ORDER_COLUMNS} FROM orders \
         WHERE order_date >= $1 AND order_date < $2 \
         ORDER BY order_date DESC, id DESC"
    );
    let rows = sqlx::query_as::<_, OrderRow>(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
    rows.into_iter().map(Order::try_from).collect()
}

pub(crate) async fn revenue_between(
    conn: &mut PgConnection,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Money, OrderError> {
    let total: Decimal = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0) FROM orders \
         WHERE order_date >= $1 AND order_date < $2 AND status <> 'cancelled'",
    )
    .bind(from)
    .bind(to)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_err)?;
    Ok(Money::new(total))
}

/// Fetch the items of every order in one query and zip them back on.
pub(crate) async fn attach_items(
    conn: &mut PgConnection,
    orders: Vec<Order>,
) -> Result<Vec<OrderWithItems>, OrderError> {
    let ids: Vec<i64> = orders.iter().map(|o| o.id.value()).collect();
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
    );
    let rows = sqlx::query_as::<_, OrderItemRow>(&sql)
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;

    let mut by_order: std::collections::HashMap<OrderId, Vec<OrderItem>> =
        std::collections::HashMap::new();
    for item in rows.into_iter().map(OrderItem::from) {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderWithItems {
            order_items: by_order.remove(&order.id).unwrap_or_default(),
            order,
        })
        .collect())
}
