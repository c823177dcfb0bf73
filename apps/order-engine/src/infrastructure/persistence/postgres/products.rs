//! Inventory ledger queries.
//!
//! Callers supply the connection or transaction handle; the
//! check-and-decrement is a single conditional UPDATE so a concurrent
//! confirmation can never take the same units twice.

use sqlx::PgConnection;

use crate::domain::catalog::Product;
use crate::domain::ordering::OrderError;
use crate::domain::shared::ProductId;

use super::db_err;
use super::rows::ProductRow;

const SELECT_PRODUCT: &str =
    "SELECT id, name, price, discount, stock_quantity FROM products WHERE id = $1";

const SELECT_PRODUCTS: &str =
    "SELECT id, name, price, discount, stock_quantity FROM products WHERE id = ANY($1)";

const DECREMENT_STOCK: &str = "UPDATE products \
     SET stock_quantity = stock_quantity - $2, updated_at = now() \
     WHERE id = $1 AND stock_quantity >= $2";

const SELECT_NAME: &str = "SELECT name FROM products WHERE id = $1";

pub(crate) async fn find_by_id(
    conn: &mut PgConnection,
    id: ProductId,
) -> Result<Option<Product>, OrderError> {
    let row = sqlx::query_as::<_, ProductRow>(SELECT_PRODUCT)
        .bind(id.value())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
    Ok(row.map(Product::from))
}

pub(crate) async fn find_by_ids(
    conn: &mut PgConnection,
    ids: &[ProductId],
) -> Result<Vec<Product>, OrderError> {
    let raw: Vec<i64> = ids.iter().map(|id| id.value()).collect();
    let rows = sqlx::query_as::<_, ProductRow>(SELECT_PRODUCTS)
        .bind(&raw)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
    Ok(rows.into_iter().map(Product::from).collect())
}

/// Deduct `quantity` units, failing if that would push stock negative.
pub(crate) async fn decrement_stock(
    conn: &mut PgConnection,
    id: ProductId,
    quantity: i32,
) -> Result<(), OrderError> {
    let result = sqlx::query(DECREMENT_STOCK)
        .bind(id.value())
        .bind(quantity)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;

    if result.rows_affected() == 1 {
        return Ok(());
    }

    // Nothing was updated: either the stock would go negative or the product
    // row is gone. Distinguish for the error message.
    let name: Option<String> = sqlx::query_scalar(SELECT_NAME)
        .bind(id.value())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;

    match name {
        Some(name) => Err(OrderError::InsufficientStock { name }),
        None => Err(OrderError::UnknownProduct { product_id: id }),
    }
}
