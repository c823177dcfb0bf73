//! Cart table queries.

use sqlx::PgConnection;

use crate::application::ports::{CartLine, CartView, CartViewLine};
use crate::domain::catalog::Product;
use crate::domain::ordering::OrderError;
use crate::domain::shared::{CartId, CartItemId, ProductId, UserId};

use super::db_err;
use super::rows::CartItemRow;

pub(crate) async fn cart_id_of(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Option<CartId>, OrderError> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = $1")
        .bind(user_id.value())
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
    Ok(id.map(CartId::new))
}

/// Delete the cart lines for exactly the given products. Lines for other
/// products stay.
pub(crate) async fn remove_items(
    conn: &mut PgConnection,
    cart_id: CartId,
    product_ids: &[ProductId],
) -> Result<u64, OrderError> {
    let raw: Vec<i64> = product_ids.iter().map(|id| id.value()).collect();
    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = ANY($2)")
        .bind(cart_id.value())
        .bind(&raw)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
    Ok(result.rows_affected())
}

/// The user's cart joined with product detail.
pub(crate) async fn view(
    conn: &mut PgConnection,
    user_id: UserId,
) -> Result<Option<CartView>, OrderError> {
    let Some(cart_id) = cart_id_of(&mut *conn, user_id).await? else {
        return Ok(None);
    };

    #[derive(sqlx::FromRow)]
    struct ViewRow {
        cart_item_id: i64,
        quantity: i32,
        product_id: i64,
        name: String,
        price: rust_decimal::Decimal,
        discount: rust_decimal::Decimal,
        stock_quantity: i32,
    }

    let rows = sqlx::query_as::<_, ViewRow>(
        "SELECT ci.id AS cart_item_id, ci.quantity, \
                p.id AS product_id, p.name, p.price, p.discount, p.stock_quantity \
         FROM cart_items ci \
         JOIN products p ON p.id = ci.product_id \
         WHERE ci.cart_id = $1 \
         ORDER BY ci.id",
    )
    .bind(cart_id.value())
    .fetch_all(&mut *conn)
    .await
    .map_err(db_err)?;

    let items = rows
        .into_iter()
        .map(|row| CartViewLine {
            cart_item_id: CartItemId::new(row.cart_item_id),
            quantity: row.quantity,
            product: Product {
                id: ProductId::new(row.product_id),
                name: row.name,
                price: crate::domain::shared::Money::new(row.price),
                discount: row.discount,
                stock_quantity: row.stock_quantity,
            },
        })
        .collect();

    Ok(Some(CartView { cart_id, items }))
}

/// Add to an existing line or create one, creating the cart itself lazily.
pub(crate) async fn upsert_line(
    conn: &mut PgConnection,
    user_id: UserId,
    product_id: ProductId,
    quantity: i32,
) -> Result<CartLine, OrderError> {
    let cart_id = match cart_id_of(&mut *conn, user_id).await? {
        Some(id) => id,
        None => {
            let id: i64 =
                sqlx::query_scalar("INSERT INTO carts (user_id) VALUES ($1) RETURNING id")
                    .bind(user_id.value())
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(db_err)?;
            CartId::new(id)
        }
    };

    let updated = sqlx::query_as::<_, CartItemRow>(
        "UPDATE cart_items SET quantity = quantity + $3, updated_at = now() \
         WHERE cart_id = $1 AND product_id = $2 \
         RETURNING id, cart_id, product_id, quantity",
    )
    .bind(cart_id.value())
    .bind(product_id.value())
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_err)?;

    if let Some(row) = updated {
        return Ok(CartLine::from(row));
    }

    let row = sqlx::query_as::<_, CartItemRow>(
        "INSERT INTO cart_items (cart_id, product_id, quantity) \
         VALUES ($1, $2, $3) \
         RETURNING id, cart_id, product_id, quantity",
    )
    .bind(cart_id.value())
    .bind(product_id.value())
    .bind(quantity)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_err)?;

    Ok(CartLine::from(row))
}
