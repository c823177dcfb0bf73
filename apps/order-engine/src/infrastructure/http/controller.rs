//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that authenticates callers and delegates to the
//! application use cases.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::dto::{AddCartItemDto, PlaceOrderDto, UpdateStatusDto};
use crate::application::ports::{CartStore, CartView, OrderStore, ProductLedger};
use crate::application::use_cases::{
    ListOrdersUseCase, ManageCartUseCase, PlaceOrderUseCase, UpdateOrderStatusUseCase,
};
use crate::domain::shared::{Money, OrderId, UserId};

use super::auth::{AuthUser, JwtAuth, Role};
use super::response::{ApiError, Envelope};

/// Application state shared across handlers.
pub struct AppState<L, S, C>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    /// Use case for placing orders.
    pub place_order: Arc<PlaceOrderUseCase<L, S>>,
    /// Use case for status transitions.
    pub update_status: Arc<UpdateOrderStatusUseCase<S>>,
    /// Read-side order use cases.
    pub list_orders: Arc<ListOrdersUseCase<S>>,
    /// Cart use cases.
    pub cart: Arc<ManageCartUseCase<C, L>>,
    /// Bearer-token verifier.
    pub auth: Arc<JwtAuth>,
    /// Application version, reported by the health probe.
    pub version: String,
}

impl<L, S, C> Clone for AppState<L, S, C>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    fn clone(&self) -> Self {
        Self {
            place_order: Arc::clone(&self.place_order),
            update_status: Arc::clone(&self.update_status),
            list_orders: Arc::clone(&self.list_orders),
            cart: Arc::clone(&self.cart),
            auth: Arc::clone(&self.auth),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<L, S, C>(state: AppState<L, S, C>) -> Router
where
    L: ProductLedger + 'static,
    S: OrderStore + 'static,
    C: CartStore + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/orders", post(create_order).get(list_all_orders))
        .route("/api/v1/orders/recent", get(recent_orders))
        .route(
            "/api/v1/orders/current-month-revenue",
            get(current_month_revenue),
        )
        .route("/api/v1/orders/by-time-range", get(orders_by_time_range))
        .route("/api/v1/orders/{user_id}", get(orders_for_user))
        .route("/api/v1/orders/{order_id}/status", put(update_order_status))
        .route("/api/v1/cart", get(view_cart).post(add_cart_item))
        .with_state(state)
}

fn authorize<L, S, C>(
    state: &AppState<L, S, C>,
    headers: &HeaderMap,
    allowed: &[Role],
) -> Result<AuthUser, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    let user = state.auth.authenticate(headers)?;
    user.require_role(allowed)?;
    Ok(user)
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint.
async fn health_check<L, S, C>(State(state): State<AppState<L, S, C>>) -> impl IntoResponse
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Place an order from the authenticated customer's basket.
async fn create_order<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
    Json(body): Json<PlaceOrderDto>,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    let user = authorize(&state, &headers, &[Role::Customer])?;
    let placed = state.place_order.execute(user.user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Order created successfully", placed)),
    ))
}

/// Drive an order through its status lifecycle.
async fn update_order_status<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
    Path(order_id): Path<i64>,
    Json(body): Json<UpdateStatusDto>,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    authorize(&state, &headers, &[Role::Admin, Role::Staff, Role::Customer])?;
    let order = state
        .update_status
        .execute(OrderId::new(order_id), body.status)
        .await?;
    Ok(Json(Envelope::success(
        "Order status updated successfully",
        order,
    )))
}

/// List one user's orders with nested items.
async fn orders_for_user<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    let caller = authorize(&state, &headers, &[Role::Admin, Role::Staff, Role::Customer])?;
    let target = UserId::new(user_id);

    // Customers can only read their own orders.
    if caller.role == Role::Customer && caller.user_id != target {
        return Err(super::auth::AuthError::Forbidden.into());
    }

    let orders = state.list_orders.for_user(target).await?;
    Ok(Json(Envelope::success("Orders fetched successfully", orders)))
}

/// List every order with nested items.
async fn list_all_orders<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    authorize(&state, &headers, &[Role::Admin, Role::Staff])?;
    let orders = state.list_orders.all().await?;
    Ok(Json(Envelope::success("Orders fetched successfully", orders)))
}

#[derive(Debug, Deserialize)]
struct RecentQuery {
    limit: Option<i64>,
}

/// List the most recent orders.
async fn recent_orders<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    authorize(&state, &headers, &[Role::Admin, Role::Staff])?;
    let orders = state.list_orders.recent(query.limit).await?;
    Ok(Json(Envelope::success("Orders fetched successfully", orders)))
}

#[derive(Debug, Deserialize)]
struct RangeQuery {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

/// List orders placed within a time range.
async fn orders_by_time_range<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    authorize(&state, &headers, &[Role::Admin, Role::Staff])?;
    let orders = state.list_orders.between(query.from, query.to).await?;
    Ok(Json(Envelope::success("Orders fetched successfully", orders)))
}

#[derive(Debug, Clone, Copy, Serialize)]
struct RevenueData {
    revenue: Money,
}

/// Revenue for the current calendar month.
async fn current_month_revenue<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    authorize(&state, &headers, &[Role::Admin])?;
    let revenue = state.list_orders.current_month_revenue(Utc::now()).await?;
    Ok(Json(Envelope::success(
        "Revenue fetched successfully",
        RevenueData { revenue },
    )))
}

/// The authenticated customer's cart.
async fn view_cart<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    let user = authorize(&state, &headers, &[Role::Customer])?;
    let response = match state.cart.view(user.user_id).await? {
        Some(cart) => Envelope::success("Cart fetched successfully", cart),
        None => Envelope::<CartView>::empty("no cart for this user"),
    };
    Ok(Json(response))
}

/// Add a product to the authenticated customer's cart.
async fn add_cart_item<L, S, C>(
    State(state): State<AppState<L, S, C>>,
    headers: HeaderMap,
    Json(body): Json<AddCartItemDto>,
) -> Result<impl IntoResponse, ApiError>
where
    L: ProductLedger,
    S: OrderStore,
    C: CartStore,
{
    let user = authorize(&state, &headers, &[Role::Customer])?;
    let line = state.cart.add(user.user_id, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::success("Product added to cart", line)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::shared::ProductId;
    use crate::infrastructure::http::auth::Claims;
    use crate::infrastructure::persistence::InMemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    type TestState = AppState<InMemoryStore, InMemoryStore, InMemoryStore>;

    fn create_test_state() -> (TestState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        store.seed_product(Product {
            id: ProductId::new(1),
            name: "Ceramic mug".to_string(),
            price: Money::new(dec!(100)),
            discount: dec!(10),
            stock_quantity: 5,
        });

        let state = AppState {
            place_order: Arc::new(PlaceOrderUseCase::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Money::new(dec!(30000)),
            )),
            update_status: Arc::new(UpdateOrderStatusUseCase::new(Arc::clone(&store))),
            list_orders: Arc::new(ListOrdersUseCase::new(Arc::clone(&store))),
            cart: Arc::new(ManageCartUseCase::new(Arc::clone(&store), Arc::clone(&store))),
            auth: Arc::new(JwtAuth::new(SECRET)),
            version: "1.0.0-test".to_string(),
        };
        (state, store)
    }

    fn token(user_id: i64, role: Role) -> String {
        let claims = Claims {
            user_id,
            role,
            exp: usize::MAX,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    async fn send(
        app: Router,
        method: &str,
        uri: &str,
        bearer: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn order_body() -> serde_json::Value {
        serde_json::json!({
            "shipping_address": "12 Elm Street",
            "payment_method": "cod",
            "products": [{"product_id": 1, "quantity": 3}],
            "shipping_fee": 30000
        })
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let (state, _) = create_test_state();
        let (status, body) = send(create_router(state), "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn create_order_returns_201_with_envelope() {
        let (state, store) = create_test_state();
        let customer = token(7, Role::Customer);

        let (status, body) = send(
            create_router(state),
            "POST",
            "/api/v1/orders",
            Some(&customer),
            Some(order_body()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], 1);
        assert_eq!(body["data"]["order"]["status"], "pending");
        let total: rust_decimal::Decimal = body["data"]["order"]["total_amount"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(total, dec!(30270));
        assert_eq!(body["data"]["order_items"][0]["quantity"], 3);
        // Placement does not touch stock.
        assert_eq!(store.stock_of(ProductId::new(1)), Some(5));
    }

    #[tokio::test]
    async fn create_order_requires_a_token() {
        let (state, _) = create_test_state();
        let (status, body) = send(
            create_router(state),
            "POST",
            "/api/v1/orders",
            None,
            Some(order_body()),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 0);
    }

    #[tokio::test]
    async fn create_order_is_customer_only() {
        let (state, _) = create_test_state();
        let staff = token(2, Role::Staff);
        let (status, _) = send(
            create_router(state),
            "POST",
            "/api/v1/orders",
            Some(&staff),
            Some(order_body()),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn create_order_rejects_an_empty_basket() {
        let (state, _) = create_test_state();
        let customer = token(7, Role::Customer);
        let (status, body) = send(
            create_router(state),
            "POST",
            "/api/v1/orders",
            Some(&customer),
            Some(serde_json::json!({
                "shipping_address": "12 Elm Street",
                "payment_method": "cod",
                "products": []
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], -1);
    }

    #[tokio::test]
    async fn confirming_an_order_deducts_stock_through_the_api() {
        let (state, store) = create_test_state();
        let app = create_router(state);
        let customer = token(7, Role::Customer);
        let staff = token(2, Role::Staff);

        let (_, created) = send(
            app.clone(),
            "POST",
            "/api/v1/orders",
            Some(&customer),
            Some(order_body()),
        )
        .await;
        let order_id = created["data"]["order"]["id"].as_i64().unwrap();

        let (status, body) = send(
            app,
            "PUT",
            &format!("/api/v1/orders/{order_id}/status"),
            Some(&staff),
            Some(serde_json::json!({"status": "confirmed"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "confirmed");
        assert_eq!(store.stock_of(ProductId::new(1)), Some(2));
    }

    #[tokio::test]
    async fn confirmation_shortfall_maps_to_409() {
        let (state, store) = create_test_state();
        let app = create_router(state);
        let customer = token(7, Role::Customer);

        let (_, created) = send(
            app.clone(),
            "POST",
            "/api/v1/orders",
            Some(&customer),
            Some(order_body()),
        )
        .await;
        let order_id = created["data"]["order"]["id"].as_i64().unwrap();
        store.set_stock(ProductId::new(1), 0);

        let (status, body) = send(
            app,
            "PUT",
            &format!("/api/v1/orders/{order_id}/status"),
            Some(&customer),
            Some(serde_json::json!({"status": "confirmed"})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], -1);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Ceramic mug"));
    }

    #[tokio::test]
    async fn updating_a_missing_order_is_404() {
        let (state, _) = create_test_state();
        let staff = token(2, Role::Staff);
        let (status, _) = send(
            create_router(state),
            "PUT",
            "/api/v1/orders/404/status",
            Some(&staff),
            Some(serde_json::json!({"status": "confirmed"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn customers_cannot_read_other_users_orders() {
        let (state, _) = create_test_state();
        let app = create_router(state);
        let customer = token(7, Role::Customer);

        let (status, _) = send(app.clone(), "GET", "/api/v1/orders/8", Some(&customer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(app, "GET", "/api/v1/orders/7", Some(&customer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 1);
    }

    #[tokio::test]
    async fn staff_can_read_any_users_orders() {
        let (state, _) = create_test_state();
        let staff = token(2, Role::Staff);
        let (status, _) = send(
            create_router(state),
            "GET",
            "/api/v1/orders/7",
            Some(&staff),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn order_listing_reports_are_staff_only() {
        let (state, _) = create_test_state();
        let app = create_router(state);
        let customer = token(7, Role::Customer);
        let staff = token(2, Role::Staff);

        let (status, _) = send(app.clone(), "GET", "/api/v1/orders", Some(&customer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            app.clone(),
            "GET",
            "/api/v1/orders/recent?limit=5",
            Some(&staff),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 1);

        // Revenue is admin-only.
        let (status, _) = send(
            app.clone(),
            "GET",
            "/api/v1/orders/current-month-revenue",
            Some(&staff),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let admin = token(1, Role::Admin);
        let (status, body) = send(
            app,
            "GET",
            "/api/v1/orders/current-month-revenue",
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["revenue"].is_string() || body["data"]["revenue"].is_number());
    }

    #[tokio::test]
    async fn cart_flow_roundtrip() {
        let (state, _) = create_test_state();
        let app = create_router(state);
        let customer = token(7, Role::Customer);

        let (status, body) = send(app.clone(), "GET", "/api/v1/cart", Some(&customer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 0);

        let (status, _) = send(
            app.clone(),
            "POST",
            "/api/v1/cart",
            Some(&customer),
            Some(serde_json::json!({"product_id": 1, "quantity": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(app, "GET", "/api/v1/cart", Some(&customer), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["code"], 1);
        assert_eq!(body["data"]["items"][0]["quantity"], 2);
        assert_eq!(body["data"]["items"][0]["product"]["name"], "Ceramic mug");
    }

    #[tokio::test]
    async fn ordered_cart_lines_disappear_after_placement() {
        let (state, store) = create_test_state();
        let app = create_router(state);
        let customer = token(7, Role::Customer);

        store.seed_product(Product {
            id: ProductId::new(2),
            name: "Oak tray".to_string(),
            price: Money::new(dec!(40)),
            discount: dec!(0),
            stock_quantity: 10,
        });
        store.seed_cart_line(UserId::new(7), ProductId::new(1), 2);
        store.seed_cart_line(UserId::new(7), ProductId::new(2), 1);

        let (status, _) = send(
            app.clone(),
            "POST",
            "/api/v1/orders",
            Some(&customer),
            Some(order_body()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(app, "GET", "/api/v1/cart", Some(&customer), None).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["product"]["name"], "Oak tray");
    }
}
