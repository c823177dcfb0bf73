// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Order Engine - Rust Core Library
//!
//! Transactional order placement and fulfillment engine for the Storefront
//! backend.
//!
//! # Architecture (Clean Architecture + DDD + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic (aggregates, value objects, services)
//!   - `catalog`: products as the engine sees them
//!   - `ordering`: draft builder, pricing, status state machine
//! - **Application**: Use cases and orchestration
//!   - `ports`: interfaces for persistence (`ProductLedger`, `OrderStore`,
//!     `CartStore`)
//!   - `use_cases`: `PlaceOrder`, `UpdateOrderStatus`, `ListOrders`,
//!     `ManageCart`
//!   - `dto`: request bodies crossing the API boundary
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: Postgres (sqlx) and in-memory stores
//!   - `http`: axum router, bearer auth, response envelope
//!
//! # Stock lifecycle
//!
//! Placement checks stock but does not reserve it; the one-time deduction
//! happens at the `confirmed` transition, inside the same transaction as the
//! status write. Both halves of that design are deliberate and covered by
//! tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

/// Configuration loading and validation.
pub mod config;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::catalog::Product;
pub use domain::ordering::{
    ErrorKind, NewOrder, Order, OrderDraft, OrderError, OrderItem, OrderStatus, PaymentMethod,
    PaymentStatus, StatusTransition, TransitionPlan,
};
pub use domain::shared::{CartId, CartItemId, Money, OrderId, OrderItemId, ProductId, UserId};

// Application re-exports
pub use application::dto::{AddCartItemDto, PlaceOrderDto, UpdateStatusDto};
pub use application::ports::{
    CartStore, CartView, OrderStore, OrderWithItems, PlacedOrder, ProductLedger,
};
pub use application::use_cases::{
    ListOrdersUseCase, ManageCartUseCase, PlaceOrderUseCase, UpdateOrderStatusUseCase,
};

// Infrastructure re-exports
pub use infrastructure::http::{create_router, AppState, JwtAuth, Role};
pub use infrastructure::persistence::{InMemoryStore, PgStore};
