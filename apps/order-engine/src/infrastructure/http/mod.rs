//! HTTP adapter: router, auth, and the response envelope.

pub mod auth;
pub mod controller;
pub mod response;

pub use auth::{AuthError, AuthUser, JwtAuth, Role};
pub use controller::{create_router, AppState};
pub use response::{ApiError, Envelope};
