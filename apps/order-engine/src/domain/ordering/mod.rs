//! Ordering Bounded Context
//!
//! Manages the order lifecycle from basket validation through fulfillment.
//!
//! # Key Concepts
//!
//! - **Order Draft**: the validated, priced aggregate before persistence
//! - **Price Snapshot**: line prices are fixed at creation, never recomputed
//! - **Two-Phase Stock**: stock is checked at placement but only deducted at
//!   the `confirmed` transition, exactly once

pub mod aggregate;
pub mod errors;
pub mod pricing;
pub mod services;
pub mod value_objects;

pub use aggregate::{NewOrder, Order, OrderDraft, OrderItem, OrderLineDraft, RequestedLine};
pub use errors::{ErrorKind, OrderError};
pub use services::{StatusTransition, TransitionPlan};
pub use value_objects::{OrderStatus, PaymentMethod, PaymentStatus};
