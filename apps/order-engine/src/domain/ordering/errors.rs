//! Ordering errors.
//!
//! Every error carries a stable [`ErrorKind`] so the transport boundary can
//! map failures to status codes deterministically instead of matching on
//! message text.

use thiserror::Error;

use crate::domain::shared::{OrderId, ProductId};

use super::value_objects::OrderStatus;

/// Stable discriminant for [`OrderError`], mapped once at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller sent a malformed or unsatisfiable request.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// A business rule rejected the operation; retrying may succeed later.
    Conflict,
    /// The store failed for an infrastructure reason.
    Internal,
}

/// Errors raised by basket validation, order persistence and the status
/// state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Request-shape violation (empty basket, non-positive quantity, blank
    /// address, ...).
    #[error("invalid order data: {0}")]
    Validation(String),

    /// The basket referenced a product that does not exist.
    #[error("product {product_id} does not exist")]
    UnknownProduct {
        /// The offending product reference.
        product_id: ProductId,
    },

    /// Requested quantity exceeds units on hand, at placement or at
    /// confirmation.
    #[error("insufficient stock for product {name}")]
    InsufficientStock {
        /// Display name of the product that ran short.
        name: String,
    },

    /// No order with the given id.
    #[error("order {order_id} not found")]
    OrderNotFound {
        /// The order that was looked up.
        order_id: OrderId,
    },

    /// The status state machine rejected the transition.
    #[error("cannot move a {from} order to {to}")]
    InvalidTransition {
        /// Status the order is in.
        from: OrderStatus,
        /// Status that was requested.
        to: OrderStatus,
    },

    /// The atomic unit failed to commit; every effect was rolled back.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl OrderError {
    /// The stable kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::UnknownProduct { .. } => ErrorKind::Validation,
            Self::OrderNotFound { .. } => ErrorKind::NotFound,
            Self::InsufficientStock { .. } | Self::InvalidTransition { .. } => ErrorKind::Conflict,
            Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_validation_kind() {
        assert_eq!(
            OrderError::Validation("empty basket".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            OrderError::UnknownProduct {
                product_id: ProductId::new(9),
            }
            .kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn business_rule_errors_are_conflicts() {
        assert_eq!(
            OrderError::InsufficientStock {
                name: "mug".into(),
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            OrderError::InvalidTransition {
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending,
            }
            .kind(),
            ErrorKind::Conflict
        );
    }

    #[test]
    fn error_messages_name_the_offender() {
        let err = OrderError::InsufficientStock {
            name: "Ceramic mug".into(),
        };
        assert!(err.to_string().contains("Ceramic mug"));

        let err = OrderError::OrderNotFound {
            order_id: OrderId::new(77),
        };
        assert!(err.to_string().contains("77"));
    }

    #[test]
    fn transition_error_names_both_states() {
        let err = OrderError::InvalidTransition {
            from: OrderStatus::Cancelled,
            to: OrderStatus::Shipped,
        };
        let msg = err.to_string();
        assert!(msg.contains("cancelled"));
        assert!(msg.contains("shipped"));
    }
}
