//! Strongly-typed identifiers for domain entities.
//!
//! These prevent mixing up IDs from different contexts. All identifiers wrap
//! the store's 64-bit surrogate key.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create an identifier from a raw key.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw key.
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(UserId, "Unique identifier for a user (owned by the auth system).");
define_id!(ProductId, "Unique identifier for a catalog product.");
define_id!(OrderId, "Unique identifier for an order.");
define_id!(OrderItemId, "Unique identifier for a line item within an order.");
define_id!(CartId, "Unique identifier for a user's cart.");
define_id!(CartItemId, "Unique identifier for a line within a cart.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_new_and_display() {
        let id = OrderId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(format!("{id}"), "42");
    }

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(ProductId::new(7), ProductId::new(7));
        assert_ne!(ProductId::new(7), ProductId::new(8));
    }

    #[test]
    fn id_from_i64_roundtrip() {
        let id: UserId = 9.into();
        let raw: i64 = id.into();
        assert_eq!(raw, 9);
    }

    #[test]
    fn id_serde_is_transparent() {
        let id = CartId::new(3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "3");

        let parsed: CartId = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, id);
    }
}
