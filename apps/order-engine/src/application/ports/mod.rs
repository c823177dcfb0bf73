//! Ports
//!
//! Interfaces the use cases depend on, implemented by adapters in the
//! infrastructure layer (Postgres, in-memory).

mod cart_store;
mod order_store;
mod product_ledger;

pub use cart_store::{CartLine, CartStore, CartView, CartViewLine};
pub use order_store::{OrderStore, OrderWithItems, PlacedOrder};
pub use product_ledger::ProductLedger;
