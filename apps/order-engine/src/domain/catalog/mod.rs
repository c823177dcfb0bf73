//! Catalog Bounded Context
//!
//! The order engine only reads the catalog: product lookup feeds basket
//! validation, and stock is the one field the engine ever writes back
//! (through the ledger, at confirmation).

pub mod product;

pub use product::Product;
