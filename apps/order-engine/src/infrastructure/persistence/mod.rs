//! Persistence adapters.
//!
//! `postgres` is the production store; `in_memory` backs tests and local
//! development without a database.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PgStore;
