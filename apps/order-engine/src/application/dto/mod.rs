//! Data Transfer Objects (DTOs)
//!
//! Request bodies as they cross the API boundary, plus their conversion into
//! domain commands.

mod orders;

pub use orders::{AddCartItemDto, PlaceOrderDto, RequestedLineDto, UpdateStatusDto};
