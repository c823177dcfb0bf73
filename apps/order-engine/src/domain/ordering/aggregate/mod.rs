//! Order aggregate: the order entity, its line items, and the draft builder.

mod order;
mod order_line;

pub use order::{NewOrder, Order, OrderDraft};
pub use order_line::{OrderItem, OrderLineDraft, RequestedLine};
