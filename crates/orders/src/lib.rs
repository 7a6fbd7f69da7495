//! Orders domain module.
//!
//! This crate contains the order and order-line records plus the placement
//! rules (quantity, availability and stock checks) used when a customer places
//! an order, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod order;
pub mod placement;

pub use order::{NewOrder, Order, OrderId, OrderLine, OrderProduct, OrderProductId};
pub use placement::{OrderPlan, RequestedProduct, consolidate, plan_order, validate_request};
