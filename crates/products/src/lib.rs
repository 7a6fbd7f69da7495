//! Product catalog domain module.
//!
//! This crate contains the product record, the rules for adding one to the
//! catalog, and the stock-level records the order flow writes back. Pure domain
//! logic only (no IO, no HTTP, no storage).

pub mod product;

pub use product::{CreateProduct, Product, ProductId, ProductQuantity};
