//! Customers domain module.
//!
//! This crate contains the customer record and the rules for registering one,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod customer;

pub use customer::{CreateCustomer, Customer, CustomerId};
