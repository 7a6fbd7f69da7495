//! Repository boundary: async CRUD contracts for customers, products and orders.
//!
//! Two backends implement every contract: in-memory maps (tests/dev) and
//! Postgres via SQLx.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::{InMemoryCustomersRepository, InMemoryOrdersRepository, InMemoryProductsRepository};
pub use postgres::{PostgresCustomersRepository, PostgresOrdersRepository, PostgresProductsRepository};
pub use r#trait::{CustomersRepository, OrdersRepository, ProductsRepository, RepositoryError};
