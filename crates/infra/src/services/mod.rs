//! Application services: each one sequences repository calls around the pure
//! domain rules and reports failures as `AppError`.

pub mod create_customer;
pub mod create_order;
pub mod create_product;
pub mod find_order;

pub use create_customer::CreateCustomerService;
pub use create_order::{CreateOrderRequest, CreateOrderService};
pub use create_product::CreateProductService;
pub use find_order::{FindOrderService, ListCustomerOrdersService};
