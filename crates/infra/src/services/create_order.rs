//! Order placement service.
//!
//! ```text
//! CreateOrderRequest
//!   ↓
//! 1. Load customer (must exist)
//!   ↓
//! 2. Validate request (non-empty, positive quantities; repeats merged)
//!   ↓
//! 3. Load requested products from the catalog
//!   ↓
//! 4. Plan: every product found, enough stock, lines priced from the catalog
//!   ↓
//! 5. Persist order + lines
//!   ↓
//! 6. Write back decremented stock levels
//! ```
//!
//! Steps 2 and 4 are pure (`shopkeep_orders::placement`); this module only
//! sequences them with the repositories.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use shopkeep_core::{AppError, AppResult};
use shopkeep_customers::CustomerId;
use shopkeep_orders::{NewOrder, Order, RequestedProduct, plan_order, validate_request};
use shopkeep_products::ProductId;

use crate::repository::{CustomersRepository, OrdersRepository, ProductsRepository};

/// Input: place an order for a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub products: Vec<RequestedProduct>,
}

/// Creates orders after checking the customer, the catalog and stock levels.
#[derive(Debug, Clone)]
pub struct CreateOrderService<O, P, C> {
    orders: O,
    products: P,
    customers: C,
}

impl<O, P, C> CreateOrderService<O, P, C>
where
    O: OrdersRepository,
    P: ProductsRepository,
    C: CustomersRepository,
{
    pub fn new(orders: O, products: P, customers: C) -> Self {
        Self {
            orders,
            products,
            customers,
        }
    }

    #[instrument(
        skip(self, request),
        fields(customer_id = %request.customer_id, requested = request.products.len())
    )]
    pub async fn execute(&self, request: CreateOrderRequest) -> AppResult<Order> {
        self.place(request)
            .await
            .inspect_err(|err| warn!(reason = %err, "order rejected"))
    }

    async fn place(&self, request: CreateOrderRequest) -> AppResult<Order> {
        let customer = self
            .customers
            .find_by_id(request.customer_id)
            .await?
            .ok_or_else(|| AppError::new("Customer does not exist"))?;

        let requested = validate_request(&request.products)?;

        let ids: Vec<ProductId> = requested.iter().map(|p| p.id).collect();
        let found = self.products.find_all_by_id(&ids).await?;

        let plan = plan_order(&requested, &found)?;

        let order = self
            .orders
            .create(NewOrder {
                customer,
                products: plan.lines,
            })
            .await?;

        self.products.update_quantity(&plan.stock_updates).await?;

        info!(
            order_id = %order.id,
            line_count = order.order_products.len(),
            total = order.total(),
            "order created"
        );

        Ok(order)
    }
}
