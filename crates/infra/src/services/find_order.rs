use tracing::instrument;

use shopkeep_core::{AppError, AppResult};
use shopkeep_customers::CustomerId;
use shopkeep_orders::{Order, OrderId};

use crate::repository::{CustomersRepository, OrdersRepository};

/// Looks up a single order with its customer and lines.
#[derive(Debug, Clone)]
pub struct FindOrderService<O> {
    orders: O,
}

impl<O: OrdersRepository> FindOrderService<O> {
    pub fn new(orders: O) -> Self {
        Self { orders }
    }

    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn execute(&self, id: OrderId) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::new("Order not found"))
    }
}

/// Lists the orders a customer has placed, oldest first.
#[derive(Debug, Clone)]
pub struct ListCustomerOrdersService<O, C> {
    orders: O,
    customers: C,
}

impl<O, C> ListCustomerOrdersService<O, C>
where
    O: OrdersRepository,
    C: CustomersRepository,
{
    pub fn new(orders: O, customers: C) -> Self {
        Self { orders, customers }
    }

    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn execute(&self, customer_id: CustomerId) -> AppResult<Vec<Order>> {
        if self.customers.find_by_id(customer_id).await?.is_none() {
            return Err(AppError::new("Customer does not exist"));
        }

        Ok(self.orders.find_by_customer(customer_id).await?)
    }
}
