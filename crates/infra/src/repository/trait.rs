use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use shopkeep_core::AppError;
use shopkeep_customers::{CreateCustomer, Customer, CustomerId};
use shopkeep_orders::{NewOrder, Order, OrderId};
use shopkeep_products::{CreateProduct, Product, ProductId, ProductQuantity};

/// Repository operation error.
///
/// These are **infrastructure errors** (storage, decoding) as opposed to
/// business failures, which are always an [`AppError`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("failed to decode stored row: {0}")]
    Decode(String),

    #[error("repository lock poisoned")]
    Poisoned,
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        AppError::internal(value.to_string())
    }
}

/// Customer persistence.
#[async_trait]
pub trait CustomersRepository: Send + Sync {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError>;

    /// Persist a customer from already-validated input.
    async fn create(&self, data: CreateCustomer) -> Result<Customer, RepositoryError>;
}

/// Product catalog persistence.
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Fetch every product whose id is in `ids`.
    ///
    /// Unknown ids are skipped, so the result may be shorter than the input.
    /// Each product appears at most once regardless of repeats in `ids`.
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError>;

    /// Persist a product from already-validated input.
    async fn create(&self, data: CreateProduct) -> Result<Product, RepositoryError>;

    /// Overwrite stock levels; returns the updated rows.
    ///
    /// Ids that do not exist are skipped.
    async fn update_quantity(
        &self,
        updates: &[ProductQuantity],
    ) -> Result<Vec<Product>, RepositoryError>;
}

/// Order persistence (orders + their line items).
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Persist an order together with all of its lines.
    async fn create(&self, data: NewOrder) -> Result<Order, RepositoryError>;

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// Orders placed by a customer, oldest first.
    async fn find_by_customer(&self, customer_id: CustomerId)
    -> Result<Vec<Order>, RepositoryError>;
}

#[async_trait]
impl<S> CustomersRepository for Arc<S>
where
    S: CustomersRepository + ?Sized,
{
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        (**self).find_by_email(email).await
    }

    async fn create(&self, data: CreateCustomer) -> Result<Customer, RepositoryError> {
        (**self).create(data).await
    }
}

#[async_trait]
impl<S> ProductsRepository for Arc<S>
where
    S: ProductsRepository + ?Sized,
{
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        (**self).find_all_by_id(ids).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        (**self).find_by_name(name).await
    }

    async fn create(&self, data: CreateProduct) -> Result<Product, RepositoryError> {
        (**self).create(data).await
    }

    async fn update_quantity(
        &self,
        updates: &[ProductQuantity],
    ) -> Result<Vec<Product>, RepositoryError> {
        (**self).update_quantity(updates).await
    }
}

#[async_trait]
impl<S> OrdersRepository for Arc<S>
where
    S: OrdersRepository + ?Sized,
{
    async fn create(&self, data: NewOrder) -> Result<Order, RepositoryError> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        (**self).find_by_customer(customer_id).await
    }
}
