use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use shopkeep_customers::{CreateCustomer, Customer, CustomerId};
use shopkeep_orders::{NewOrder, Order, OrderId};
use shopkeep_products::{CreateProduct, Product, ProductId, ProductQuantity};

use super::r#trait::{CustomersRepository, OrdersRepository, ProductsRepository, RepositoryError};

/// In-memory customer repository for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCustomersRepository {
    inner: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomersRepository for InMemoryCustomersRepository {
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.values().find(|c| c.email == email).cloned())
    }

    async fn create(&self, data: CreateCustomer) -> Result<Customer, RepositoryError> {
        let customer = Customer::new(CustomerId::generate(), data, Utc::now());
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        map.insert(customer.id, customer.clone());
        Ok(customer)
    }
}

/// In-memory product catalog for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryProductsRepository {
    inner: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductsRepository for InMemoryProductsRepository {
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;

        let mut found: Vec<Product> = Vec::with_capacity(ids.len());
        for id in ids {
            if found.iter().any(|p| p.id == *id) {
                continue;
            }
            if let Some(product) = map.get(id) {
                found.push(product.clone());
            }
        }
        Ok(found)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.values().find(|p| p.name == name).cloned())
    }

    async fn create(&self, data: CreateProduct) -> Result<Product, RepositoryError> {
        let product = Product::new(ProductId::generate(), data, Utc::now());
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        map.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_quantity(
        &self,
        updates: &[ProductQuantity],
    ) -> Result<Vec<Product>, RepositoryError> {
        let now = Utc::now();
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;

        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            if let Some(product) = map.get_mut(&update.id) {
                product.set_quantity(update.quantity, now);
                updated.push(product.clone());
            }
        }
        Ok(updated)
    }
}

/// In-memory order repository for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOrdersRepository {
    inner: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrdersRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrdersRepository for InMemoryOrdersRepository {
    async fn create(&self, data: NewOrder) -> Result<Order, RepositoryError> {
        let order = Order::from_new(OrderId::generate(), data, Utc::now());
        let mut map = self.inner.write().map_err(|_| RepositoryError::Poisoned)?;
        map.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let map = self.inner.read().map_err(|_| RepositoryError::Poisoned)?;

        let mut orders: Vec<Order> = map
            .values()
            .filter(|o| o.customer_id() == customer_id)
            .cloned()
            .collect();
        // Ids are UUIDv7, so they break creation-time ties in insertion order.
        orders.sort_by(|a, b| {
            a.timestamps
                .created_at
                .cmp(&b.timestamps.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_orders::OrderLine;

    #[tokio::test]
    async fn customers_are_found_by_id_and_email() {
        let repo = InMemoryCustomersRepository::new();
        let created = repo
            .create(CreateCustomer::new("Ada", "ada@example.com"))
            .await
            .unwrap();

        let by_id = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(by_id.as_ref(), Some(&created));

        let by_email = repo.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(by_email, Some(created));

        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());
        assert!(repo.find_by_id(CustomerId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_all_by_id_skips_unknown_and_repeated_ids() {
        let repo = InMemoryProductsRepository::new();
        let a = repo.create(CreateProduct::new("A", 100, 1)).await.unwrap();
        let b = repo.create(CreateProduct::new("B", 200, 2)).await.unwrap();

        let found = repo
            .find_all_by_id(&[b.id, ProductId::generate(), a.id, b.id])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id, b.id);
        assert_eq!(found[1].id, a.id);
    }

    #[tokio::test]
    async fn update_quantity_overwrites_stock_and_skips_unknown_ids() {
        let repo = InMemoryProductsRepository::new();
        let a = repo.create(CreateProduct::new("A", 100, 10)).await.unwrap();

        let updated = repo
            .update_quantity(&[
                ProductQuantity { id: a.id, quantity: 4 },
                ProductQuantity {
                    id: ProductId::generate(),
                    quantity: 1,
                },
            ])
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].quantity, 4);
        let stored = repo.find_all_by_id(&[a.id]).await.unwrap();
        assert_eq!(stored[0].quantity, 4);
        assert!(stored[0].timestamps.updated_at >= stored[0].timestamps.created_at);
    }

    #[tokio::test]
    async fn orders_are_listed_per_customer_oldest_first() {
        let customers = InMemoryCustomersRepository::new();
        let orders = InMemoryOrdersRepository::new();
        let ada = customers
            .create(CreateCustomer::new("Ada", "ada@example.com"))
            .await
            .unwrap();
        let bob = customers
            .create(CreateCustomer::new("Bob", "bob@example.com"))
            .await
            .unwrap();

        let line = OrderLine {
            product_id: ProductId::generate(),
            price: 100,
            quantity: 1,
        };
        let first = orders
            .create(NewOrder {
                customer: ada.clone(),
                products: vec![line],
            })
            .await
            .unwrap();
        orders
            .create(NewOrder {
                customer: bob.clone(),
                products: vec![line],
            })
            .await
            .unwrap();
        let second = orders
            .create(NewOrder {
                customer: ada.clone(),
                products: vec![line],
            })
            .await
            .unwrap();

        let listed = orders.find_by_customer(ada.id).await.unwrap();
        let ids: Vec<OrderId> = listed.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        let fetched = orders.find_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(fetched, first);
    }
}
