//! Postgres-backed repositories.
//!
//! The tables are expected to exist already (creating them is a migration
//! concern). Layout:
//!
//! ```sql
//! CREATE TABLE customers (
//!     id          UUID PRIMARY KEY,
//!     name        TEXT NOT NULL,
//!     email       TEXT NOT NULL UNIQUE,
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE products (
//!     id          UUID PRIMARY KEY,
//!     name        TEXT NOT NULL UNIQUE,
//!     price       BIGINT NOT NULL CHECK (price >= 0),
//!     quantity    BIGINT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE orders (
//!     id          UUID PRIMARY KEY,
//!     customer_id UUID NOT NULL REFERENCES customers (id),
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL
//! );
//!
//! CREATE TABLE orders_products (
//!     id          UUID PRIMARY KEY,
//!     order_id    UUID NOT NULL REFERENCES orders (id),
//!     product_id  UUID NOT NULL REFERENCES products (id),
//!     price       BIGINT NOT NULL CHECK (price >= 0),
//!     quantity    BIGINT NOT NULL,
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL
//! );
//! ```
//!
//! Prices are `u64` in the domain and `BIGINT` in the database; values above
//! `i64::MAX` are rejected on write and reported as decode errors on read.
//!
//! ## Thread Safety
//!
//! Every repository holds an `Arc<PgPool>`; the pool handles connection sharing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{Span, instrument};
use uuid::Uuid;

use shopkeep_core::Timestamps;
use shopkeep_customers::{CreateCustomer, Customer, CustomerId};
use shopkeep_orders::{NewOrder, Order, OrderId, OrderProduct, OrderProductId};
use shopkeep_products::{CreateProduct, Product, ProductId, ProductQuantity};

use super::r#trait::{CustomersRepository, OrdersRepository, ProductsRepository, RepositoryError};

/// Postgres-backed customer repository.
#[derive(Debug, Clone)]
pub struct PostgresCustomersRepository {
    pool: Arc<PgPool>,
}

impl PostgresCustomersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl CustomersRepository for PostgresCustomersRepository {
    #[instrument(skip(self), fields(customer_id = %id), err)]
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_id", e))?;

        row.as_ref().map(customer_from_row).transpose()
    }

    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, created_at, updated_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_customer_by_email", e))?;

        row.as_ref().map(customer_from_row).transpose()
    }

    #[instrument(skip(self, data), fields(customer_id = tracing::field::Empty), err)]
    async fn create(&self, data: CreateCustomer) -> Result<Customer, RepositoryError> {
        let customer = Customer::new(CustomerId::generate(), data, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(customer.timestamps.created_at)
        .bind(customer.timestamps.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_customer", e))?;

        Span::current().record("customer_id", tracing::field::display(customer.id));
        Ok(customer)
    }
}

/// Postgres-backed product catalog.
#[derive(Debug, Clone)]
pub struct PostgresProductsRepository {
    pool: Arc<PgPool>,
}

impl PostgresProductsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl ProductsRepository for PostgresProductsRepository {
    #[instrument(skip(self, ids), fields(requested = ids.len(), found = tracing::field::Empty), err)]
    async fn find_all_by_id(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE id = ANY($1)
            "#,
        )
        .bind(&uuids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_products_by_id", e))?;

        let mut by_id: HashMap<ProductId, Product> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let product = product_from_row(row)?;
            by_id.insert(product.id, product);
        }

        // Keep the caller's order (first appearance wins), like the in-memory store.
        let mut found = Vec::with_capacity(by_id.len());
        for id in ids {
            if let Some(product) = by_id.remove(id) {
                found.push(product);
            }
        }

        Span::current().record("found", found.len());
        Ok(found)
    }

    #[instrument(skip(self), err)]
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, price, quantity, created_at, updated_at
            FROM products
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_product_by_name", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip(self, data), fields(name = %data.name), err)]
    async fn create(&self, data: CreateProduct) -> Result<Product, RepositoryError> {
        let product = Product::new(ProductId::generate(), data, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(price_to_db(product.price)?)
        .bind(product.quantity)
        .bind(product.timestamps.created_at)
        .bind(product.timestamps.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(product)
    }

    #[instrument(skip(self, updates), fields(update_count = updates.len()), err)]
    async fn update_quantity(
        &self,
        updates: &[ProductQuantity],
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let mut updated = Vec::with_capacity(updates.len());
        for update in updates {
            let row = sqlx::query(
                r#"
                UPDATE products
                SET quantity = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING id, name, price, quantity, created_at, updated_at
                "#,
            )
            .bind(update.id.as_uuid())
            .bind(update.quantity)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_product_quantity", e))?;

            if let Some(row) = row {
                updated.push(product_from_row(&row)?);
            }
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(updated)
    }
}

/// Postgres-backed order repository.
#[derive(Debug, Clone)]
pub struct PostgresOrdersRepository {
    pool: Arc<PgPool>,
}

impl PostgresOrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    async fn load_lines(
        &self,
        order_ids: &[OrderId],
    ) -> Result<HashMap<OrderId, Vec<OrderProduct>>, RepositoryError> {
        let uuids: Vec<Uuid> = order_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, price, quantity, created_at, updated_at
            FROM orders_products
            WHERE order_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(&uuids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_order_products", e))?;

        let mut lines: HashMap<OrderId, Vec<OrderProduct>> = HashMap::new();
        for row in &rows {
            let line = order_product_from_row(row)?;
            lines.entry(line.order_id).or_default().push(line);
        }
        Ok(lines)
    }
}

#[async_trait]
impl OrdersRepository for PostgresOrdersRepository {
    #[instrument(
        skip(self, data),
        fields(customer_id = %data.customer.id, line_count = data.products.len()),
        err
    )]
    async fn create(&self, data: NewOrder) -> Result<Order, RepositoryError> {
        let order = Order::from_new(OrderId::generate(), data, Utc::now());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, customer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.customer.id.as_uuid())
        .bind(order.timestamps.created_at)
        .bind(order.timestamps.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("insert_order", e))?;

        for line in &order.order_products {
            sqlx::query(
                r#"
                INSERT INTO orders_products (
                    id,
                    order_id,
                    product_id,
                    price,
                    quantity,
                    created_at,
                    updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(line.id.as_uuid())
            .bind(line.order_id.as_uuid())
            .bind(line.product_id.as_uuid())
            .bind(price_to_db(line.price)?)
            .bind(line.quantity)
            .bind(line.timestamps.created_at)
            .bind(line.timestamps.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_order_product", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Ok(order)
    }

    #[instrument(skip(self), fields(order_id = %id), err)]
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(ORDER_WITH_CUSTOMER_BY_ID)
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_order_by_id", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut order = order_from_row(&row)?;
        let mut lines = self.load_lines(&[order.id]).await?;
        order.order_products = lines.remove(&order.id).unwrap_or_default();
        Ok(Some(order))
    }

    #[instrument(
        skip(self),
        fields(customer_id = %customer_id, order_count = tracing::field::Empty),
        err
    )]
    async fn find_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(ORDERS_WITH_CUSTOMER_BY_CUSTOMER)
            .bind(customer_id.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_orders_by_customer", e))?;

        let mut orders = rows
            .iter()
            .map(order_from_row)
            .collect::<Result<Vec<_>, _>>()?;
        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        let mut lines = self.load_lines(&ids).await?;
        for order in &mut orders {
            order.order_products = lines.remove(&order.id).unwrap_or_default();
        }

        Span::current().record("order_count", orders.len());
        Ok(orders)
    }
}

const ORDER_WITH_CUSTOMER_BY_ID: &str = r#"
    SELECT
        o.id,
        o.created_at,
        o.updated_at,
        c.id AS customer_id,
        c.name AS customer_name,
        c.email AS customer_email,
        c.created_at AS customer_created_at,
        c.updated_at AS customer_updated_at
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
    WHERE o.id = $1
"#;

const ORDERS_WITH_CUSTOMER_BY_CUSTOMER: &str = r#"
    SELECT
        o.id,
        o.created_at,
        o.updated_at,
        c.id AS customer_id,
        c.name AS customer_name,
        c.email AS customer_email,
        c.created_at AS customer_created_at,
        c.updated_at AS customer_updated_at
    FROM orders o
    JOIN customers c ON c.id = o.customer_id
    WHERE o.customer_id = $1
    ORDER BY o.created_at ASC, o.id ASC
"#;

// Row decoding

fn customer_from_row(row: &PgRow) -> Result<Customer, RepositoryError> {
    Ok(Customer {
        id: CustomerId::from(get::<Uuid>(row, "id")?),
        name: get(row, "name")?,
        email: get(row, "email")?,
        timestamps: timestamps(row, "created_at", "updated_at")?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: ProductId::from(get::<Uuid>(row, "id")?),
        name: get(row, "name")?,
        price: price_from_db(get(row, "price")?)?,
        quantity: get(row, "quantity")?,
        timestamps: timestamps(row, "created_at", "updated_at")?,
    })
}

fn order_product_from_row(row: &PgRow) -> Result<OrderProduct, RepositoryError> {
    Ok(OrderProduct {
        id: OrderProductId::from(get::<Uuid>(row, "id")?),
        order_id: OrderId::from(get::<Uuid>(row, "order_id")?),
        product_id: ProductId::from(get::<Uuid>(row, "product_id")?),
        price: price_from_db(get(row, "price")?)?,
        quantity: get(row, "quantity")?,
        timestamps: timestamps(row, "created_at", "updated_at")?,
    })
}

/// Order header + joined customer; lines are attached separately.
fn order_from_row(row: &PgRow) -> Result<Order, RepositoryError> {
    let customer = Customer {
        id: CustomerId::from(get::<Uuid>(row, "customer_id")?),
        name: get(row, "customer_name")?,
        email: get(row, "customer_email")?,
        timestamps: timestamps(row, "customer_created_at", "customer_updated_at")?,
    };

    Ok(Order {
        id: OrderId::from(get::<Uuid>(row, "id")?),
        customer,
        order_products: Vec::new(),
        timestamps: timestamps(row, "created_at", "updated_at")?,
    })
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| RepositoryError::Decode(format!("column {column}: {e}")))
}

fn timestamps(row: &PgRow, created: &str, updated: &str) -> Result<Timestamps, RepositoryError> {
    Ok(Timestamps {
        created_at: get::<DateTime<Utc>>(row, created)?,
        updated_at: get::<DateTime<Utc>>(row, updated)?,
    })
}

fn price_to_db(price: u64) -> Result<i64, RepositoryError> {
    i64::try_from(price)
        .map_err(|_| RepositoryError::Backend(format!("price {price} exceeds BIGINT range")))
}

fn price_from_db(price: i64) -> Result<u64, RepositoryError> {
    u64::try_from(price).map_err(|_| RepositoryError::Decode(format!("negative price {price}")))
}

/// Map SQLx errors to repository errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let detail = match db_err.code().as_deref() {
                Some("23505") => "unique constraint violated",
                Some("23503") => "foreign key violated",
                Some("23514") => "check constraint violated",
                _ => "database error",
            };
            RepositoryError::Backend(format!(
                "{detail} in {operation}: {}",
                db_err.message()
            ))
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Backend(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            RepositoryError::Decode(format!("column {index} in {operation}: {source}"))
        }
        other => RepositoryError::Backend(format!("{operation}: {other}")),
    }
}
