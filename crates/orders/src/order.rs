use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkeep_core::{Entity, Timestamps, entity_id};
use shopkeep_customers::{Customer, CustomerId};
use shopkeep_products::ProductId;

entity_id!(
    /// Order identifier.
    OrderId
);

entity_id!(
    /// Order line (order/product join row) identifier.
    OrderProductId
);

/// Line to persist: product, catalog price at purchase time, quantity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub quantity: i64,
}

/// Input for `OrdersRepository::create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: Customer,
    pub products: Vec<OrderLine>,
}

/// Persisted order line (join between an order and a product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderProduct {
    pub id: OrderProductId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Price captured from the catalog when the order was placed.
    pub price: u64,
    pub quantity: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl OrderProduct {
    pub fn subtotal(&self) -> u64 {
        self.price.saturating_mul(self.quantity.max(0) as u64)
    }
}

impl Entity for OrderProduct {
    type Id = OrderProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Persisted order, loaded with its customer and line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub order_products: Vec<OrderProduct>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Order {
    /// Materialize a new order, assigning fresh line ids.
    pub fn from_new(id: OrderId, new_order: NewOrder, now: DateTime<Utc>) -> Self {
        let order_products = new_order
            .products
            .into_iter()
            .map(|line| OrderProduct {
                id: OrderProductId::generate(),
                order_id: id,
                product_id: line.product_id,
                price: line.price,
                quantity: line.quantity,
                timestamps: Timestamps::new(now),
            })
            .collect();

        Self {
            id,
            customer: new_order.customer,
            order_products,
            timestamps: Timestamps::new(now),
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer.id
    }

    /// Sum of line subtotals.
    pub fn total(&self) -> u64 {
        self.order_products
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.subtotal()))
    }

    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.order_products
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| line.quantity)
            .sum()
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep_customers::CreateCustomer;

    fn test_customer() -> Customer {
        Customer::new(
            CustomerId::generate(),
            CreateCustomer::new("Grace Hopper", "grace@example.com"),
            Utc::now(),
        )
    }

    fn line(price: u64, quantity: i64) -> OrderLine {
        OrderLine {
            product_id: ProductId::generate(),
            price,
            quantity,
        }
    }

    #[test]
    fn from_new_links_every_line_to_the_order() {
        let order_id = OrderId::generate();
        let customer = test_customer();
        let now = Utc::now();
        let order = Order::from_new(
            order_id,
            NewOrder {
                customer: customer.clone(),
                products: vec![line(250, 2), line(1_000, 1)],
            },
            now,
        );

        assert_eq!(order.customer_id(), customer.id);
        assert_eq!(order.order_products.len(), 2);
        assert!(order.order_products.iter().all(|l| l.order_id == order_id));
        assert_ne!(order.order_products[0].id, order.order_products[1].id);
        assert_eq!(order.timestamps.created_at, now);
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let order = Order::from_new(
            OrderId::generate(),
            NewOrder {
                customer: test_customer(),
                products: vec![line(250, 2), line(1_000, 1)],
            },
            Utc::now(),
        );
        assert_eq!(order.total(), 1_500);
    }

    #[test]
    fn quantity_of_unknown_product_is_zero() {
        let order = Order::from_new(
            OrderId::generate(),
            NewOrder {
                customer: test_customer(),
                products: vec![line(250, 2)],
            },
            Utc::now(),
        );
        assert_eq!(order.quantity_of(ProductId::generate()), 0);
    }

    #[test]
    fn serializes_with_flattened_timestamps() {
        let order = Order::from_new(
            OrderId::generate(),
            NewOrder {
                customer: test_customer(),
                products: vec![line(250, 2)],
            },
            Utc::now(),
        );
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("created_at").is_some());
        assert!(json.get("updated_at").is_some());
        assert_eq!(json["order_products"][0]["price"], 250);
        assert_eq!(json["customer"]["email"], "grace@example.com");
    }
}
