use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkeep_core::{AppError, AppResult, Entity, Timestamps, entity_id};

entity_id!(
    /// Product identifier.
    ProductId
);

/// Persisted catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    /// Units available in stock.
    pub quantity: i64,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Product {
    /// Build a new record from validated input.
    pub fn new(id: ProductId, input: CreateProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            price: input.price,
            quantity: input.quantity,
            timestamps: Timestamps::new(now),
        }
    }

    /// Whether `requested` units can be taken from stock.
    pub fn has_stock_for(&self, requested: i64) -> bool {
        self.quantity >= requested
    }

    /// Overwrite the stock level.
    pub fn set_quantity(&mut self, quantity: i64, now: DateTime<Utc>) {
        self.quantity = quantity;
        self.timestamps.touch(now);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input: add a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub price: u64,
    pub quantity: i64,
}

impl CreateProduct {
    pub fn new(name: impl Into<String>, price: u64, quantity: i64) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
        }
    }

    /// Trim and check the input, returning the normalized form.
    pub fn validate(self) -> AppResult<Self> {
        let name = self.name.trim().to_string();

        if name.is_empty() {
            return Err(AppError::new("Product name is required"));
        }
        if self.quantity < 0 {
            return Err(AppError::new("Product quantity cannot be negative"));
        }

        Ok(Self {
            name,
            price: self.price,
            quantity: self.quantity,
        })
    }
}

/// New absolute stock level for one product (`update_quantity` input).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuantity {
    pub id: ProductId,
    pub quantity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: i64) -> Product {
        Product::new(
            ProductId::generate(),
            CreateProduct::new("Keyboard", 4_999, quantity),
            Utc::now(),
        )
    }

    #[test]
    fn validate_trims_name() {
        let input = CreateProduct::new("  Keyboard  ", 4_999, 3).validate().unwrap();
        assert_eq!(input.name, "Keyboard");
        assert_eq!(input.price, 4_999);
        assert_eq!(input.quantity, 3);
    }

    #[test]
    fn validate_rejects_blank_name() {
        let err = CreateProduct::new(" ", 100, 1).validate().unwrap_err();
        assert_eq!(err.message(), "Product name is required");
    }

    #[test]
    fn validate_rejects_negative_stock() {
        let err = CreateProduct::new("Mouse", 100, -1).validate().unwrap_err();
        assert_eq!(err.message(), "Product quantity cannot be negative");
    }

    #[test]
    fn zero_stock_and_free_products_are_allowed() {
        assert!(CreateProduct::new("Sticker", 0, 0).validate().is_ok());
    }

    #[test]
    fn has_stock_for_is_inclusive() {
        let p = product(5);
        assert!(p.has_stock_for(5));
        assert!(p.has_stock_for(1));
        assert!(!p.has_stock_for(6));
    }

    #[test]
    fn set_quantity_touches_updated_at() {
        let mut p = product(5);
        let created = p.timestamps.created_at;
        let later = created + chrono::Duration::seconds(1);
        p.set_quantity(2, later);
        assert_eq!(p.quantity, 2);
        assert_eq!(p.timestamps.created_at, created);
        assert_eq!(p.timestamps.updated_at, later);
    }
}
