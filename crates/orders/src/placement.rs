//! Order placement rules.
//!
//! Given the products a customer asked for and the catalog rows found for
//! them, decide whether the order can be placed and, if so, which lines to
//! persist and which stock levels to write back.
//!
//! Checks run in a fixed order so the reported failure is deterministic:
//!
//! 1. the request is not empty,
//! 2. every requested quantity is positive,
//! 3. every requested product exists in the catalog,
//! 4. every product has enough stock for the quantity requested.
//!
//! Repeated product ids are merged into one line before the stock check, so a
//! product requested twice is checked (and decremented) against the total.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use shopkeep_core::{AppError, AppResult};
use shopkeep_products::{Product, ProductId, ProductQuantity};

use crate::order::OrderLine;

/// One entry of an order request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedProduct {
    pub id: ProductId,
    pub quantity: i64,
}

impl RequestedProduct {
    pub fn new(id: ProductId, quantity: i64) -> Self {
        Self { id, quantity }
    }
}

/// Outcome of a successful placement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPlan {
    /// Lines to persist, in request order.
    pub lines: Vec<OrderLine>,
    /// New absolute stock level per ordered product, same order as `lines`.
    pub stock_updates: Vec<ProductQuantity>,
}

/// Reject empty requests and non-positive quantities, then merge repeats.
///
/// Runs before the catalog is consulted.
pub fn validate_request(requested: &[RequestedProduct]) -> AppResult<Vec<RequestedProduct>> {
    if requested.is_empty() {
        return Err(AppError::new("An order must contain at least one product"));
    }

    if requested.iter().any(|p| p.quantity <= 0) {
        return Err(AppError::new("Product quantity must be greater than zero"));
    }

    Ok(consolidate(requested))
}

/// Merge entries that name the same product, summing their quantities.
///
/// The first occurrence of a product keeps its position.
pub fn consolidate(requested: &[RequestedProduct]) -> Vec<RequestedProduct> {
    let mut merged: Vec<RequestedProduct> = Vec::with_capacity(requested.len());
    let mut position: HashMap<ProductId, usize> = HashMap::with_capacity(requested.len());

    for entry in requested {
        match position.get(&entry.id) {
            Some(&idx) => {
                merged[idx].quantity = merged[idx].quantity.saturating_add(entry.quantity);
            }
            None => {
                position.insert(entry.id, merged.len());
                merged.push(*entry);
            }
        }
    }

    merged
}

/// Check a request against the catalog rows found for it.
///
/// `catalog` may contain rows that were not requested; they are ignored.
pub fn plan_order(requested: &[RequestedProduct], catalog: &[Product]) -> AppResult<OrderPlan> {
    let requested = validate_request(requested)?;

    let by_id: HashMap<ProductId, &Product> = catalog.iter().map(|p| (p.id, p)).collect();

    let mut matched: Vec<(&RequestedProduct, &Product)> = Vec::with_capacity(requested.len());
    for entry in &requested {
        match by_id.get(&entry.id) {
            Some(product) => matched.push((entry, product)),
            None => return Err(AppError::new("One or more products could not be found")),
        }
    }

    if matched
        .iter()
        .any(|(entry, product)| !product.has_stock_for(entry.quantity))
    {
        return Err(AppError::new("One or more products are out of stock"));
    }

    let lines = matched
        .iter()
        .map(|(entry, product)| OrderLine {
            product_id: product.id,
            price: product.price,
            quantity: entry.quantity,
        })
        .collect();

    let stock_updates = matched
        .iter()
        .map(|(entry, product)| ProductQuantity {
            id: product.id,
            quantity: product.quantity - entry.quantity,
        })
        .collect();

    Ok(OrderPlan {
        lines,
        stock_updates,
    })
}
