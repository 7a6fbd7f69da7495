use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkeep_core::{AppError, AppResult, Entity, Timestamps, entity_id};

entity_id!(
    /// Customer identifier.
    CustomerId
);

/// Persisted customer record.
///
/// A customer owns zero or more orders; the relation is navigated from the
/// orders side (`OrdersRepository::find_by_customer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

impl Customer {
    /// Build a new record from validated input.
    pub fn new(id: CustomerId, input: CreateCustomer, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            timestamps: Timestamps::new(now),
        }
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Input: register a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
}

impl CreateCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Trim and check the input, returning the normalized form.
    pub fn validate(self) -> AppResult<Self> {
        let name = self.name.trim().to_string();
        let email = self.email.trim().to_string();

        if name.is_empty() {
            return Err(AppError::new("Customer name is required"));
        }
        if email.is_empty() {
            return Err(AppError::new("Customer email is required"));
        }
        if !email.contains('@') {
            return Err(AppError::new("Customer email is not a valid address"));
        }

        Ok(Self { name, email })
    }
}
