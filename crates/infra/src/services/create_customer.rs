use tracing::{info, instrument};

use shopkeep_core::{AppError, AppResult};
use shopkeep_customers::{CreateCustomer, Customer};

use crate::repository::CustomersRepository;

/// Registers customers; an email address belongs to at most one customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerService<C> {
    customers: C,
}

impl<C: CustomersRepository> CreateCustomerService<C> {
    pub fn new(customers: C) -> Self {
        Self { customers }
    }

    #[instrument(skip(self, input))]
    pub async fn execute(&self, input: CreateCustomer) -> AppResult<Customer> {
        let input = input.validate()?;

        if self.customers.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::new("This email is already in use"));
        }

        let customer = self.customers.create(input).await?;
        info!(customer_id = %customer.id, "customer created");
        Ok(customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCustomersRepository;

    #[tokio::test]
    async fn creates_customer_with_normalized_fields() {
        let service = CreateCustomerService::new(InMemoryCustomersRepository::new());
        let customer = service
            .execute(CreateCustomer::new(" Ada ", " ada@example.com "))
            .await
            .unwrap();
        assert_eq!(customer.name, "Ada");
        assert_eq!(customer.email, "ada@example.com");
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let service = CreateCustomerService::new(InMemoryCustomersRepository::new());
        service
            .execute(CreateCustomer::new("Ada", "ada@example.com"))
            .await
            .unwrap();

        let err = service
            .execute(CreateCustomer::new("Another Ada", "  ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "This email is already in use");
    }

    #[tokio::test]
    async fn rejects_invalid_input_before_touching_storage() {
        let service = CreateCustomerService::new(InMemoryCustomersRepository::new());
        let err = service
            .execute(CreateCustomer::new("", "ada@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Customer name is required");
    }
}
