use tracing::{info, instrument};

use shopkeep_core::{AppError, AppResult};
use shopkeep_products::{CreateProduct, Product};

use crate::repository::ProductsRepository;

/// Adds products to the catalog; product names are unique.
#[derive(Debug, Clone)]
pub struct CreateProductService<P> {
    products: P,
}

impl<P: ProductsRepository> CreateProductService<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn execute(&self, input: CreateProduct) -> AppResult<Product> {
        let input = input.validate()?;

        if self.products.find_by_name(&input.name).await?.is_some() {
            return Err(AppError::new("A product with this name already exists"));
        }

        let product = self.products.create(input).await?;
        info!(product_id = %product.id, stock = product.quantity, "product created");
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryProductsRepository;

    #[tokio::test]
    async fn creates_product() {
        let service = CreateProductService::new(InMemoryProductsRepository::new());
        let product = service
            .execute(CreateProduct::new("Keyboard", 4_999, 10))
            .await
            .unwrap();
        assert_eq!(product.name, "Keyboard");
        assert_eq!(product.price, 4_999);
        assert_eq!(product.quantity, 10);
    }

    #[tokio::test]
    async fn rejects_duplicate_name() {
        let service = CreateProductService::new(InMemoryProductsRepository::new());
        service
            .execute(CreateProduct::new("Keyboard", 4_999, 10))
            .await
            .unwrap();

        let err = service
            .execute(CreateProduct::new(" Keyboard ", 100, 1))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "A product with this name already exists");
    }

    #[tokio::test]
    async fn rejects_negative_stock() {
        let service = CreateProductService::new(InMemoryProductsRepository::new());
        let err = service
            .execute(CreateProduct::new("Keyboard", 4_999, -1))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Product quantity cannot be negative");
    }
}
