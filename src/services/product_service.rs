use crate::{
    errors::CatalogError,
    models::product_model::{NewProduct, Product, ProductPatch, ProductWithHistory},
    repositories::product_repository::ProductRepository,
    services::price_history::{generate_history, HISTORY_WINDOW_DAYS},
};
use tracing::{debug, info};

/// Catalog operations exposed to callers. Every product handed out carries a
/// freshly generated price history; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ProductService {
    repository: ProductRepository,
}

impl ProductService {
    pub fn new() -> Result<Self, CatalogError> {
        let repository = ProductRepository::seeded()?;
        info!("ProductService initialized");
        Ok(Self { repository })
    }

    pub fn with_repository(repository: ProductRepository) -> Self {
        Self { repository }
    }

    /// All products in store order, truncated to `limit` when it is positive.
    pub fn list_products(&self, limit: Option<i64>) -> Vec<ProductWithHistory> {
        let products = self.repository.all_products();
        let take = match limit {
            Some(limit) if limit > 0 => usize::try_from(limit).unwrap_or(usize::MAX),
            _ => products.len(),
        };

        debug!("Listing {} of {} products", take.min(products.len()), products.len());
        products.iter().take(take).cloned().map(with_history).collect()
    }

    pub fn get_product(&self, id: i64) -> Option<ProductWithHistory> {
        self.repository.find_by_id(id).cloned().map(with_history)
    }

    pub fn create_product(&mut self, input: NewProduct) -> ProductWithHistory {
        with_history(self.repository.append(input))
    }

    pub fn update_product(
        &mut self,
        id: i64,
        patch: ProductPatch,
    ) -> Result<ProductWithHistory, CatalogError> {
        self.repository.replace(id, patch).map(with_history)
    }

    pub fn delete_product(&mut self, id: i64) -> bool {
        self.repository.remove(id)
    }

    pub fn reset_products(&mut self) -> Vec<ProductWithHistory> {
        self.repository
            .reset_to_snapshot()
            .iter()
            .cloned()
            .map(with_history)
            .collect()
    }
}

fn with_history(product: Product) -> ProductWithHistory {
    let history = generate_history(product.price, HISTORY_WINDOW_DAYS);
    product.with_history(history)
}
