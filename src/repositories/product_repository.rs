use crate::{
    errors::CatalogError,
    models::product_model::{NewProduct, Product, ProductPatch},
};
use std::collections::HashSet;
use tracing::{debug, info};

const SEED_PRODUCTS: &str = include_str!("../../data/products.json");

/// In-memory product collection plus the frozen seed it can be reset to.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    products: Vec<Product>,
    origin: Vec<Product>,
    // Highest id handed out since the last reset; deleted ids are not reissued.
    last_id: i64,
}

impl ProductRepository {
    /// Builds a repository whose origin snapshot is `seed`, in the given order.
    pub fn new(seed: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(seed.len());
        for product in &seed {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateProductId { id: product.id });
            }
        }

        info!("Product repository seeded with {} products", seed.len());

        Ok(Self {
            last_id: max_id(&seed),
            products: seed.clone(),
            origin: seed,
        })
    }

    /// Repository over the demo catalog compiled into the binary.
    pub fn seeded() -> Result<Self, CatalogError> {
        let seed: Vec<Product> = serde_json::from_str(SEED_PRODUCTS)?;
        Self::new(seed)
    }

    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    pub fn find_by_id(&self, id: i64) -> Option<&Product> {
        let found = self.products.iter().find(|product| product.id == id);
        debug!("Lookup of product {}: found = {}", id, found.is_some());
        found
    }

    pub fn append(&mut self, input: NewProduct) -> Product {
        let id = self.last_id.max(max_id(&self.products)) + 1;
        self.last_id = id;
        let product = Product::from_new(id, input);
        self.products.push(product.clone());

        info!("Created product with id: {}", id);
        product
    }

    pub fn replace(&mut self, id: i64, patch: ProductPatch) -> Result<Product, CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or(CatalogError::ProductNotFound { id })?;

        info!("Updated product with id: {}: {:?}", id, patch);
        product.apply(patch);

        Ok(product.clone())
    }

    /// Returns whether a product was removed; a missing id is not an error.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.products.len();
        self.products.retain(|product| product.id != id);
        let removed = self.products.len() != before;

        if removed {
            info!("Deleted product with id: {}", id);
        } else {
            debug!("Delete of product {} skipped: not present", id);
        }
        removed
    }

    pub fn reset_to_snapshot(&mut self) -> &[Product] {
        self.products = self.origin.clone();
        self.last_id = max_id(&self.origin);

        info!("Reset catalog to {} seed products", self.products.len());
        &self.products
    }
}

fn max_id(products: &[Product]) -> i64 {
    products.iter().map(|product| product.id).max().unwrap_or(0)
}
