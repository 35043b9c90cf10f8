use serde::{Deserialize, Serialize};

use super::price_model::PricePoint;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i64,
    pub brand: String,
    pub category: String,
    pub thumbnail: String,
    pub images: Vec<String>,
}

/// Fields accepted by `createProduct`; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub discount_percentage: f64,
    pub rating: f64,
    pub stock: i64,
    pub brand: String,
    pub category: String,
    pub thumbnail: String,
    pub images: Vec<String>,
}

/// Partial update: an absent field leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

/// A product as returned to callers, with its simulated price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithHistory {
    #[serde(flatten)]
    pub product: Product,
    pub historical_prices: Vec<PricePoint>,
}

impl Product {
    pub fn from_new(id: i64, input: NewProduct) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            price: input.price,
            discount_percentage: input.discount_percentage,
            rating: input.rating,
            stock: input.stock,
            brand: input.brand,
            category: input.category,
            thumbnail: input.thumbnail,
            images: input.images,
        }
    }

    /// Merges every present field of `patch` onto this record.
    pub fn apply(&mut self, patch: ProductPatch) {
        let ProductPatch {
            title,
            description,
            price,
            discount_percentage,
            rating,
            stock,
            brand,
            category,
            thumbnail,
            images,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(discount_percentage) = discount_percentage {
            self.discount_percentage = discount_percentage;
        }
        if let Some(rating) = rating {
            self.rating = rating;
        }
        if let Some(stock) = stock {
            self.stock = stock;
        }
        if let Some(brand) = brand {
            self.brand = brand;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(thumbnail) = thumbnail {
            self.thumbnail = thumbnail;
        }
        if let Some(images) = images {
            self.images = images;
        }
    }

    pub fn with_history(self, historical_prices: Vec<PricePoint>) -> ProductWithHistory {
        ProductWithHistory {
            product: self,
            historical_prices,
        }
    }
}
