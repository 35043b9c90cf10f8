pub mod price_model;
pub mod product_model;

pub use price_model::PricePoint;
pub use product_model::{NewProduct, Product, ProductPatch, ProductWithHistory};
