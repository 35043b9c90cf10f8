pub mod price_history;
pub mod product_service;

pub use product_service::ProductService;
