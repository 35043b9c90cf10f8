use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product not found with id: {id}")]
    ProductNotFound { id: i64 },

    #[error("Duplicate product id in seed data: {id}")]
    DuplicateProductId { id: i64 },

    #[error("Seed data error: {0}")]
    Seed(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<&CatalogError> for jsonrpsee::types::ErrorCode {
    fn from(err: &CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound { .. } => jsonrpsee::types::ErrorCode::InvalidParams,
            _ => jsonrpsee::types::ErrorCode::InternalError,
        }
    }
}

impl From<CatalogError> for jsonrpsee::types::ErrorObjectOwned {
    fn from(err: CatalogError) -> Self {
        let code = jsonrpsee::types::ErrorCode::from(&err);
        let message = match err {
            CatalogError::ProductNotFound { .. } => "Product not found",
            _ => code.message(),
        };
        jsonrpsee::types::ErrorObject::owned(code.code(), message, Some(err.to_string()))
    }
}
