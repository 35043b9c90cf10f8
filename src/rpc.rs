//! JSON-RPC surface of the catalog.
//!
//! Method names follow the query/mutation field names the catalog has always
//! been exposed under (`products`, `createProduct`, ...).

use crate::{
    errors::CatalogError,
    models::product_model::{NewProduct, ProductPatch, ProductWithHistory},
    services::product_service::ProductService,
};
use jsonrpsee::{
    core::{async_trait, RpcResult},
    proc_macros::rpc,
    server::{ServerBuilder, ServerHandle},
    types::ErrorObjectOwned,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info};

#[rpc(server, client)]
pub trait CatalogRpc {
    #[method(name = "products")]
    async fn products(&self, limit: Option<i64>) -> RpcResult<Vec<ProductWithHistory>>;

    #[method(name = "product")]
    async fn product(&self, id: i64) -> RpcResult<Option<ProductWithHistory>>;

    #[method(name = "createProduct")]
    async fn create_product(&self, input: NewProduct) -> RpcResult<ProductWithHistory>;

    #[method(name = "updateProduct")]
    async fn update_product(&self, id: i64, input: ProductPatch) -> RpcResult<ProductWithHistory>;

    #[method(name = "deleteProduct")]
    async fn delete_product(&self, id: i64) -> RpcResult<bool>;

    #[method(name = "resetProducts")]
    async fn reset_products(&self) -> RpcResult<Vec<ProductWithHistory>>;

    #[method(name = "health")]
    async fn health(&self) -> RpcResult<String>;
}

pub struct CatalogRpcImpl {
    service: Arc<RwLock<ProductService>>,
}

impl CatalogRpcImpl {
    pub fn new(service: ProductService) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
        }
    }
}

#[async_trait]
impl CatalogRpcServer for CatalogRpcImpl {
    async fn products(&self, limit: Option<i64>) -> RpcResult<Vec<ProductWithHistory>> {
        info!("Listing products (limit: {:?})", limit);

        let service = self.service.read().await;
        Ok(service.list_products(limit))
    }

    async fn product(&self, id: i64) -> RpcResult<Option<ProductWithHistory>> {
        info!("Getting product: {}", id);

        let service = self.service.read().await;
        Ok(service.get_product(id))
    }

    async fn create_product(&self, input: NewProduct) -> RpcResult<ProductWithHistory> {
        info!("Creating product: {:?}", input.title);

        let mut service = self.service.write().await;
        let created = service.create_product(input);
        info!("Product created successfully: {}", created.product.id);
        Ok(created)
    }

    async fn update_product(&self, id: i64, input: ProductPatch) -> RpcResult<ProductWithHistory> {
        info!("Updating product {}: {:?}", id, input);

        let mut service = self.service.write().await;
        service.update_product(id, input).map_err(|err| {
            error!("Failed to update product: {}", err);
            ErrorObjectOwned::from(err)
        })
    }

    async fn delete_product(&self, id: i64) -> RpcResult<bool> {
        info!("Deleting product: {}", id);

        let mut service = self.service.write().await;
        Ok(service.delete_product(id))
    }

    async fn reset_products(&self) -> RpcResult<Vec<ProductWithHistory>> {
        info!("Resetting products");

        let mut service = self.service.write().await;
        Ok(service.reset_products())
    }

    async fn health(&self) -> RpcResult<String> {
        Ok("OK".to_string())
    }
}

/// Binds the JSON-RPC server on `addr` and starts serving `service`.
pub async fn start(
    service: ProductService,
    addr: &str,
) -> Result<(SocketAddr, ServerHandle), CatalogError> {
    let server = ServerBuilder::default().build(addr).await?;
    let local_addr = server.local_addr()?;
    let handle = server.start(CatalogRpcImpl::new(service).into_rpc());

    info!("JSON-RPC server listening on {}", local_addr);
    Ok((local_addr, handle))
}
