use catalog_rpc::{
    config::AppConfig,
    gateway::{self, GatewayState},
    rpc,
    services::product_service::ProductService,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Catalog Service...");

    let config = AppConfig::load()?;
    let service = ProductService::new()?;

    let (rpc_addr, rpc_handle) = rpc::start(service, &config.rpc_addr).await?;

    let listener = gateway::bind(&config.public_addr(), &config.rpc_path).await?;
    let state = Arc::new(GatewayState::new(
        config.allowed_origins.clone(),
        config.rpc_path.clone(),
        rpc_addr,
    ));

    info!("Proxying {} to JSON-RPC server at {}", config.rpc_path, rpc_addr);
    info!("Available methods:");
    info!("  - products(limit?: i64)");
    info!("  - product(id: i64)");
    info!("  - createProduct(input: NewProduct)");
    info!("  - updateProduct(id: i64, input: ProductPatch)");
    info!("  - deleteProduct(id: i64)");
    info!("  - resetProducts()");
    info!("  - health()");

    tokio::select! {
        result = gateway::serve(listener, state) => {
            if let Err(err) = &result {
                error!("Gateway stopped: {}", err);
            }
            result?;
        }
        _ = rpc_handle.clone().stopped() => {
            error!("JSON-RPC server stopped unexpectedly");
        }
    }

    Ok(())
}
