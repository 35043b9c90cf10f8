use crate::errors::CatalogError;
use ::config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 8081;

pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "https://grafana-example-api.existentialmusic.com",
    "https://grafana-example-frontend.s3.us-east-1.amazonaws.com",
    "https://studio.apollographql.com",
];

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Public bind address of the HTTP front end.
    pub host: String,
    pub port: u16,
    /// Internal JSON-RPC listener the front end proxies to.
    pub rpc_addr: String,
    pub rpc_path: String,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Defaults, then `CATALOG_*` variables, then the bare `PORT` variable.
    pub fn load() -> Result<Self, CatalogError> {
        Self::from_sources(
            Environment::with_prefix("CATALOG").try_parsing(true),
            std::env::var("PORT").ok(),
        )
    }

    fn from_sources(environment: Environment, port: Option<String>) -> Result<Self, CatalogError> {
        let port = port.filter(|port| !port.is_empty());
        let config = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("rpc_addr", "127.0.0.1:0")?
            .set_default("rpc_path", "/graphql")?
            .set_default("allowed_origins", DEFAULT_ALLOWED_ORIGINS.to_vec())?
            .add_source(environment)
            .set_override_option("port", port)?
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn public_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
