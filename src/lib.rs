//! Mock e-commerce product catalog served over JSON-RPC.
//!
//! The catalog lives in memory, is seeded from an embedded JSON document and
//! can be reset to that seed at any time. Every product returned to a caller
//! carries a freshly simulated 30-day price history.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod repositories;
pub mod rpc;
pub mod services;
