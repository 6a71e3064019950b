//! Configuration types for the SikaSMS server.
//!
//! Each config struct carries a `Default` suitable for local development
//! and a `from_env()` constructor used by the API binary at startup.

mod billing;
mod database;
mod gateway;
mod server;

pub use billing::{BillingConfig, BillingPolicy};
pub use database::DatabaseConfig;
pub use gateway::GatewayConfig;
pub use server::ServerConfig;

use thiserror::Error;

/// Errors raised while loading configuration from the environment
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
}
