//! # SikaSMS Infrastructure
//!
//! Concrete implementations of the core's persistence and gateway
//! interfaces: SQLx/MySQL repositories and the Arkesel HTTP client.

pub mod database;
pub mod gateway;

use thiserror::Error;

/// Errors raised while constructing infrastructure components
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub use database::mysql::{MySqlAccountRepository, MySqlMessageRepository};
pub use gateway::{ArkeselConfig, ArkeselGateway, MockGateway};
