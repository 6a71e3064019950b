//! SMS gateway implementations

pub mod arkesel;
pub mod mock;

pub use arkesel::{ArkeselConfig, ArkeselGateway};
pub use mock::MockGateway;
