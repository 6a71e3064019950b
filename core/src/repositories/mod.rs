//! Repository interfaces for persistence.

pub mod account;
pub mod message;

pub use account::{AccountRepository, MockAccountRepository};
pub use message::{MessageRepository, MockMessageRepository, TransitionOutcome};
