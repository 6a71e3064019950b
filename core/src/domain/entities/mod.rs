//! Domain entities

pub mod account;
pub mod message;

pub use account::Account;
pub use message::{Message, MessageStatus, TransitionBlocked};
