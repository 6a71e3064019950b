//! Domain layer: entities and value objects

pub mod entities;
pub mod value_objects;

pub use entities::{Account, Message, MessageStatus};
pub use value_objects::{DeliveryReport, ReportedStatus};
