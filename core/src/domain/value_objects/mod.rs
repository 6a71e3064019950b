//! Value objects

pub mod delivery_report;

pub use delivery_report::{DeliveryReport, ReportedStatus};
