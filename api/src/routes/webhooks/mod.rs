//! Inbound webhooks from external providers

pub mod delivery;
