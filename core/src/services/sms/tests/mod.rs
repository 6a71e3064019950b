//! Tests for the SMS send and delivery-reconciliation services

mod mocks;

mod delivery_tests;
