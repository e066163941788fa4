//! Shared E2E test helpers.

pub mod clients;
pub mod config;
