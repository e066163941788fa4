//! E2E test scenarios.

mod cleanup;
mod happy_path;
mod listing;
mod membership;
