//! E2E tests for the IAM lifecycle scenario.
//!
//! Runs the full scenario against the in-memory IAM service, optionally
//! wrapped by clients that misbehave in specific ways.
//!
//! # Test Structure
//!
//! - `helpers/` -- Shared utilities (config presets, scripted clients)
//! - `scenarios/` -- Test files organized by behavior under test
//!
//! # Running
//!
//! ```bash
//! cargo test -p iam-lifecycle-scenario --test e2e
//! ```

mod helpers;
mod scenarios;
