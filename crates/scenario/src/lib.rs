#![doc = include_str!("../README.md")]

pub mod cleanup;
pub mod config;
pub mod error;
pub mod presence;
pub mod report;
pub mod scenario;
pub mod step;

pub use cleanup::{CleanupOutcome, CleanupRecord, CleanupRegistry, CleanupTask};
pub use config::{EntityNames, ScenarioConfig, ScenarioConfigBuilder, generate_name_prefix};
pub use error::ScenarioError;
pub use presence::is_present;
pub use report::{Outcome, ScenarioReport};
pub use scenario::{IamLifecycleScenario, SCENARIO_NAME};
pub use step::{ScenarioStep, StepRecord, StepStatus, StepTrace};
