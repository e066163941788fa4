//! Config presets for E2E tests.

use std::sync::Arc;

use iam_lifecycle_core::{IamClient, InMemoryIamClient};
use iam_lifecycle_scenario::{IamLifecycleScenario, ScenarioConfig, ScenarioConfigBuilder};

/// Prefix used by every fixed-name test.
pub const TEST_PREFIX: &str = "e2e-";

/// Expected user name with [`TEST_PREFIX`].
#[allow(dead_code)]
pub const TEST_USER: &str = "e2e-UserTest";

/// Expected group name with [`TEST_PREFIX`].
#[allow(dead_code)]
pub const TEST_GROUP: &str = "e2e-GroupTest";

/// Default config with a fixed name prefix.
pub fn fixed_config() -> ScenarioConfig {
    ScenarioConfigBuilder::new()
        .name_prefix(TEST_PREFIX)
        .build()
        .expect("fixed test config must be valid")
}

/// Fixed config with strict cleanup enabled.
#[allow(dead_code)]
pub fn strict_config() -> ScenarioConfig {
    ScenarioConfigBuilder::new()
        .name_prefix(TEST_PREFIX)
        .strict_cleanup(true)
        .build()
        .expect("strict test config must be valid")
}

/// Scenario over `client` with [`fixed_config`].
pub fn scenario_with<C: IamClient>(client: C) -> IamLifecycleScenario<C> {
    IamLifecycleScenario::new(Arc::new(client), fixed_config())
}

/// Scenario over a fresh in-memory service.
#[allow(dead_code)]
pub fn in_memory_scenario() -> IamLifecycleScenario<InMemoryIamClient> {
    scenario_with(InMemoryIamClient::new())
}
