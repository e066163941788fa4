//! Full scenario against a well-behaved service.

use std::sync::Arc;

use crate::helpers::config::*;

use iam_lifecycle_core::{IamOperation, InMemoryIamClient};
use iam_lifecycle_scenario::{
    CleanupOutcome, EntityNames, IamLifecycleScenario, SCENARIO_NAME, ScenarioConfig,
    ScenarioStep, StepStatus,
};

#[tokio::test]
async fn test_e2e_full_run_passes() {
    let scenario = in_memory_scenario();

    let report = scenario.run().await.expect("valid config");

    assert!(report.passed(), "unexpected outcome: {}", report.outcome);
    assert_eq!(report.scenario, SCENARIO_NAME);
    assert_eq!(report.user_name, TEST_USER);
    assert_eq!(report.group_name, TEST_GROUP);
    assert_eq!(report.steps_passed(), ScenarioStep::ALL.len());
    assert_eq!(report.steps_skipped(), 0);
    assert!(report.failed_step().is_none());
    assert!(report.into_result().is_ok());
}

#[tokio::test]
async fn test_e2e_full_run_leaves_no_entities() {
    let scenario = in_memory_scenario();

    let report = scenario.run().await.unwrap();

    let client = scenario.client();
    assert_eq!(client.user_count().await, 0);
    assert_eq!(client.group_count().await, 0);
    // both deleted by the scenario itself, so cleanup finds nothing
    assert!(
        report
            .cleanup
            .iter()
            .all(|r| r.outcome == CleanupOutcome::AlreadyAbsent)
    );
}

#[tokio::test]
async fn test_e2e_steps_are_traced_in_order() {
    let scenario = in_memory_scenario();

    let report = scenario.run().await.unwrap();

    let steps: Vec<_> = report.steps.iter().map(|r| r.step).collect();
    assert_eq!(steps, ScenarioStep::ALL);
    assert_eq!(
        report.steps[0].description,
        format!("Creating user: {TEST_USER}")
    );
    assert_eq!(
        report.steps[9].description,
        "Adding user to group again (ensure idempotent)"
    );
    assert!(report.steps.iter().all(|r| r.status == StepStatus::Passed));
}

#[tokio::test]
async fn test_e2e_service_sees_expected_call_sequence() {
    use IamOperation::*;

    let scenario = in_memory_scenario();
    scenario.run().await.unwrap();

    let calls = scenario.client().calls().await;
    assert_eq!(
        calls,
        vec![
            CreateUser,
            GetUser,
            UpdateUser,
            GetUser,
            CreateGroup,
            GetGroup,
            UpdateGroup,
            GetGroup,
            AddUserToGroup,
            AddUserToGroup,
            RemoveUserFromGroup,
            RemoveUserFromGroup,
            ListUsers,
            ListUsers,
            DeleteUser,
            ListUsers,
            ListGroups,
            ListGroups,
            DeleteGroup,
            ListGroups,
            // cleanup, reverse order
            DeleteGroup,
            DeleteUser,
        ]
    );
}

#[tokio::test]
async fn test_e2e_generated_prefix_when_unset() {
    let scenario = IamLifecycleScenario::new(
        Arc::new(InMemoryIamClient::new()),
        ScenarioConfig::default(),
    );

    let first = scenario.run().await.unwrap();
    let second = scenario.run().await.unwrap();

    assert!(first.passed() && second.passed());
    assert!(first.user_name.starts_with("iamlc-"));
    assert_ne!(first.user_name, second.user_name);
}

#[tokio::test]
async fn test_e2e_custom_names_and_paths() {
    let config = iam_lifecycle_scenario::ScenarioConfigBuilder::new()
        .initial_path("/team/")
        .updated_path("/team/moved/")
        .list_path_prefix("/team/mo")
        .build()
        .unwrap();
    let scenario = IamLifecycleScenario::new(Arc::new(InMemoryIamClient::new()), config);

    let report = scenario
        .run_with_names(EntityNames {
            user: "alice".to_owned(),
            group: "admins".to_owned(),
        })
        .await
        .unwrap();

    assert!(report.passed(), "unexpected outcome: {}", report.outcome);
    assert_eq!(report.user_name, "alice");
}

#[tokio::test]
async fn test_e2e_report_serializes_to_json() {
    let scenario = in_memory_scenario();
    let report = scenario.run().await.unwrap();

    let value = serde_json::to_value(&report).expect("report is serializable");

    assert_eq!(value["outcome"], "passed");
    assert_eq!(value["user_name"], TEST_USER);
    assert_eq!(value["steps"].as_array().map(Vec::len), Some(20));
    assert_eq!(value["cleanup"][0]["kind"], "group");
}
