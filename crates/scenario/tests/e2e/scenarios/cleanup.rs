//! Cleanup guarantees: reverse order, not-found tolerance, strict mode.

use std::sync::Arc;

use crate::helpers::config::*;

use iam_lifecycle_core::{EntityKind, IamError, IamOperation, InMemoryIamClient};
use iam_lifecycle_scenario::{
    CleanupOutcome, IamLifecycleScenario, ScenarioError, ScenarioStep, StepStatus,
};

fn service_error(msg: &str) -> IamError {
    IamError::Service(msg.to_owned())
}

/// Every operation the scenario issues after the user exists.
const OPS_AFTER_USER_CREATE: [IamOperation; 10] = [
    IamOperation::GetUser,
    IamOperation::UpdateUser,
    IamOperation::CreateGroup,
    IamOperation::GetGroup,
    IamOperation::UpdateGroup,
    IamOperation::AddUserToGroup,
    IamOperation::RemoveUserFromGroup,
    IamOperation::ListUsers,
    IamOperation::ListGroups,
    IamOperation::DeleteUser,
];

#[tokio::test]
async fn test_e2e_any_failure_after_user_create_still_cleans_up() {
    for op in OPS_AFTER_USER_CREATE {
        // only the first call fails so the cleanup delete can succeed
        let client = InMemoryIamClient::new().fail_on_call(op, 1, service_error("injected"));
        let scenario = scenario_with(client);

        let report = scenario.run().await.unwrap();

        assert!(!report.passed(), "{op} failure must fail the run");
        let client = scenario.client();
        assert_eq!(client.user_count().await, 0, "user left behind after {op}");
        assert_eq!(client.group_count().await, 0, "group left behind after {op}");
    }
}

#[tokio::test]
async fn test_e2e_failure_before_group_create_registers_only_user() {
    let client = InMemoryIamClient::new().fail_on(IamOperation::CreateGroup, service_error("x"));
    let scenario = scenario_with(client);

    let report = scenario.run().await.unwrap();

    assert_eq!(report.cleanup.len(), 1);
    assert_eq!(report.cleanup[0].task.kind, EntityKind::User);
    assert_eq!(report.cleanup[0].outcome, CleanupOutcome::Deleted);
    assert_eq!(
        report.failed_step().map(|r| r.step),
        Some(ScenarioStep::CreateGroup)
    );
}

#[tokio::test]
async fn test_e2e_failure_after_group_create_deletes_group_first() {
    let client = InMemoryIamClient::new().fail_on(IamOperation::ListUsers, service_error("x"));
    let scenario = scenario_with(client);

    let report = scenario.run().await.unwrap();

    let kinds: Vec<_> = report.cleanup.iter().map(|r| r.task.kind).collect();
    assert_eq!(kinds, [EntityKind::Group, EntityKind::User]);
    assert!(
        report
            .cleanup
            .iter()
            .all(|r| r.outcome == CleanupOutcome::Deleted)
    );
}

#[tokio::test]
async fn test_e2e_steps_after_failure_are_skipped() {
    let client = InMemoryIamClient::new().fail_on(IamOperation::UpdateGroup, service_error("x"));
    let scenario = scenario_with(client);

    let report = scenario.run().await.unwrap();

    let failed_at = ScenarioStep::UpdateGroupPath.ordinal() - 1;
    assert!(matches!(
        report.steps[failed_at].status,
        StepStatus::Failed { .. }
    ));
    assert!(
        report.steps[..failed_at]
            .iter()
            .all(|r| r.status == StepStatus::Passed)
    );
    assert!(
        report.steps[failed_at + 1..]
            .iter()
            .all(|r| r.status == StepStatus::Skipped)
    );
}

#[tokio::test]
async fn test_e2e_second_delete_of_deleted_entity_does_not_fail_run() {
    let scenario = in_memory_scenario();

    let report = scenario.run().await.unwrap();

    // the scenario deleted both; cleanup deletes them again
    assert!(report.passed());
    assert_eq!(report.cleanup_failures(), 0);
    assert_eq!(report.cleanup.len(), 2);
}

#[tokio::test]
async fn test_e2e_cleanup_failure_is_recorded_but_tolerated() {
    // ListGroups fails before the scenario's delete-group step, so the
    // 1st DeleteGroup call is the cleanup task
    let client = InMemoryIamClient::new()
        .fail_on(IamOperation::ListGroups, service_error("list broken"))
        .fail_on_call(IamOperation::DeleteGroup, 1, service_error("delete broken"));
    let scenario = scenario_with(client);

    let report = scenario.run().await.unwrap();

    assert!(!report.passed());
    assert!(matches!(
        report.error(),
        Some(ScenarioError::Client {
            step: ScenarioStep::ListGroups,
            ..
        })
    ));
    assert_eq!(report.cleanup_failures(), 1);
    assert!(scenario.client().contains_group(TEST_GROUP).await);
    // group failure did not stop the user task
    assert_eq!(report.cleanup[1].outcome, CleanupOutcome::AlreadyAbsent);
}

#[tokio::test]
async fn test_e2e_lenient_cleanup_failure_keeps_passing_run() {
    // scenario's own DeleteGroup succeeds, cleanup's (2nd call) fails
    let client = InMemoryIamClient::new().fail_on_call(
        IamOperation::DeleteGroup,
        2,
        service_error("throttled"),
    );
    let scenario = scenario_with(client);

    let report = scenario.run().await.unwrap();

    assert!(report.passed());
    assert_eq!(report.cleanup_failures(), 1);
}

#[tokio::test]
async fn test_e2e_strict_cleanup_failure_fails_run() {
    let client = InMemoryIamClient::new().fail_on_call(
        IamOperation::DeleteGroup,
        2,
        service_error("throttled"),
    );
    let scenario = IamLifecycleScenario::new(Arc::new(client), strict_config());

    let report = scenario.run().await.unwrap();

    assert!(!report.passed());
    assert!(report.steps.iter().all(|r| r.status == StepStatus::Passed));
    assert!(matches!(
        report.into_result(),
        Err(ScenarioError::Cleanup { failures: 1 })
    ));
}

#[tokio::test]
async fn test_e2e_strict_cleanup_ignores_not_found() {
    let scenario = IamLifecycleScenario::new(Arc::new(InMemoryIamClient::new()), strict_config());

    let report = scenario.run().await.unwrap();

    assert!(report.passed());
}
