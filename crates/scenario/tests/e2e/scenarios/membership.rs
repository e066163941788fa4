//! Membership idempotence.

use crate::helpers::config::*;

use iam_lifecycle_core::{IamClient, IamError, IamOperation, InMemoryIamClient};
use iam_lifecycle_scenario::{ScenarioError, ScenarioStep};

#[tokio::test]
async fn test_e2e_double_add_then_double_remove_succeeds() {
    let client = InMemoryIamClient::new();
    client.create_user("u", "/").await.unwrap();
    client.create_group("g", "/").await.unwrap();

    client.add_user_to_group("u", "g").await.unwrap();
    client.add_user_to_group("u", "g").await.unwrap();
    assert!(client.is_member("u", "g").await);

    client.remove_user_from_group("u", "g").await.unwrap();
    client.remove_user_from_group("u", "g").await.unwrap();
    assert!(!client.is_member("u", "g").await);
}

#[tokio::test]
async fn test_e2e_failing_second_add_fails_scenario() {
    let client = InMemoryIamClient::new().fail_on_call(
        IamOperation::AddUserToGroup,
        2,
        IamError::Service("LimitExceeded".to_owned()),
    );
    let scenario = scenario_with(client);

    let report = scenario.run().await.unwrap();

    assert!(!report.passed());
    assert_eq!(
        report.error().and_then(ScenarioError::step),
        Some(ScenarioStep::AddUserToGroupAgain)
    );
    // membership is dropped with the entities
    assert!(!scenario.client().is_member(TEST_USER, TEST_GROUP).await);
    assert_eq!(scenario.client().user_count().await, 0);
}

#[tokio::test]
async fn test_e2e_failing_second_remove_fails_scenario() {
    let client = InMemoryIamClient::new().fail_on_call(
        IamOperation::RemoveUserFromGroup,
        2,
        IamError::Service("conflict".to_owned()),
    );
    let scenario = scenario_with(client);

    let report = scenario.run().await.unwrap();

    assert_eq!(
        report.failed_step().map(|r| r.step),
        Some(ScenarioStep::RemoveUserFromGroupAgain)
    );
    assert_eq!(scenario.client().group_count().await, 0);
}
