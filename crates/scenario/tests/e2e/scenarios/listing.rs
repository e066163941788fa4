//! Assertion failures driven by distorted service responses.

use crate::helpers::clients::{Distortions, ScriptedClient};
use crate::helpers::config::*;

use iam_lifecycle_scenario::{ScenarioError, ScenarioStep};

async fn failing_assertion(distortions: Distortions) -> (ScenarioStep, String) {
    let scenario = scenario_with(ScriptedClient::new(distortions));
    let report = scenario.run().await.unwrap();

    assert!(!report.passed());
    assert_eq!(scenario.client().inner().user_count().await, 0);
    assert_eq!(scenario.client().inner().group_count().await, 0);

    match report.into_result() {
        Err(ScenarioError::Assertion { step, message }) => (step, message),
        other => panic!("expected assertion failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_e2e_empty_user_response_fails_get() {
    let (step, message) = failing_assertion(Distortions {
        empty_get_user: true,
        ..Distortions::default()
    })
    .await;

    assert_eq!(step, ScenarioStep::GetUser);
    assert_eq!(message, "Expected user");
}

#[tokio::test]
async fn test_e2e_empty_group_response_fails_get() {
    let (step, message) = failing_assertion(Distortions {
        empty_get_group: true,
        ..Distortions::default()
    })
    .await;

    assert_eq!(step, ScenarioStep::GetGroup);
    assert_eq!(message, "Expected group");
}

#[tokio::test]
async fn test_e2e_missing_arn_fails_get() {
    let (step, message) = failing_assertion(Distortions {
        user_without_arn: true,
        ..Distortions::default()
    })
    .await;

    assert_eq!(step, ScenarioStep::GetUser);
    assert_eq!(message, "Expected ARN");
}

#[tokio::test]
async fn test_e2e_ignored_update_fails_path_check() {
    let (step, message) = failing_assertion(Distortions {
        ignore_user_update: true,
        ..Distortions::default()
    })
    .await;

    assert_eq!(step, ScenarioStep::VerifyUserPath);
    assert!(message.starts_with("Unexpected updated user path"));
    assert!(message.contains("/path/updated/"));
}

#[tokio::test]
async fn test_e2e_user_missing_from_filtered_listing() {
    let (step, message) = failing_assertion(Distortions {
        hide_users_by_path: true,
        ..Distortions::default()
    })
    .await;

    assert_eq!(step, ScenarioStep::ListUsersByPath);
    assert_eq!(message, "User not found in listing for path");
}

#[tokio::test]
async fn test_e2e_listing_match_is_case_sensitive() {
    let (step, message) = failing_assertion(Distortions {
        uppercase_user_listing: true,
        ..Distortions::default()
    })
    .await;

    assert_eq!(step, ScenarioStep::ListUsers);
    assert_eq!(message, "User not found in listing");
}

#[tokio::test]
async fn test_e2e_group_still_listed_after_delete() {
    let (step, message) = failing_assertion(Distortions {
        stale_group_listing: true,
        ..Distortions::default()
    })
    .await;

    assert_eq!(step, ScenarioStep::VerifyGroupDeleted);
    assert_eq!(message, "Group found in listing after deletion");
}
