//! 라이프사이클 시나리오 실행기 -- 스텝 실행, 정리, 보고서 생성 전체 흐름 관리
//!
//! [`IamLifecycleScenario`]는 임의의 [`IamClient`]에 대해 사용자/그룹
//! 라이프사이클을 수행하고, 결과와 관계없이 항상 정리 단계로 끝납니다.
//!
//! # 실행 흐름
//! ```text
//! validate config
//!      |
//! execute_steps ──(first error aborts)──┐
//!      |                                 |
//! StepTrace.finish <─────────────────────┘
//!      |
//! CleanupRegistry.run_all (reverse order, not-found tolerated)
//!      |
//! ScenarioReport
//! ```

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use iam_lifecycle_core::metrics as m;
use iam_lifecycle_core::{IamClient, IamError};

use crate::cleanup::{CleanupRegistry, CleanupTask};
use crate::config::{EntityNames, ScenarioConfig};
use crate::error::ScenarioError;
use crate::presence::is_present;
use crate::report::{Outcome, ScenarioReport};
use crate::step::{ScenarioStep, StepTrace};

/// 로그와 보고서에 기록되는 시나리오 이름
pub const SCENARIO_NAME: &str = "iam-user-group-management";

/// IAM 사용자/그룹 라이프사이클 시나리오
///
/// 클라이언트는 `Arc`로 공유되므로 테스트에서 실행 후 상태를 확인할 수 있습니다.
///
/// # 사용 예시
/// ```ignore
/// use std::sync::Arc;
/// use iam_lifecycle_core::InMemoryIamClient;
/// use iam_lifecycle_scenario::{IamLifecycleScenario, ScenarioConfig};
///
/// let scenario = IamLifecycleScenario::new(
///     Arc::new(InMemoryIamClient::new()),
///     ScenarioConfig::default(),
/// );
/// let report = scenario.run().await?;
/// assert!(report.passed());
/// ```
pub struct IamLifecycleScenario<C: IamClient> {
    client: Arc<C>,
    config: ScenarioConfig,
}

impl<C: IamClient> IamLifecycleScenario<C> {
    pub fn new(client: Arc<C>, config: ScenarioConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// 새로 만든 엔티티 이름으로 시나리오를 실행합니다.
    ///
    /// 설정이 유효하지 않을 때만 `Err`를 반환합니다.
    /// 스텝 실패와 정리 실패는 [`ScenarioReport`]에 담깁니다.
    pub async fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        self.config.validate()?;
        let names = self.config.entity_names();
        Ok(self.execute(names).await)
    }

    /// 호출자가 정한 이름으로 시나리오를 실행합니다.
    pub async fn run_with_names(&self, names: EntityNames) -> Result<ScenarioReport, ScenarioError> {
        self.config.validate()?;
        Ok(self.execute(names).await)
    }

    async fn execute(&self, names: EntityNames) -> ScenarioReport {
        let started_at = Utc::now();
        let start = Instant::now();
        info!(
            scenario = SCENARIO_NAME,
            user = %names.user,
            group = %names.group,
            "scenario started"
        );

        let mut trace = StepTrace::new();
        let mut cleanup = CleanupRegistry::new();
        let result = self.execute_steps(&names, &mut trace, &mut cleanup).await;

        let failure = result.as_ref().err().map(ToString::to_string);
        let steps = trace.finish(failure.as_deref());

        info!(tasks = cleanup.len(), "running cleanup");
        let cleanup_records = cleanup.run_all(self.client.as_ref()).await;
        let cleanup_failures = cleanup_records
            .iter()
            .filter(|r| !r.outcome.is_success())
            .count();

        let error = match result {
            Err(e) => Some(e),
            Ok(()) if cleanup_failures > 0 && self.config.strict_cleanup => {
                Some(ScenarioError::Cleanup {
                    failures: cleanup_failures,
                })
            }
            Ok(()) => {
                if cleanup_failures > 0 {
                    warn!(
                        failures = cleanup_failures,
                        "cleanup left entities behind; run still passes (strict_cleanup = false)"
                    );
                }
                None
            }
        };

        let outcome = match &error {
            Some(e) => Outcome::Failed {
                reason: e.to_string(),
            },
            None => Outcome::Passed,
        };

        let elapsed = start.elapsed();
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let result_label = if error.is_none() { "passed" } else { "failed" };
        metrics::counter!(m::SCENARIO_RUNS_TOTAL, m::LABEL_RESULT => result_label).increment(1);
        metrics::histogram!(m::SCENARIO_DURATION_SECONDS).record(elapsed.as_secs_f64());

        match &error {
            None => info!(
                scenario = SCENARIO_NAME,
                elapsed_ms = duration_ms,
                "scenario passed"
            ),
            Some(e) => warn!(scenario = SCENARIO_NAME, error = %e, "scenario failed"),
        }

        ScenarioReport {
            scenario: SCENARIO_NAME.to_owned(),
            user_name: names.user,
            group_name: names.group,
            started_at,
            duration_ms,
            steps,
            cleanup: cleanup_records,
            outcome,
            error,
        }
    }

    /// 스텝을 순서대로 실행하고 첫 실패에서 중단합니다.
    ///
    /// 정리 작업은 생성 호출이 성공한 직후에 등록됩니다.
    async fn execute_steps(
        &self,
        names: &EntityNames,
        trace: &mut StepTrace,
        cleanup: &mut CleanupRegistry,
    ) -> Result<(), ScenarioError> {
        let client = self.client.as_ref();
        let cfg = &self.config;
        let user = names.user.as_str();
        let group = names.group.as_str();

        // --- user ---
        let step = ScenarioStep::CreateUser;
        trace.begin(step, format!("Creating user: {user}"));
        client
            .create_user(user, &cfg.initial_path)
            .await
            .map_err(client_error(step))?;
        cleanup.register(CleanupTask::user(user));

        let step = ScenarioStep::GetUser;
        trace.begin(step, format!("Getting user: {user}"));
        let fetched = client.get_user(user).await.map_err(client_error(step))?;
        let fetched = require(fetched, step, "Expected user")?;
        ensure_eq(step, "Unexpected user name", user, &fetched.user_name)?;
        ensure_eq(step, "Unexpected user path", &cfg.initial_path, &fetched.path)?;
        ensure(step, "Expected ID", non_empty(fetched.user_id.as_deref()))?;
        ensure(step, "Expected ARN", non_empty(fetched.arn.as_deref()))?;
        ensure(step, "Expected created date", fetched.create_date.is_some())?;

        let step = ScenarioStep::UpdateUserPath;
        trace.begin(step, format!("Updating path for user: {user}"));
        client
            .update_user(user, &cfg.updated_path)
            .await
            .map_err(client_error(step))?;

        let step = ScenarioStep::VerifyUserPath;
        trace.begin(step, format!("Getting user after path update: {user}"));
        let fetched = client.get_user(user).await.map_err(client_error(step))?;
        let fetched = require(fetched, step, "Expected user")?;
        ensure_eq(
            step,
            "Unexpected updated user path",
            &cfg.updated_path,
            &fetched.path,
        )?;

        // --- group ---
        let step = ScenarioStep::CreateGroup;
        trace.begin(step, format!("Creating group: {group}"));
        client
            .create_group(group, &cfg.initial_path)
            .await
            .map_err(client_error(step))?;
        cleanup.register(CleanupTask::group(group));

        let step = ScenarioStep::GetGroup;
        trace.begin(step, format!("Getting group: {group}"));
        let fetched = client.get_group(group).await.map_err(client_error(step))?;
        let fetched = require(fetched, step, "Expected group")?;
        ensure_eq(step, "Unexpected group name", group, &fetched.group_name)?;
        ensure_eq(step, "Unexpected group path", &cfg.initial_path, &fetched.path)?;
        ensure(step, "Expected ID", non_empty(fetched.group_id.as_deref()))?;
        ensure(step, "Expected ARN", non_empty(fetched.arn.as_deref()))?;
        ensure(step, "Expected created date", fetched.create_date.is_some())?;

        let step = ScenarioStep::UpdateGroupPath;
        trace.begin(step, format!("Updating path for group: {group}"));
        client
            .update_group(group, &cfg.updated_path)
            .await
            .map_err(client_error(step))?;

        let step = ScenarioStep::VerifyGroupPath;
        trace.begin(step, format!("Getting group after path update: {group}"));
        let fetched = client.get_group(group).await.map_err(client_error(step))?;
        let fetched = require(fetched, step, "Expected group")?;
        ensure_eq(
            step,
            "Unexpected updated group path",
            &cfg.updated_path,
            &fetched.path,
        )?;

        // --- membership ---
        let step = ScenarioStep::AddUserToGroup;
        trace.begin(step, format!("Adding user {user} to group {group}"));
        client
            .add_user_to_group(user, group)
            .await
            .map_err(client_error(step))?;

        let step = ScenarioStep::AddUserToGroupAgain;
        trace.begin(step, "Adding user to group again (ensure idempotent)");
        client
            .add_user_to_group(user, group)
            .await
            .map_err(client_error(step))?;

        let step = ScenarioStep::RemoveUserFromGroup;
        trace.begin(step, format!("Removing user {user} from group {group}"));
        client
            .remove_user_from_group(user, group)
            .await
            .map_err(client_error(step))?;

        let step = ScenarioStep::RemoveUserFromGroupAgain;
        trace.begin(step, "Removing user from group again (ensure idempotent)");
        client
            .remove_user_from_group(user, group)
            .await
            .map_err(client_error(step))?;

        // --- user listing and deletion ---
        let step = ScenarioStep::ListUsers;
        trace.begin(step, "Listing users to verify user present");
        let users = client.list_users(None).await.map_err(client_error(step))?;
        ensure(step, "User not found in listing", is_present(user, &users))?;

        let step = ScenarioStep::ListUsersByPath;
        trace.begin(
            step,
            format!("Listing users for path prefix {}", cfg.list_path_prefix),
        );
        let users = client
            .list_users(Some(&cfg.list_path_prefix))
            .await
            .map_err(client_error(step))?;
        ensure(
            step,
            "User not found in listing for path",
            is_present(user, &users),
        )?;

        let step = ScenarioStep::DeleteUser;
        trace.begin(step, format!("Deleting user: {user}"));
        client.delete_user(user).await.map_err(client_error(step))?;

        let step = ScenarioStep::VerifyUserDeleted;
        trace.begin(step, "Listing users to verify user deleted");
        let users = client.list_users(None).await.map_err(client_error(step))?;
        ensure(
            step,
            "User found in listing after deletion",
            !is_present(user, &users),
        )?;

        // --- group listing and deletion ---
        let step = ScenarioStep::ListGroups;
        trace.begin(step, "Listing groups to verify group present");
        let groups = client.list_groups(None).await.map_err(client_error(step))?;
        ensure(step, "Group not found in listing", is_present(group, &groups))?;

        let step = ScenarioStep::ListGroupsByPath;
        trace.begin(
            step,
            format!("Listing groups for path prefix {}", cfg.list_path_prefix),
        );
        let groups = client
            .list_groups(Some(&cfg.list_path_prefix))
            .await
            .map_err(client_error(step))?;
        ensure(
            step,
            "Group not found in listing for path",
            is_present(group, &groups),
        )?;

        let step = ScenarioStep::DeleteGroup;
        trace.begin(step, format!("Deleting group: {group}"));
        client.delete_group(group).await.map_err(client_error(step))?;

        let step = ScenarioStep::VerifyGroupDeleted;
        trace.begin(step, "Listing groups to verify group deleted");
        let groups = client.list_groups(None).await.map_err(client_error(step))?;
        ensure(
            step,
            "Group found in listing after deletion",
            !is_present(group, &groups),
        )?;

        Ok(())
    }
}

fn client_error(step: ScenarioStep) -> impl FnOnce(IamError) -> ScenarioError {
    move |source| ScenarioError::Client { step, source }
}

fn ensure(step: ScenarioStep, message: &str, condition: bool) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Assertion {
            step,
            message: message.to_owned(),
        })
    }
}

fn ensure_eq(
    step: ScenarioStep,
    message: &str,
    expected: &str,
    actual: &str,
) -> Result<(), ScenarioError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ScenarioError::Assertion {
            step,
            message: format!("{message}: expected '{expected}', got '{actual}'"),
        })
    }
}

fn require<T>(value: Option<T>, step: ScenarioStep, message: &str) -> Result<T, ScenarioError> {
    value.ok_or_else(|| ScenarioError::Assertion {
        step,
        message: message.to_owned(),
    })
}

fn non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
