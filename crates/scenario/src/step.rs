//! 시나리오 스텝과 스텝 추적
//!
//! [`ScenarioStep`]은 추적되는 모든 스텝을 실행 순서대로 나열합니다.
//! [`StepTrace`]는 실행된 스텝, 실패한 스텝, 실행되지 않은 스텝을 기록하고
//! 스텝마다 `info!` 이벤트를 하나씩 남깁니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use iam_lifecycle_core::metrics as m;

/// 라이프사이클 시나리오의 추적 단위 스텝
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioStep {
    CreateUser,
    GetUser,
    UpdateUserPath,
    VerifyUserPath,
    CreateGroup,
    GetGroup,
    UpdateGroupPath,
    VerifyGroupPath,
    AddUserToGroup,
    AddUserToGroupAgain,
    RemoveUserFromGroup,
    RemoveUserFromGroupAgain,
    ListUsers,
    ListUsersByPath,
    DeleteUser,
    VerifyUserDeleted,
    ListGroups,
    ListGroupsByPath,
    DeleteGroup,
    VerifyGroupDeleted,
}

impl ScenarioStep {
    /// 실행 순서대로의 전체 스텝
    pub const ALL: [ScenarioStep; 20] = [
        Self::CreateUser,
        Self::GetUser,
        Self::UpdateUserPath,
        Self::VerifyUserPath,
        Self::CreateGroup,
        Self::GetGroup,
        Self::UpdateGroupPath,
        Self::VerifyGroupPath,
        Self::AddUserToGroup,
        Self::AddUserToGroupAgain,
        Self::RemoveUserFromGroup,
        Self::RemoveUserFromGroupAgain,
        Self::ListUsers,
        Self::ListUsersByPath,
        Self::DeleteUser,
        Self::VerifyUserDeleted,
        Self::ListGroups,
        Self::ListGroupsByPath,
        Self::DeleteGroup,
        Self::VerifyGroupDeleted,
    ];

    /// 로그, 메트릭, JSON 출력에 쓰이는 고정 kebab-case 식별자
    pub fn id(&self) -> &'static str {
        match self {
            Self::CreateUser => "create-user",
            Self::GetUser => "get-user",
            Self::UpdateUserPath => "update-user-path",
            Self::VerifyUserPath => "verify-user-path",
            Self::CreateGroup => "create-group",
            Self::GetGroup => "get-group",
            Self::UpdateGroupPath => "update-group-path",
            Self::VerifyGroupPath => "verify-group-path",
            Self::AddUserToGroup => "add-user-to-group",
            Self::AddUserToGroupAgain => "add-user-to-group-again",
            Self::RemoveUserFromGroup => "remove-user-from-group",
            Self::RemoveUserFromGroupAgain => "remove-user-from-group-again",
            Self::ListUsers => "list-users",
            Self::ListUsersByPath => "list-users-by-path",
            Self::DeleteUser => "delete-user",
            Self::VerifyUserDeleted => "verify-user-deleted",
            Self::ListGroups => "list-groups",
            Self::ListGroupsByPath => "list-groups-by-path",
            Self::DeleteGroup => "delete-group",
            Self::VerifyGroupDeleted => "verify-group-deleted",
        }
    }

    /// 실행별 이름을 제외한 스텝 설명
    pub fn summary(&self) -> &'static str {
        match self {
            Self::CreateUser => "create the user at the initial path",
            Self::GetUser => "fetch the user and check name, path, id, ARN and creation date",
            Self::UpdateUserPath => "move the user to the updated path",
            Self::VerifyUserPath => "fetch the user and check the updated path",
            Self::CreateGroup => "create the group at the initial path",
            Self::GetGroup => "fetch the group and check name, path, id, ARN and creation date",
            Self::UpdateGroupPath => "move the group to the updated path",
            Self::VerifyGroupPath => "fetch the group and check the updated path",
            Self::AddUserToGroup => "add the user to the group",
            Self::AddUserToGroupAgain => "add the user to the group again (idempotent)",
            Self::RemoveUserFromGroup => "remove the user from the group",
            Self::RemoveUserFromGroupAgain => "remove the user from the group again (idempotent)",
            Self::ListUsers => "list all users and find the user",
            Self::ListUsersByPath => "list users under the path prefix and find the user",
            Self::DeleteUser => "delete the user",
            Self::VerifyUserDeleted => "list all users and confirm the user is gone",
            Self::ListGroups => "list all groups and find the group",
            Self::ListGroupsByPath => "list groups under the path prefix and find the group",
            Self::DeleteGroup => "delete the group",
            Self::VerifyGroupDeleted => "list all groups and confirm the group is gone",
        }
    }

    /// [`ScenarioStep::ALL`] 안에서의 위치 (1부터 시작)
    pub fn ordinal(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .map_or(0, |idx| idx + 1)
    }
}

impl fmt::Display for ScenarioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 스텝 하나의 상태
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// 시작했지만 아직 끝나지 않음
    Running,
    Passed,
    Failed { reason: String },
    /// 앞선 스텝 실패로 시작하지 않음
    Skipped,
}

/// 스텝 추적의 한 줄
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: ScenarioStep,
    /// 실행별 설명 (예: `Creating user: iamlc-1a2b3c4d-UserTest`)
    pub description: String,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// 실행된 스텝의 순서 있는 기록
#[derive(Debug, Default)]
pub struct StepTrace {
    records: Vec<StepRecord>,
}

impl StepTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// 직전 스텝을 통과로 표시하고 `step`을 시작합니다.
    pub fn begin(&mut self, step: ScenarioStep, description: impl Into<String>) {
        self.complete_running();

        let description = description.into();
        info!(step = step.id(), "{description}");
        metrics::counter!(m::SCENARIO_STEPS_TOTAL, m::LABEL_STEP => step.id()).increment(1);

        self.records.push(StepRecord {
            step,
            description,
            status: StepStatus::Running,
        });
    }

    /// 추적을 마감합니다.
    ///
    /// `Some(reason)`이면 실행 중인 스텝을 실패로, 아니면 통과로 표시합니다.
    /// 시작하지 않은 스텝은 모두 건너뜀(skipped)으로 덧붙입니다.
    pub fn finish(mut self, failure: Option<&str>) -> Vec<StepRecord> {
        match failure {
            Some(reason) => {
                if let Some(last) = self.records.last_mut() {
                    if last.status == StepStatus::Running {
                        warn!(step = last.step.id(), reason, "step failed");
                        metrics::counter!(
                            m::SCENARIO_STEP_FAILURES_TOTAL,
                            m::LABEL_STEP => last.step.id()
                        )
                        .increment(1);
                        last.status = StepStatus::Failed {
                            reason: reason.to_owned(),
                        };
                    }
                }
            }
            None => self.complete_running(),
        }

        for step in ScenarioStep::ALL {
            if !self.records.iter().any(|r| r.step == step) {
                self.records.push(StepRecord {
                    step,
                    description: step.summary().to_owned(),
                    status: StepStatus::Skipped,
                });
            }
        }
        self.records
    }

    /// 현재 실행 중인 스텝
    pub fn current(&self) -> Option<ScenarioStep> {
        self.records
            .last()
            .filter(|r| r.status == StepStatus::Running)
            .map(|r| r.step)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn complete_running(&mut self) {
        if let Some(last) = self.records.last_mut() {
            if last.status == StepStatus::Running {
                last.status = StepStatus::Passed;
            }
        }
    }
}
