//! 시나리오 실행 보고서

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cleanup::CleanupRecord;
use crate::error::ScenarioError;
use crate::step::{StepRecord, StepStatus};

/// 실행 전체 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Failed { reason: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "PASSED"),
            Self::Failed { reason } => write!(f, "FAILED: {reason}"),
        }
    }
}

/// 한 번의 실행 결과 (스텝 추적, 정리 기록, 최종 결과)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: String,
    pub user_name: String,
    pub group_name: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub steps: Vec<StepRecord>,
    pub cleanup: Vec<CleanupRecord>,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// `outcome`의 원인 에러 (직렬화하지 않음)
    #[serde(skip)]
    pub error: Option<ScenarioError>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }

    pub fn error(&self) -> Option<&ScenarioError> {
        self.error.as_ref()
    }

    /// "not found" 이외의 이유로 실패한 정리 작업 수
    pub fn cleanup_failures(&self) -> usize {
        self.cleanup
            .iter()
            .filter(|r| !r.outcome.is_success())
            .count()
    }

    pub fn steps_passed(&self) -> usize {
        self.count_steps(|s| matches!(s, StepStatus::Passed))
    }

    pub fn steps_skipped(&self) -> usize {
        self.count_steps(|s| matches!(s, StepStatus::Skipped))
    }

    /// 실패한 스텝 기록
    pub fn failed_step(&self) -> Option<&StepRecord> {
        self.steps
            .iter()
            .find(|r| matches!(r.status, StepStatus::Failed { .. }))
    }

    /// 통과했으면 `Ok(self)`, 아니면 원인 에러를 반환합니다.
    pub fn into_result(self) -> Result<Self, ScenarioError> {
        match (&self.outcome, self.error.clone()) {
            (Outcome::Passed, _) => Ok(self),
            (Outcome::Failed { .. }, Some(err)) => Err(err),
            // 역직렬화된 보고서에는 원인 에러가 없음
            (Outcome::Failed { .. }, None) => Err(ScenarioError::Cleanup {
                failures: self.cleanup_failures(),
            }),
        }
    }

    fn count_steps(&self, pred: impl Fn(&StepStatus) -> bool) -> usize {
        self.steps.iter().filter(|r| pred(&r.status)).count()
    }
}
