//! 시나리오 에러 타입
//!
//! [`ScenarioError`]는 실행을 중단시키거나 실패로 만드는 모든 경우를 다룹니다.
//! 상위 계층(CLI)은 `From<ScenarioError> for LifecycleError`를 통해
//! 코어 에러로 전파합니다.

use iam_lifecycle_core::error::{CheckError, ConfigError, IamError, LifecycleError};

use crate::step::ScenarioStep;

/// 시나리오 도메인 에러
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScenarioError {
    /// 응답 데이터가 기대와 다름
    #[error("assertion failed at step '{step}': {message}")]
    Assertion {
        /// 검증을 수행한 스텝
        step: ScenarioStep,
        /// 불일치 설명
        message: String,
    },

    /// 스텝 실행 중 IAM 클라이언트 에러
    #[error("step '{step}' failed: {source}")]
    Client {
        /// 호출한 스텝
        step: ScenarioStep,
        /// 원인 클라이언트 에러
        #[source]
        source: IamError,
    },

    /// 유효하지 않은 시나리오 설정
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드 이름
        field: String,
        /// 사유
        reason: String,
    },

    /// 엄격한 정리 모드에서 정리 작업 실패
    #[error("cleanup failed for {failures} task(s)")]
    Cleanup {
        /// 실패한 정리 작업 수
        failures: usize,
    },
}

impl ScenarioError {
    /// 에러가 발생한 스텝
    pub fn step(&self) -> Option<ScenarioStep> {
        match self {
            Self::Assertion { step, .. } | Self::Client { step, .. } => Some(*step),
            Self::Config { .. } | Self::Cleanup { .. } => None,
        }
    }
}

impl From<ScenarioError> for LifecycleError {
    fn from(err: ScenarioError) -> Self {
        match err {
            ScenarioError::Assertion { step, message } => {
                LifecycleError::Check(CheckError::Assertion {
                    step: step.id().to_owned(),
                    message,
                })
            }
            ScenarioError::Client { step, source } => LifecycleError::Check(CheckError::Step {
                step: step.id().to_owned(),
                reason: source.to_string(),
            }),
            ScenarioError::Config { field, reason } => {
                LifecycleError::Config(ConfigError::InvalidValue { field, reason })
            }
            ScenarioError::Cleanup { failures } => {
                LifecycleError::Check(CheckError::Cleanup { failures })
            }
        }
    }
}
