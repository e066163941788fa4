//! 에러 타입: 도메인별 에러 정의

use crate::types::EntityKind;

/// IAM lifecycle 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// IAM 서비스 호출 에러
    #[error("iam error: {0}")]
    Iam(#[from] IamError),

    /// 시나리오 검증 에러
    #[error("check error: {0}")]
    Check(#[from] CheckError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// IAM 서비스 에러
///
/// 실제 클라우드 SDK의 에러 코드(`NoSuchEntity`, `EntityAlreadyExists`,
/// `ValidationError`)와 1:1로 대응합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IamError {
    /// 대상 엔티티가 존재하지 않음
    #[error("{kind} not found: {name}")]
    NoSuchEntity { kind: EntityKind, name: String },

    /// 같은 이름의 엔티티가 이미 존재함
    #[error("{kind} already exists: {name}")]
    EntityAlreadyExists { kind: EntityKind, name: String },

    /// 요청 파라미터 검증 실패
    #[error("validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// 서비스 측 에러 (권한, 스로틀링, 내부 에러 등)
    #[error("service error: {0}")]
    Service(String),

    /// 전송 계층 에러
    #[error("transport error: {0}")]
    Transport(String),
}

impl IamError {
    /// 엔티티 부재(`NoSuchEntity`) 에러인지 확인합니다.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchEntity { .. })
    }
}

/// 시나리오 검증 에러
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// 응답 데이터에 대한 기대 조건이 충족되지 않음
    #[error("assertion failed at step '{step}': {message}")]
    Assertion { step: String, message: String },

    /// 스텝 실행 중 예기치 않은 에러
    #[error("step '{step}' failed: {reason}")]
    Step { step: String, reason: String },

    /// 정리(cleanup) 단계 실패
    #[error("cleanup failed for {failures} task(s)")]
    Cleanup { failures: usize },
}
