//! 설정 관리: iam-lifecycle.toml 파싱 및 런타임 설정
//!
//! [`LifecycleConfig`]는 모든 섹션의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`IAM_LIFECYCLE_SCENARIO_NAME_PREFIX=ci-` 형식)
//! 3. 설정 파일 (`iam-lifecycle.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), iam_lifecycle_core::error::LifecycleError> {
//! use iam_lifecycle_core::config::LifecycleConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LifecycleConfig::load("iam-lifecycle.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LifecycleConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LifecycleError};
use crate::memory::is_valid_name_char;

/// IAM 사용자 이름 최대 길이 (접두어 + 접미어 합산 기준)
pub const MAX_ENTITY_NAME_LEN: usize = 64;

/// `name_prefix`가 비어 있을 때 실행마다 생성되는 접두어 길이 (`iamlc-` + 8자리 hex + `-`)
pub const GENERATED_PREFIX_LEN: usize = 15;

/// 통합 설정
///
/// `iam-lifecycle.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 시나리오 설정
    #[serde(default)]
    pub scenario: ScenarioSection,
    /// IAM 백엔드 설정
    #[serde(default)]
    pub backend: BackendConfig,
}

impl LifecycleConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LifecycleError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드, 검증 없음).
    ///
    /// 검증은 오버라이드가 끝난 뒤 [`load`](Self::load)에서 한 번만 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LifecycleError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LifecycleError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LifecycleError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LifecycleError> {
        toml::from_str(toml_str).map_err(|e| {
            LifecycleError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `IAM_LIFECYCLE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "IAM_LIFECYCLE_GENERAL_LOG_LEVEL");
        override_string(
            &mut self.general.log_format,
            "IAM_LIFECYCLE_GENERAL_LOG_FORMAT",
        );

        // Scenario
        override_string(
            &mut self.scenario.name_prefix,
            "IAM_LIFECYCLE_SCENARIO_NAME_PREFIX",
        );
        override_string(
            &mut self.scenario.user_suffix,
            "IAM_LIFECYCLE_SCENARIO_USER_SUFFIX",
        );
        override_string(
            &mut self.scenario.group_suffix,
            "IAM_LIFECYCLE_SCENARIO_GROUP_SUFFIX",
        );
        override_string(
            &mut self.scenario.initial_path,
            "IAM_LIFECYCLE_SCENARIO_INITIAL_PATH",
        );
        override_string(
            &mut self.scenario.updated_path,
            "IAM_LIFECYCLE_SCENARIO_UPDATED_PATH",
        );
        override_string(
            &mut self.scenario.list_path_prefix,
            "IAM_LIFECYCLE_SCENARIO_LIST_PATH_PREFIX",
        );
        override_bool(
            &mut self.scenario.strict_cleanup,
            "IAM_LIFECYCLE_SCENARIO_STRICT_CLEANUP",
        );

        // Backend
        override_string(
            &mut self.backend.account_id,
            "IAM_LIFECYCLE_BACKEND_ACCOUNT_ID",
        );
        override_string(
            &mut self.backend.partition,
            "IAM_LIFECYCLE_BACKEND_PARTITION",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(invalid(
                "general.log_level",
                format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(invalid(
                "general.log_format",
                format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }

        self.scenario.validate()?;
        self.backend.validate()?;
        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> LifecycleError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.into(),
    }
    .into()
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 시나리오 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSection {
    /// 엔티티 이름 접두어 (비어 있으면 실행마다 생성)
    pub name_prefix: String,
    /// 사용자 이름 접미어
    pub user_suffix: String,
    /// 그룹 이름 접미어
    pub group_suffix: String,
    /// 생성 시 경로
    pub initial_path: String,
    /// 갱신 후 경로
    pub updated_path: String,
    /// 목록 필터 경로 접두어
    pub list_path_prefix: String,
    /// 정리 실패 시 실행 전체를 실패로 처리
    pub strict_cleanup: bool,
}

impl Default for ScenarioSection {
    fn default() -> Self {
        Self {
            name_prefix: String::new(),
            user_suffix: "UserTest".to_owned(),
            group_suffix: "GroupTest".to_owned(),
            initial_path: "/path/".to_owned(),
            updated_path: "/path/updated/".to_owned(),
            list_path_prefix: "/path".to_owned(),
            strict_cleanup: false,
        }
    }
}

impl ScenarioSection {
    /// 시나리오 섹션을 검증합니다.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        validate_entity_path("scenario.initial_path", &self.initial_path)?;
        validate_entity_path("scenario.updated_path", &self.updated_path)?;

        if !self.list_path_prefix.starts_with('/') {
            return Err(invalid(
                "scenario.list_path_prefix",
                "must begin with '/'",
            ));
        }
        // 필터 조회는 경로 갱신 이후에 수행됨
        if !self.updated_path.starts_with(&self.list_path_prefix) {
            return Err(invalid(
                "scenario.list_path_prefix",
                format!(
                    "must be a prefix of scenario.updated_path ('{}')",
                    self.updated_path
                ),
            ));
        }

        for (field, value) in [
            ("scenario.name_prefix", &self.name_prefix),
            ("scenario.user_suffix", &self.user_suffix),
            ("scenario.group_suffix", &self.group_suffix),
        ] {
            if !value.chars().all(is_valid_name_char) {
                return Err(invalid(
                    field,
                    "may only contain [A-Za-z0-9+=,.@_-]",
                ));
            }
        }

        if self.user_suffix.is_empty() {
            return Err(invalid("scenario.user_suffix", "must not be empty"));
        }
        if self.group_suffix.is_empty() {
            return Err(invalid("scenario.group_suffix", "must not be empty"));
        }
        if self.user_suffix == self.group_suffix {
            return Err(invalid(
                "scenario.group_suffix",
                "must differ from scenario.user_suffix",
            ));
        }

        // 빈 접두어는 실행 시 생성되므로 생성 접두어 길이로 계산
        let prefix_len = if self.name_prefix.is_empty() {
            GENERATED_PREFIX_LEN
        } else {
            self.name_prefix.len()
        };
        let longest_suffix = self.user_suffix.len().max(self.group_suffix.len());
        if prefix_len + longest_suffix > MAX_ENTITY_NAME_LEN {
            return Err(invalid(
                "scenario.name_prefix",
                format!("prefix + suffix must be at most {MAX_ENTITY_NAME_LEN} characters"),
            ));
        }

        Ok(())
    }
}

fn validate_entity_path(field: &str, path: &str) -> Result<(), LifecycleError> {
    if !path.starts_with('/') || !path.ends_with('/') {
        return Err(invalid(field, "must begin and end with '/'"));
    }
    Ok(())
}

/// IAM 백엔드 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// 계정 ID (12자리 숫자)
    pub account_id: String,
    /// ARN 파티션 (aws, aws-cn, aws-us-gov 등)
    pub partition: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            account_id: "000000000000".to_owned(),
            partition: "aws".to_owned(),
        }
    }
}

impl BackendConfig {
    /// 백엔드 섹션을 검증합니다.
    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.account_id.len() != 12 || !self.account_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("backend.account_id", "must be exactly 12 digits"));
        }
        if self.partition.is_empty() {
            return Err(invalid("backend.partition", "must not be empty"));
        }
        Ok(())
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}
