//! 시나리오 설정
//!
//! [`ScenarioConfig`]는 코어의
//! [`ScenarioSection`](iam_lifecycle_core::config::ScenarioSection)에서 만들어지며
//! 실행별 이름 생성을 담당합니다. 검증 규칙은 코어 섹션과 동일한 것을 사용합니다.
//!
//! # 사용 예시
//! ```ignore
//! use iam_lifecycle_core::config::LifecycleConfig;
//! use iam_lifecycle_scenario::config::ScenarioConfig;
//!
//! let core_config = LifecycleConfig::default();
//! let config = ScenarioConfig::from_core(&core_config.scenario);
//! let names = config.entity_names();
//! ```

use iam_lifecycle_core::config::ScenarioSection;
use iam_lifecycle_core::error::{ConfigError, LifecycleError};
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;

/// 시나리오 실행 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// 고정 이름 접두어. `None`이면 실행마다 새로 생성
    pub name_prefix: Option<String>,
    /// 사용자 이름 접미어
    pub user_suffix: String,
    /// 그룹 이름 접미어
    pub group_suffix: String,
    /// 생성 시 경로
    pub initial_path: String,
    /// 갱신 스텝에서 적용할 경로
    pub updated_path: String,
    /// 경로 필터 목록 조회에 사용할 접두어
    pub list_path_prefix: String,
    /// "not found" 이외의 정리 실패 시 실행 전체를 실패로 처리
    pub strict_cleanup: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::from_core(&ScenarioSection::default())
    }
}

/// 한 번의 실행에서 사용할 사용자/그룹 이름
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityNames {
    /// IAM 사용자 이름
    pub user: String,
    /// IAM 그룹 이름
    pub group: String,
}

impl EntityNames {
    /// 접두어와 두 접미어를 이어 붙입니다.
    pub fn new(prefix: &str, user_suffix: &str, group_suffix: &str) -> Self {
        Self {
            user: format!("{prefix}{user_suffix}"),
            group: format!("{prefix}{group_suffix}"),
        }
    }
}

/// 새 `iamlc-<8자리 hex>-` 접두어를 반환합니다.
pub fn generate_name_prefix() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("iamlc-{}-", &id[..8])
}

impl ScenarioConfig {
    /// 코어 `[scenario]` 섹션으로부터 실행 설정을 만듭니다.
    ///
    /// 빈 `name_prefix`는 "실행마다 생성"을 의미합니다.
    pub fn from_core(core: &ScenarioSection) -> Self {
        Self {
            name_prefix: Some(core.name_prefix.clone()).filter(|p| !p.is_empty()),
            user_suffix: core.user_suffix.clone(),
            group_suffix: core.group_suffix.clone(),
            initial_path: core.initial_path.clone(),
            updated_path: core.updated_path.clone(),
            list_path_prefix: core.list_path_prefix.clone(),
            strict_cleanup: core.strict_cleanup,
        }
    }

    /// 코어 `[scenario]` 섹션 형태로 되돌립니다. `None` 접두어는 빈 문자열이 됩니다.
    pub fn to_section(&self) -> ScenarioSection {
        ScenarioSection {
            name_prefix: self.name_prefix.clone().unwrap_or_default(),
            user_suffix: self.user_suffix.clone(),
            group_suffix: self.group_suffix.clone(),
            initial_path: self.initial_path.clone(),
            updated_path: self.updated_path.clone(),
            list_path_prefix: self.list_path_prefix.clone(),
            strict_cleanup: self.strict_cleanup,
        }
    }

    /// 다음 실행에 사용할 이름. 고정 접두어가 있으면 그대로 사용합니다.
    pub fn entity_names(&self) -> EntityNames {
        let prefix = match &self.name_prefix {
            Some(prefix) => prefix.clone(),
            None => generate_name_prefix(),
        };
        EntityNames::new(&prefix, &self.user_suffix, &self.group_suffix)
    }

    /// 경로, 이름 구성 요소, 최종 이름 길이를 검증합니다.
    ///
    /// [`ScenarioSection::validate`]에 위임하므로 `config validate`와 같은 결과를 냅니다.
    pub fn validate(&self) -> Result<(), ScenarioError> {
        self.to_section().validate().map_err(validation_error)
    }
}

fn validation_error(err: LifecycleError) -> ScenarioError {
    match err {
        LifecycleError::Config(ConfigError::InvalidValue { field, reason }) => {
            ScenarioError::Config { field, reason }
        }
        other => ScenarioError::Config {
            field: "scenario".to_owned(),
            reason: other.to_string(),
        },
    }
}

/// [`ScenarioConfig`] 빌더
#[derive(Default)]
pub struct ScenarioConfigBuilder {
    config: ScenarioConfig,
}

impl ScenarioConfigBuilder {
    /// 기본값에서 시작합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 이름 접두어를 고정합니다.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.name_prefix = Some(prefix.into());
        self
    }

    /// 사용자 이름 접미어를 설정합니다.
    pub fn user_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.user_suffix = suffix.into();
        self
    }

    /// 그룹 이름 접미어를 설정합니다.
    pub fn group_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.group_suffix = suffix.into();
        self
    }

    /// 생성 경로를 설정합니다.
    pub fn initial_path(mut self, path: impl Into<String>) -> Self {
        self.config.initial_path = path.into();
        self
    }

    /// 갱신 스텝에서 적용할 경로를 설정합니다.
    pub fn updated_path(mut self, path: impl Into<String>) -> Self {
        self.config.updated_path = path.into();
        self
    }

    /// 목록 필터 접두어를 설정합니다.
    pub fn list_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.list_path_prefix = prefix.into();
        self
    }

    /// 엄격한 정리 모드를 켜거나 끕니다.
    pub fn strict_cleanup(mut self, strict: bool) -> Self {
        self.config.strict_cleanup = strict;
        self
    }

    /// 검증 후 설정을 반환합니다.
    pub fn build(self) -> Result<ScenarioConfig, ScenarioError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
