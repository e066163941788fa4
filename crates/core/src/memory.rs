//! 인메모리 IAM 서비스
//!
//! [`InMemoryIamClient`]는 IAM 컨트롤 플레인의 규칙(이름/경로 검증, 이름 중복 금지,
//! 엔티티 부재 에러, 경로 접두어 필터, 집합 기반 그룹 멤버십)을 따라
//! [`IamClient`]를 구현합니다. 시나리오 테스트와 CLI `run` 명령이 사용합니다.
//!
//! # 장애 주입
//!
//! ```ignore
//! use iam_lifecycle_core::{IamError, IamOperation, InMemoryIamClient};
//!
//! // 두 번째 AddUserToGroup 호출과 모든 ListGroups 호출이 실패
//! let client = InMemoryIamClient::new()
//!     .fail_on_call(IamOperation::AddUserToGroup, 2, IamError::Service("throttled".into()))
//!     .fail_on(IamOperation::ListGroups, IamError::Service("unavailable".into()));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::client::IamClient;
use crate::config::BackendConfig;
use crate::error::IamError;
use crate::types::{EntityKind, Group, IamOperation, User};

const MAX_USER_NAME_LEN: usize = 64;
const MAX_GROUP_NAME_LEN: usize = 128;
const MAX_PATH_LEN: usize = 512;
/// 생성 ID의 무작위 부분 길이
const ID_SUFFIX_LEN: usize = 17;

/// IAM 사용자/그룹 이름에 허용되는 문자인지 확인합니다.
pub fn is_valid_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "+=,.@_-".contains(c)
}

fn validate_name(kind: EntityKind, name: &str) -> Result<(), IamError> {
    let max = match kind {
        EntityKind::User => MAX_USER_NAME_LEN,
        EntityKind::Group => MAX_GROUP_NAME_LEN,
    };
    let field = match kind {
        EntityKind::User => "UserName",
        EntityKind::Group => "GroupName",
    };
    if name.is_empty() || name.len() > max {
        return Err(IamError::Validation {
            field: field.to_owned(),
            reason: format!("length {} (must be 1-{max})", name.len()),
        });
    }
    if !name.chars().all(is_valid_name_char) {
        return Err(IamError::Validation {
            field: field.to_owned(),
            reason: "contains characters outside [A-Za-z0-9+=,.@_-]".to_owned(),
        });
    }
    Ok(())
}

fn validate_path(field: &str, path: &str) -> Result<(), IamError> {
    if path.is_empty() || path.len() > MAX_PATH_LEN {
        return Err(IamError::Validation {
            field: field.to_owned(),
            reason: format!("length {} (must be 1-{MAX_PATH_LEN})", path.len()),
        });
    }
    if !path.starts_with('/') || !path.ends_with('/') {
        return Err(IamError::Validation {
            field: field.to_owned(),
            reason: "must begin and end with '/'".to_owned(),
        });
    }
    if !path.chars().all(|c| ('!'..='~').contains(&c)) {
        return Err(IamError::Validation {
            field: field.to_owned(),
            reason: "contains non-printable or non-ASCII characters".to_owned(),
        });
    }
    Ok(())
}

fn validate_path_prefix(prefix: &str) -> Result<(), IamError> {
    if !prefix.starts_with('/') || prefix.len() > MAX_PATH_LEN {
        return Err(IamError::Validation {
            field: "PathPrefix".to_owned(),
            reason: format!("must begin with '/' and be at most {MAX_PATH_LEN} characters"),
        });
    }
    Ok(())
}

fn generate_id(prefix: &str) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string().to_ascii_uppercase();
    format!("{prefix}{}", &random[..ID_SUFFIX_LEN])
}

/// 주입된 장애
#[derive(Debug, Clone)]
struct Fault {
    operation: IamOperation,
    /// 실패시킬 호출 번호 (1부터 시작). `None`이면 모든 호출 실패
    nth_call: Option<usize>,
    error: IamError,
}

#[derive(Debug, Default)]
struct ServiceState {
    users: BTreeMap<String, User>,
    groups: BTreeMap<String, Group>,
    /// (그룹 이름, 사용자 이름)
    memberships: BTreeSet<(String, String)>,
    calls: Vec<IamOperation>,
}

/// 프로세스 메모리에만 상태를 두는 IAM 서비스
#[derive(Debug)]
pub struct InMemoryIamClient {
    account_id: String,
    partition: String,
    faults: Vec<Fault>,
    state: Mutex<ServiceState>,
}

impl Default for InMemoryIamClient {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}

impl InMemoryIamClient {
    /// 기본 계정과 파티션으로 빈 서비스를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// `[backend]` 설정으로 빈 서비스를 생성합니다.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            account_id: config.account_id.clone(),
            partition: config.partition.clone(),
            faults: Vec::new(),
            state: Mutex::new(ServiceState::default()),
        }
    }

    /// `operation`의 모든 호출을 `error`로 실패시킵니다.
    pub fn fail_on(mut self, operation: IamOperation, error: IamError) -> Self {
        self.faults.push(Fault {
            operation,
            nth_call: None,
            error,
        });
        self
    }

    /// `operation`의 `nth`번째 호출(1부터 시작)만 `error`로 실패시킵니다.
    pub fn fail_on_call(mut self, operation: IamOperation, nth: usize, error: IamError) -> Self {
        self.faults.push(Fault {
            operation,
            nth_call: Some(nth),
            error,
        });
        self
    }

    /// 지금까지 받은 호출 목록 (호출 순서, 실패한 호출 포함)
    pub async fn calls(&self) -> Vec<IamOperation> {
        self.state.lock().await.calls.clone()
    }

    /// 현재 사용자 수
    pub async fn user_count(&self) -> usize {
        self.state.lock().await.users.len()
    }

    /// 현재 그룹 수
    pub async fn group_count(&self) -> usize {
        self.state.lock().await.groups.len()
    }

    /// 정확히 이 이름의 사용자가 있는지 확인합니다.
    pub async fn contains_user(&self, user_name: &str) -> bool {
        self.state.lock().await.users.contains_key(user_name)
    }

    /// 정확히 이 이름의 그룹이 있는지 확인합니다.
    pub async fn contains_group(&self, group_name: &str) -> bool {
        self.state.lock().await.groups.contains_key(group_name)
    }

    /// `user_name`이 현재 `group_name`의 멤버인지 확인합니다.
    pub async fn is_member(&self, user_name: &str, group_name: &str) -> bool {
        self.state
            .lock()
            .await
            .memberships
            .contains(&(group_name.to_owned(), user_name.to_owned()))
    }

    fn arn(&self, kind: EntityKind, path: &str, name: &str) -> String {
        format!(
            "arn:{}:iam::{}:{kind}{path}{name}",
            self.partition, self.account_id
        )
    }

    /// 호출을 기록하고, 해당하는 장애가 있으면 그 에러를 반환합니다.
    fn record(&self, state: &mut ServiceState, operation: IamOperation) -> Result<(), IamError> {
        state.calls.push(operation);
        let count = state.calls.iter().filter(|c| **c == operation).count();
        debug!(operation = %operation, call = count, "iam call");

        match self
            .faults
            .iter()
            .find(|f| f.operation == operation && f.nth_call.is_none_or(|n| n == count))
        {
            Some(fault) => {
                debug!(operation = %operation, error = %fault.error, "injected failure");
                Err(fault.error.clone())
            }
            None => Ok(()),
        }
    }
}

fn no_such_user(name: &str) -> IamError {
    IamError::NoSuchEntity {
        kind: EntityKind::User,
        name: name.to_owned(),
    }
}

fn no_such_group(name: &str) -> IamError {
    IamError::NoSuchEntity {
        kind: EntityKind::Group,
        name: name.to_owned(),
    }
}

impl IamClient for InMemoryIamClient {
    async fn create_user(&self, user_name: &str, path: &str) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::CreateUser)?;
        validate_name(EntityKind::User, user_name)?;
        validate_path("Path", path)?;

        if state.users.contains_key(user_name) {
            return Err(IamError::EntityAlreadyExists {
                kind: EntityKind::User,
                name: user_name.to_owned(),
            });
        }

        let user = User {
            user_name: user_name.to_owned(),
            path: path.to_owned(),
            user_id: Some(generate_id("AIDA")),
            arn: Some(self.arn(EntityKind::User, path, user_name)),
            create_date: Some(Utc::now()),
        };
        state.users.insert(user_name.to_owned(), user);
        Ok(())
    }

    async fn get_user(&self, user_name: &str) -> Result<Option<User>, IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::GetUser)?;
        state
            .users
            .get(user_name)
            .cloned()
            .map(Some)
            .ok_or_else(|| no_such_user(user_name))
    }

    async fn update_user(&self, user_name: &str, new_path: &str) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::UpdateUser)?;
        validate_path("NewPath", new_path)?;

        let arn = self.arn(EntityKind::User, new_path, user_name);
        let user = state
            .users
            .get_mut(user_name)
            .ok_or_else(|| no_such_user(user_name))?;
        user.path = new_path.to_owned();
        user.arn = Some(arn);
        Ok(())
    }

    async fn delete_user(&self, user_name: &str) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::DeleteUser)?;
        state
            .users
            .remove(user_name)
            .ok_or_else(|| no_such_user(user_name))?;
        state.memberships.retain(|(_, member)| member != user_name);
        Ok(())
    }

    async fn list_users(&self, path_prefix: Option<&str>) -> Result<Vec<User>, IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::ListUsers)?;
        let prefix = path_prefix.unwrap_or("/");
        validate_path_prefix(prefix)?;
        Ok(state
            .users
            .values()
            .filter(|u| u.path.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn create_group(&self, group_name: &str, path: &str) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::CreateGroup)?;
        validate_name(EntityKind::Group, group_name)?;
        validate_path("Path", path)?;

        if state.groups.contains_key(group_name) {
            return Err(IamError::EntityAlreadyExists {
                kind: EntityKind::Group,
                name: group_name.to_owned(),
            });
        }

        let group = Group {
            group_name: group_name.to_owned(),
            path: path.to_owned(),
            group_id: Some(generate_id("AGPA")),
            arn: Some(self.arn(EntityKind::Group, path, group_name)),
            create_date: Some(Utc::now()),
        };
        state.groups.insert(group_name.to_owned(), group);
        Ok(())
    }

    async fn get_group(&self, group_name: &str) -> Result<Option<Group>, IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::GetGroup)?;
        state
            .groups
            .get(group_name)
            .cloned()
            .map(Some)
            .ok_or_else(|| no_such_group(group_name))
    }

    async fn update_group(&self, group_name: &str, new_path: &str) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::UpdateGroup)?;
        validate_path("NewPath", new_path)?;

        let arn = self.arn(EntityKind::Group, new_path, group_name);
        let group = state
            .groups
            .get_mut(group_name)
            .ok_or_else(|| no_such_group(group_name))?;
        group.path = new_path.to_owned();
        group.arn = Some(arn);
        Ok(())
    }

    async fn delete_group(&self, group_name: &str) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::DeleteGroup)?;
        state
            .groups
            .remove(group_name)
            .ok_or_else(|| no_such_group(group_name))?;
        state.memberships.retain(|(group, _)| group != group_name);
        Ok(())
    }

    async fn list_groups(&self, path_prefix: Option<&str>) -> Result<Vec<Group>, IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::ListGroups)?;
        let prefix = path_prefix.unwrap_or("/");
        validate_path_prefix(prefix)?;
        Ok(state
            .groups
            .values()
            .filter(|g| g.path.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn add_user_to_group(&self, user_name: &str, group_name: &str) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::AddUserToGroup)?;
        if !state.users.contains_key(user_name) {
            return Err(no_such_user(user_name));
        }
        if !state.groups.contains_key(group_name) {
            return Err(no_such_group(group_name));
        }
        state
            .memberships
            .insert((group_name.to_owned(), user_name.to_owned()));
        Ok(())
    }

    async fn remove_user_from_group(
        &self,
        user_name: &str,
        group_name: &str,
    ) -> Result<(), IamError> {
        let mut state = self.state.lock().await;
        self.record(&mut state, IamOperation::RemoveUserFromGroup)?;
        if !state.users.contains_key(user_name) {
            return Err(no_such_user(user_name));
        }
        if !state.groups.contains_key(group_name) {
            return Err(no_such_group(group_name));
        }
        state
            .memberships
            .remove(&(group_name.to_owned(), user_name.to_owned()));
        Ok(())
    }
}
