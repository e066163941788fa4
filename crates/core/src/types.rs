//! 도메인 타입: IAM 사용자, 그룹, 연산 식별자

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// IAM 엔티티 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// IAM 사용자
    User,
    /// IAM 그룹
    Group,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// IAM 사용자
///
/// `user_id`, `arn`, `create_date`는 서비스가 할당하는 값입니다.
/// 응답에서 누락될 수 있으므로 `Option`으로 표현합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// 사용자 이름 (계정 내 유일)
    pub user_name: String,
    /// 계층 경로 (예: `/path/`)
    pub path: String,
    /// 서비스 할당 ID
    pub user_id: Option<String>,
    /// 서비스 할당 ARN
    pub arn: Option<String>,
    /// 생성 시각
    pub create_date: Option<DateTime<Utc>>,
}

/// IAM 그룹
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// 그룹 이름 (계정 내 유일)
    pub group_name: String,
    /// 계층 경로
    pub path: String,
    /// 서비스 할당 ID
    pub group_id: Option<String>,
    /// 서비스 할당 ARN
    pub arn: Option<String>,
    /// 생성 시각
    pub create_date: Option<DateTime<Utc>>,
}

/// 이름으로 식별되는 IAM 엔티티
///
/// 목록 조회 결과에서 특정 이름의 존재 여부를 확인할 때 사용합니다.
pub trait Named {
    /// 엔티티 종류
    const KIND: EntityKind;

    /// 엔티티 이름
    fn name(&self) -> &str;
}

impl Named for User {
    const KIND: EntityKind = EntityKind::User;

    fn name(&self) -> &str {
        &self.user_name
    }
}

impl Named for Group {
    const KIND: EntityKind = EntityKind::Group;

    fn name(&self) -> &str {
        &self.group_name
    }
}

/// IAM API 연산 식별자
///
/// 표시 이름은 IAM Query API의 액션 이름과 같습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IamOperation {
    CreateUser,
    GetUser,
    UpdateUser,
    DeleteUser,
    ListUsers,
    CreateGroup,
    GetGroup,
    UpdateGroup,
    DeleteGroup,
    ListGroups,
    AddUserToGroup,
    RemoveUserFromGroup,
}

impl IamOperation {
    /// 모든 연산 목록
    pub const ALL: [IamOperation; 12] = [
        Self::CreateUser,
        Self::GetUser,
        Self::UpdateUser,
        Self::DeleteUser,
        Self::ListUsers,
        Self::CreateGroup,
        Self::GetGroup,
        Self::UpdateGroup,
        Self::DeleteGroup,
        Self::ListGroups,
        Self::AddUserToGroup,
        Self::RemoveUserFromGroup,
    ];

    /// IAM Query API 액션 이름
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::CreateUser => "CreateUser",
            Self::GetUser => "GetUser",
            Self::UpdateUser => "UpdateUser",
            Self::DeleteUser => "DeleteUser",
            Self::ListUsers => "ListUsers",
            Self::CreateGroup => "CreateGroup",
            Self::GetGroup => "GetGroup",
            Self::UpdateGroup => "UpdateGroup",
            Self::DeleteGroup => "DeleteGroup",
            Self::ListGroups => "ListGroups",
            Self::AddUserToGroup => "AddUserToGroup",
            Self::RemoveUserFromGroup => "RemoveUserFromGroup",
        }
    }
}

impl fmt::Display for IamOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_name())
    }
}

impl FromStr for IamOperation {
    type Err = String;

    /// 액션 이름(`CreateUser`)과 kebab-case(`create-user`) 모두 허용합니다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.action_name().to_ascii_lowercase() == normalized)
            .ok_or_else(|| format!("unknown IAM operation: '{s}'"))
    }
}
