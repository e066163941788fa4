//! IAM API 추상화
//!
//! [`IamClient`] trait은 라이프사이클 시나리오와 ID 서비스 사이의 계약입니다.
//! 워크스페이스는 [`InMemoryIamClient`](crate::memory::InMemoryIamClient)를
//! 제공하며, 실제 클라우드 SDK 기반 클라이언트도 같은 trait을 구현합니다.
//!
//! ```text
//! ┌──────────────────────┐
//! │ IamLifecycleScenario │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     ┌────────────┐
//!     │ IamClient  │ (trait)
//!     └────────────┘
//!        │       │
//!        ▼       ▼
//!   ┌────────┐ ┌──────────┐
//!   │InMemory│ │ SDK-backed│
//!   └────────┘ └──────────┘
//! ```
//!
//! # 에러 처리
//!
//! - 없는 사용자/그룹: `IamError::NoSuchEntity`
//! - 중복 생성: `IamError::EntityAlreadyExists`
//! - 잘못된 이름 또는 경로: `IamError::Validation`
//! - 그 외 서비스 에러: `IamError::Service`

use std::future::Future;

use crate::error::IamError;
use crate::types::{Group, User};

/// IAM 사용자/그룹 연산 추상화 trait
///
/// `Send + Sync + 'static`이므로 하나의 클라이언트를 `Arc`로 감싸
/// 여러 async 컨텍스트에서 공유할 수 있습니다.
pub trait IamClient: Send + Sync + 'static {
    /// 주어진 경로에 사용자를 생성합니다.
    ///
    /// # Errors
    ///
    /// - `IamError::EntityAlreadyExists`: 같은 이름의 사용자가 있음
    /// - `IamError::Validation`: 이름 또는 경로가 유효하지 않음
    fn create_user(
        &self,
        user_name: &str,
        path: &str,
    ) -> impl Future<Output = Result<(), IamError>> + Send;

    /// 사용자를 조회합니다.
    ///
    /// `Ok(None)`은 서비스가 사용자 본문 없이 응답했음을 의미합니다.
    ///
    /// # Errors
    ///
    /// - `IamError::NoSuchEntity`: 사용자가 없음
    fn get_user(
        &self,
        user_name: &str,
    ) -> impl Future<Output = Result<Option<User>, IamError>> + Send;

    /// 사용자를 새 경로로 옮깁니다.
    fn update_user(
        &self,
        user_name: &str,
        new_path: &str,
    ) -> impl Future<Output = Result<(), IamError>> + Send;

    /// 사용자를 삭제합니다.
    ///
    /// # Errors
    ///
    /// - `IamError::NoSuchEntity`: 사용자가 이미 없음
    fn delete_user(&self, user_name: &str) -> impl Future<Output = Result<(), IamError>> + Send;

    /// 사용자 목록을 조회합니다. `path_prefix`가 있으면 해당 접두어 경로로 제한합니다.
    fn list_users(
        &self,
        path_prefix: Option<&str>,
    ) -> impl Future<Output = Result<Vec<User>, IamError>> + Send;

    /// 주어진 경로에 그룹을 생성합니다.
    fn create_group(
        &self,
        group_name: &str,
        path: &str,
    ) -> impl Future<Output = Result<(), IamError>> + Send;

    /// 그룹을 조회합니다. `Ok(None)`은 빈 응답 본문을 의미합니다.
    fn get_group(
        &self,
        group_name: &str,
    ) -> impl Future<Output = Result<Option<Group>, IamError>> + Send;

    /// 그룹을 새 경로로 옮깁니다.
    fn update_group(
        &self,
        group_name: &str,
        new_path: &str,
    ) -> impl Future<Output = Result<(), IamError>> + Send;

    /// 그룹을 삭제합니다.
    ///
    /// # Errors
    ///
    /// - `IamError::NoSuchEntity`: 그룹이 이미 없음
    fn delete_group(&self, group_name: &str)
    -> impl Future<Output = Result<(), IamError>> + Send;

    /// 그룹 목록을 조회합니다. `path_prefix`가 있으면 해당 접두어 경로로 제한합니다.
    fn list_groups(
        &self,
        path_prefix: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Group>, IamError>> + Send;

    /// 사용자를 그룹에 추가합니다. 이미 멤버여도 성공합니다.
    fn add_user_to_group(
        &self,
        user_name: &str,
        group_name: &str,
    ) -> impl Future<Output = Result<(), IamError>> + Send;

    /// 사용자를 그룹에서 제거합니다. 멤버가 아니어도 성공합니다.
    fn remove_user_from_group(
        &self,
        user_name: &str,
        group_name: &str,
    ) -> impl Future<Output = Result<(), IamError>> + Send;
}
