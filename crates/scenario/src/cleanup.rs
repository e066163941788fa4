//! 정리(cleanup) 작업 레지스트리
//!
//! 시나리오가 엔티티를 생성하면 생성 호출이 성공한 직후 [`CleanupTask`]가
//! 등록됩니다. [`CleanupRegistry::run_all`]은 등록의 역순으로 작업을 실행하므로
//! 그룹이 사용자보다 먼저 삭제됩니다.
//!
//! "not found" 응답은 시나리오가 이미 삭제했다는 뜻이므로 성공으로 간주합니다.
//! 그 외 에러는 로그와 기록만 남기고 나머지 작업을 계속 실행합니다.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use iam_lifecycle_core::metrics as m;
use iam_lifecycle_core::{EntityKind, IamClient, IamError};

/// 삭제 대기 중인 엔티티
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupTask {
    pub kind: EntityKind,
    pub name: String,
}

impl CleanupTask {
    pub fn user(name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::User,
            name: name.into(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            kind: EntityKind::Group,
            name: name.into(),
        }
    }

    /// 엔티티 종류에 맞는 삭제 API를 호출합니다.
    pub async fn execute<C: IamClient>(&self, client: &C) -> Result<(), IamError> {
        match self.kind {
            EntityKind::User => client.delete_user(&self.name).await,
            EntityKind::Group => client.delete_group(&self.name).await,
        }
    }
}

/// 정리 작업 하나의 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CleanupOutcome {
    Deleted,
    /// 엔티티가 이미 없음
    AlreadyAbsent,
    Failed { reason: String },
}

impl CleanupOutcome {
    /// 메트릭 레이블 값
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::AlreadyAbsent => "already_absent",
            Self::Failed { .. } => "failed",
        }
    }

    /// 삭제와 이미 없음은 모두 성공으로 간주합니다.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// 정리 작업과 그 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupRecord {
    #[serde(flatten)]
    pub task: CleanupTask,
    #[serde(flatten)]
    pub outcome: CleanupOutcome,
}

/// 등록 순서를 유지하는 삭제 대기 목록
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    tasks: Vec<CleanupTask>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 작업을 추가합니다. 실행은 등록의 역순입니다.
    pub fn register(&mut self, task: CleanupTask) {
        tracing::debug!(kind = %task.kind, name = %task.name, "registered cleanup task");
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 등록 순서대로의 작업 목록
    pub fn tasks(&self) -> &[CleanupTask] {
        &self.tasks
    }

    /// 모든 작업을 등록의 역순으로 실행합니다.
    ///
    /// 중간에 멈추지 않으며, 작업마다 정확히 하나의 기록을 실행 순서대로 반환합니다.
    pub async fn run_all<C: IamClient>(self, client: &C) -> Vec<CleanupRecord> {
        let mut records = Vec::with_capacity(self.tasks.len());

        for task in self.tasks.into_iter().rev() {
            let outcome = match task.execute(client).await {
                Ok(()) => {
                    info!(kind = %task.kind, name = %task.name, "cleanup deleted entity");
                    CleanupOutcome::Deleted
                }
                Err(e) if e.is_not_found() => {
                    info!(kind = %task.kind, name = %task.name, "Entity not found during cleanup.");
                    CleanupOutcome::AlreadyAbsent
                }
                Err(e) => {
                    error!(
                        kind = %task.kind,
                        name = %task.name,
                        error = %e,
                        "cleanup failed"
                    );
                    CleanupOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            let kind: &'static str = match task.kind {
                EntityKind::User => "user",
                EntityKind::Group => "group",
            };
            metrics::counter!(
                m::CLEANUP_TASKS_TOTAL,
                m::LABEL_KIND => kind,
                m::LABEL_RESULT => outcome.as_str()
            )
            .increment(1);

            records.push(CleanupRecord { task, outcome });
        }

        records
    }
}
