#![doc = include_str!("../README.md")]

pub mod client;
pub mod config;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{CheckError, ConfigError, IamError, LifecycleError};

// 설정
pub use config::LifecycleConfig;

// IAM 클라이언트
pub use client::IamClient;
pub use memory::InMemoryIamClient;

// 도메인 타입
pub use types::{EntityKind, Group, IamOperation, Named, User};
