//! # 사용자 저장소 계약
//!
//! 인증 코어가 사용자 레코드에 접근하는 유일한 통로입니다. 모든 조회 연산은
//! "없음"을 [`StoreError::NotFound`]로 구분해서 돌려주며, 호출자는 이를
//! 백엔드 장애와 다르게 처리해야 합니다.
//!
//! ## 구현체
//!
//! | 구현 | 용도 |
//! |------|------|
//! | [`MongoUserRepository`](super::mongo_user_repo::MongoUserRepository) | 운영 (MongoDB + Redis 캐시) |
//! | [`InMemoryUserRepository`](super::memory_user_repo::InMemoryUserRepository) | 테스트, `USER_STORE=memory` |

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::users::{Email, User, UserId};
use crate::domain::models::oauth::Provider;
use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    /// 유니크 제약 위반 (현재는 이메일)
    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound("사용자를 찾을 수 없습니다".to_string()),
            StoreError::Conflict(msg) => AppError::ValidationError(msg),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Upsert. 처음 저장되는 사용자(`id == 0`)에게는 ID를 부여해 채워 넣습니다.
    async fn save(&self, user: &mut User) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &Email) -> Result<User, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<User, StoreError>;

    /// 프로바이더 바인딩 ID로 조회. 로그인 경로에서는 사용하지 않습니다.
    async fn find_by_bound_id(&self, provider: Provider, external_id: &str) -> Result<User, StoreError>;

    async fn exists(&self, id: UserId) -> Result<bool, StoreError>;

    async fn delete(&self, id: UserId) -> Result<(), StoreError>;
}
