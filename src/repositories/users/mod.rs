//! 사용자 데이터 액세스 계층
//!
//! 인증 코어는 [`UserStore`] 트레이트에만 의존하고, 구현체 선택은 `main`에서
//! `USER_STORE` 설정에 따라 이루어집니다.
//!
//! ```rust,ignore
//! use crate::repositories::users::{InMemoryUserRepository, UserStore};
//!
//! let store = InMemoryUserRepository::new();
//! let user = store.find_by_email(&email).await?;
//! ```

pub mod memory_user_repo;
pub mod mongo_user_repo;
pub mod user_repo;

pub use memory_user_repo::InMemoryUserRepository;
pub use mongo_user_repo::MongoUserRepository;
pub use user_repo::{StoreError, UserStore};
