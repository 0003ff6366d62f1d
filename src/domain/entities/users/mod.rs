//! Users Entity Module
//!
//! 사용자 도메인의 핵심 엔티티와 값 객체입니다.
//!
//! - [`user::User`]: 애그리거트 루트
//! - [`email::Email`]: 검증된 이메일
//! - [`permission::Permission`]: 전순서 권한 레벨
//!
//! ```rust,ignore
//! use crate::domain::entities::users::{Email, Permission, User};
//!
//! let mut user = User::new("alice", Email::new("a@example.com")?, "", Permission::Reader)?;
//! user.bind(Provider::Github, "1001")?;
//! ```

pub mod email;
pub mod permission;
pub mod user;

pub use email::Email;
pub use permission::Permission;
pub use user::{validate_user_name, User, UserError, UserId};
