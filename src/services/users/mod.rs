//! 사용자 프로필 서비스 모듈
//!
//! ```rust,ignore
//! use crate::services::users::UserService;
//!
//! let user_service = UserService::new(store.clone());
//! let profile = user_service.get_current_user_info(user_id).await?;
//! ```

pub mod user_service;

pub use user_service::UserService;
