//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! - [`auth`]: OAuth2 로그인, 식별자 조정, JWT 발급
//! - [`users`]: 프로필 조회와 수정
//!
//! 서비스는 생성자로 의존성을 주입받습니다. 전역 [`ServiceLocator`](crate::core::registry::ServiceLocator)는
//! HTTP 어댑터에서만 사용합니다.

pub mod auth;
pub mod users;
