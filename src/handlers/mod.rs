//! # HTTP Request Handlers Module
//!
//! 핸들러는 요청 본문/경로를 검증하고 [`ServiceLocator`](crate::core::registry::ServiceLocator)에서
//! 서비스를 꺼내 호출한 뒤, 결과를 [`ApiResponse`](crate::domain::dto::ApiResponse)로 감싸 돌려줍니다.
//! 에러는 [`AppError`](crate::errors::AppError)가 HTTP 응답으로 변환합니다.
//!
//! ```text
//! Client ──► Handlers (이 모듈) ──► Services ──► Repositories
//! ```
//!
//! - **`auth`**: OAuth2 로그인/콜백
//! - **`token_handlers`**: 액세스 토큰 재발급
//! - **`users`**: 프로필 조회/수정

pub mod auth;
pub mod token_handlers;
pub mod users;
