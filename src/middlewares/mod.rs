//! 미들웨어 모듈
//!
//! # 인증 미들웨어 (AuthMiddleware)
//! - Bearer 액세스 토큰 추출 및 검증
//! - 선택적으로 최소 권한 레벨(`reader < creator < admin`) 확인
//! - 검증된 사용자를 request extension에 [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)로 저장
//!
//! 토큰이 없거나 유효하지 않으면 401, 권한이 부족하면 403을 돌려줍니다.
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::AuthMiddleware;
//!
//! App::new().service(
//!     web::scope("/api/v1/user")
//!         .wrap(AuthMiddleware::required())
//!         .route("/current", web::get().to(current_user)),
//! )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
