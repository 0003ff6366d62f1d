//! 도메인 계층: 사용자 애그리거트, OAuth2/토큰 값 객체, 전송 객체

pub mod dto;
pub mod entities;
pub mod models;

pub use entities::users::{Email, Permission, User, UserError, UserId};
pub use models::oauth::{Provider, ProviderToken, ProviderUserInfo, UnknownProvider};
pub use models::token::{AuthToken, TokenClaims, TokenKind};
