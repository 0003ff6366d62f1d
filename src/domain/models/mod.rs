//! # Domain Models Module
//!
//! 저장되지 않는 값 객체들입니다.
//!
//! - `oauth`: 프로바이더 식별자, 정규화된 프로바이더 사용자 정보, 프로바이더 토큰
//! - `token`: JWT 클레임과 발급된 토큰 쌍
//! - `auth`: 요청 단위로 전달되는 인증 사용자

pub mod auth;
pub mod oauth;
pub mod token;
