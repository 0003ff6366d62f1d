//! OAuth2 소셜 로그인 아이덴티티 서비스
//!
//! GitHub, Google 계정으로 로그인한 사용자를 이메일 기준으로 로컬 계정에
//! 연결하고, 자체 JWT 액세스/리프레시 토큰을 발급합니다.
//!
//! # Features
//!
//! - **OAuth2 로그인**: 프로바이더별 인가 URL 생성과 콜백 처리
//! - **식별자 조정**: 이메일 기준 조회/생성, 프로바이더 외부 ID 바인딩
//! - **JWT 인증**: 종류별 비밀키로 서명한 액세스/리프레시 토큰
//! - **MongoDB**: 사용자 영구 저장 (개발용 메모리 저장소 선택 가능)
//! - **Redis**: 사용자 조회 캐시
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────────┐
//! │    Services     │ ──► │ GitHub / Google API  │
//! └─────────────────┘     └──────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 사용자 저장소
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │
//! └─────────────────┘
//! ```

pub mod caching;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
