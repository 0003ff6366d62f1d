//! # 인증 서비스 모듈
//!
//! OAuth2 소셜 로그인과 자체 JWT 발급을 담당합니다.
//!
//! ## 구성
//!
//! | 모듈 | 역할 |
//! |------|------|
//! | [`identity_provider`] | 프로바이더 추상화와 레지스트리 |
//! | [`github_provider`], [`google_provider`] | 프로바이더 구현 |
//! | [`state_validator`] | 콜백 state 검증 |
//! | [`token_signer`] | 액세스/리프레시 JWT 서명기 |
//! | [`identity_reconciler`] | 이메일 기준 사용자 조회/생성과 바인딩 |
//! | [`auth_service`] | 로그인/콜백/토큰 재발급 오케스트레이션 |
//!
//! 이 모듈의 어떤 타입도 환경 변수를 직접 읽지 않습니다. 설정은 모두
//! [`AuthSettings`](crate::config::AuthSettings)를 통해 주입됩니다.

pub mod auth_service;
pub mod github_provider;
pub mod google_provider;
pub mod identity_provider;
pub mod identity_reconciler;
pub mod state_validator;
pub mod token_signer;

pub use auth_service::AuthService;
pub use github_provider::{GithubEndpoints, GithubProvider};
pub use google_provider::{GoogleEndpoints, GoogleProvider};
pub use identity_provider::{IdentityProvider, ProviderError, ProviderRegistry};
pub use identity_reconciler::{IdentityReconciler, ReconcileError, UserCreatedHook};
pub use state_validator::{InvalidState, StateValidator};
pub use token_signer::{JwtTokenSigner, TokenError, TokenSigner};
