//! # OAuth2 인증 오케스트레이터
//!
//! 로그인과 콜백 두 흐름, 그리고 리프레시 토큰 교환을 담당합니다.
//!
//! ```text
//! Login:    provider 검증 → 레지스트리 조회 → 인가 URL 반환
//!
//! Callback: state 검증 ─────────────── 실패 → Unauthorized
//!           → provider 조회 ─────────── 실패 → InvalidProvider
//!           → 인가 코드 교환 ─────────── 실패 → Unauthorized
//!           → 사용자 정보 조회 ───────── 실패 → InternalError
//!           → 식별자 조정 ────────────── 실패 → InternalError
//!           → 토큰 쌍 발급 ───────────── 실패 → InternalError
//! ```
//!
//! 어떤 단계도 내부에서 재시도하지 않습니다. 인가 코드는 교환 시점에 이미
//! 소비되므로 이후 단계가 실패하면 사용자는 로그인을 처음부터 다시 시작해야 합니다.
//! 프로바이더 측 오류 문구는 로그에만 남기고 호출자에게는 분류된 에러만 돌려줍니다.

use std::sync::Arc;

use chrono::Utc;
use log::{error, info, warn};

use super::github_provider::GithubProvider;
use super::google_provider::GoogleProvider;
use super::identity_provider::{IdentityProvider, ProviderRegistry};
use super::identity_reconciler::IdentityReconciler;
use super::state_validator::StateValidator;
use super::token_signer::{JwtTokenSigner, TokenSigner};
use crate::config::AuthSettings;
use crate::domain::dto::auth::{CallbackCommand, LoginCommand, LoginResponse};
use crate::domain::dto::tokens::RefreshTokenResponse;
use crate::domain::entities::users::UserId;
use crate::domain::models::oauth::{Provider, UnknownProvider};
use crate::domain::models::token::AuthToken;
use crate::errors::{AppError, AppResult};

pub struct AuthService {
    registry: ProviderRegistry,
    state_validator: StateValidator,
    reconciler: IdentityReconciler,
    access_signer: Arc<dyn TokenSigner>,
    refresh_signer: Arc<dyn TokenSigner>,
}

impl AuthService {
    pub fn new(
        registry: ProviderRegistry,
        state_validator: StateValidator,
        reconciler: IdentityReconciler,
        access_signer: Arc<dyn TokenSigner>,
        refresh_signer: Arc<dyn TokenSigner>,
    ) -> Self {
        Self {
            registry,
            state_validator,
            reconciler,
            access_signer,
            refresh_signer,
        }
    }

    /// 시작 시점 설정으로 조립. 클라이언트 설정이 없는 프로바이더는 등록하지 않습니다.
    pub fn from_settings(settings: &AuthSettings, reconciler: IdentityReconciler) -> Self {
        let mut registry = ProviderRegistry::new();
        if let Some(github) = &settings.github {
            registry.register(Arc::new(GithubProvider::new(github.clone())));
        }
        if let Some(google) = &settings.google {
            registry.register(Arc::new(GoogleProvider::new(google.clone())));
        }
        if registry.configured().is_empty() {
            warn!("설정된 OAuth2 프로바이더가 없습니다. 모든 로그인 요청이 거부됩니다");
        }

        Self::new(
            registry,
            StateValidator::new(settings.state_string.clone()),
            reconciler,
            Arc::new(JwtTokenSigner::access(&settings.jwt.access)),
            Arc::new(JwtTokenSigner::refresh(&settings.jwt.refresh)),
        )
    }

    pub fn configured_providers(&self) -> Vec<Provider> {
        self.registry.configured()
    }

    /// 목록에 있고 클라이언트가 등록된 프로바이더인지 확인
    pub fn configured_provider(&self, raw: &str) -> AppResult<Provider> {
        let provider = parse_provider(raw)?;
        self.resolve(provider)?;
        Ok(provider)
    }

    pub fn login(&self, command: &LoginCommand) -> AppResult<LoginResponse> {
        let provider = parse_provider(&command.provider)?;
        let identity_provider = self.resolve(provider)?;

        let redirect_url = identity_provider.auth_url(self.state_validator.state());
        info!("OAuth2 로그인 리다이렉트: provider={}", provider);

        Ok(LoginResponse { redirect_url })
    }

    pub async fn callback(&self, command: &CallbackCommand) -> AppResult<AuthToken> {
        self.state_validator.validate(&command.state).map_err(|e| {
            warn!("OAuth2 state 불일치: provider={}", command.provider);
            AppError::Unauthorized(e.to_string())
        })?;

        let provider = parse_provider(&command.provider)?;
        let identity_provider = self.resolve(provider)?;

        let provider_token = identity_provider
            .exchange_token(&command.code)
            .await
            .map_err(|e| {
                error!("인가 코드 교환 실패: provider={}, {}", provider, e);
                AppError::Unauthorized("authorization code was rejected".to_string())
            })?;

        let user_info = identity_provider
            .user_info(&provider_token)
            .await
            .map_err(|e| {
                error!("사용자 정보 조회 실패: provider={}, {}", provider, e);
                AppError::InternalError(e.to_string())
            })?;

        let user = self.reconciler.reconcile(provider, &user_info).await.map_err(|e| {
            error!("식별자 조정 실패: provider={}, {}", provider, e);
            AppError::InternalError(e.to_string())
        })?;

        let token = self.issue_token_pair(user.id())?;
        info!("OAuth2 로그인 성공: user_id={}, provider={}", user.id(), provider);
        Ok(token)
    }

    /// 리프레시 토큰으로 새 액세스 토큰 발급
    pub fn refresh_access_token(&self, refresh_token: &str) -> AppResult<RefreshTokenResponse> {
        let user_id = self.refresh_signer.decode_token(refresh_token).map_err(|e| {
            warn!("리프레시 토큰 검증 실패: {}", e);
            AppError::Unauthorized(e.to_string())
        })?;

        let access_token = self.access_signer.encode_token(user_id).map_err(|e| {
            error!("액세스 토큰 발급 실패: user_id={}, {}", user_id, e);
            AppError::InternalError(e.to_string())
        })?;

        info!("액세스 토큰 재발급: user_id={}", user_id);
        Ok(RefreshTokenResponse { access_token })
    }

    /// Bearer 토큰 검증. 인증 미들웨어가 사용합니다.
    pub fn verify_access_token(&self, access_token: &str) -> AppResult<UserId> {
        self.access_signer
            .decode_token(access_token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }

    fn resolve(&self, provider: Provider) -> AppResult<Arc<dyn IdentityProvider>> {
        self.registry.resolve(provider).ok_or_else(|| {
            warn!("설정되지 않은 OAuth2 프로바이더: {}", provider);
            AppError::InvalidProvider(format!("{provider} is not configured"))
        })
    }

    fn issue_token_pair(&self, user_id: UserId) -> AppResult<AuthToken> {
        let issued_at = Utc::now();
        let sign = |signer: &Arc<dyn TokenSigner>| {
            signer.encode_token(user_id).map_err(|e| {
                error!("토큰 발급 실패: user_id={}, {}", user_id, e);
                AppError::InternalError(e.to_string())
            })
        };

        let access_token = sign(&self.access_signer)?;
        let refresh_token = sign(&self.refresh_signer)?;

        let expires_at = self.access_signer.expires_at(issued_at).map_err(|e| {
            error!("토큰 만료 시각 계산 실패: user_id={}, {}", user_id, e);
            AppError::InternalError(e.to_string())
        })?;

        AuthToken::new(access_token, refresh_token, expires_at)
            .map_err(|e| AppError::InternalError(e.to_string()))
    }
}

fn parse_provider(raw: &str) -> AppResult<Provider> {
    raw.parse().map_err(|e: UnknownProvider| {
        warn!("알 수 없는 OAuth2 프로바이더: {}", e.0);
        AppError::InvalidProvider(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Duration;

    use super::*;
    use crate::config::SignerConfig;
    use crate::domain::entities::users::{Email, Permission, User};
    use crate::domain::models::oauth::{ProviderToken, ProviderUserInfo};
    use crate::repositories::users::UserStore;
    use crate::services::auth::identity_provider::ProviderError;
    use crate::services::auth::identity_reconciler::tests::{counting_hook, CountingStore};

    const STATE: &str = "static-state";

    /// 호출 횟수를 기록하고 미리 정한 결과를 돌려주는 프로바이더
    struct SpyProvider {
        provider: Provider,
        exchange_result: Result<ProviderToken, ProviderError>,
        user_info_result: Result<ProviderUserInfo, ProviderError>,
        exchanges: AtomicUsize,
        user_info_calls: AtomicUsize,
        last_code: Mutex<Option<String>>,
    }

    impl SpyProvider {
        fn returning(info: ProviderUserInfo) -> Self {
            Self {
                provider: info.provider(),
                exchange_result: Ok(ProviderToken::bearer("provider-token")),
                user_info_result: Ok(info),
                exchanges: AtomicUsize::new(0),
                user_info_calls: AtomicUsize::new(0),
                last_code: Mutex::new(None),
            }
        }

        fn exchanges(&self) -> usize {
            self.exchanges.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl IdentityProvider for SpyProvider {
        fn provider(&self) -> Provider {
            self.provider
        }

        fn auth_url(&self, state: &str) -> String {
            format!("https://{}.example.com/authorize?state={}", self.provider, state)
        }

        async fn exchange_token(&self, code: &str) -> Result<ProviderToken, ProviderError> {
            self.exchanges.fetch_add(1, Ordering::SeqCst);
            *self.last_code.lock().unwrap() = Some(code.to_string());
            self.exchange_result.clone()
        }

        async fn user_info(&self, _token: &ProviderToken) -> Result<ProviderUserInfo, ProviderError> {
            self.user_info_calls.fetch_add(1, Ordering::SeqCst);
            self.user_info_result.clone()
        }
    }

    fn signer(secret: &str, ttl: Duration, refresh: bool) -> Arc<dyn TokenSigner> {
        let config = SignerConfig {
            secret: secret.to_string(),
            ttl,
        };
        if refresh {
            Arc::new(JwtTokenSigner::refresh(&config))
        } else {
            Arc::new(JwtTokenSigner::access(&config))
        }
    }

    struct Fixture {
        service: AuthService,
        store: Arc<CountingStore>,
        hook_calls: Arc<AtomicUsize>,
    }

    fn fixture(providers: Vec<Arc<SpyProvider>>) -> Fixture {
        let store = Arc::new(CountingStore::default());
        let hook_calls = Arc::new(AtomicUsize::new(0));
        let reconciler = IdentityReconciler::new(store.clone()).with_hook(counting_hook(hook_calls.clone()));

        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(provider);
        }

        let service = AuthService::new(
            registry,
            StateValidator::new(STATE),
            reconciler,
            signer("access-secret", Duration::minutes(15), false),
            signer("refresh-secret", Duration::days(7), true),
        );

        Fixture {
            service,
            store,
            hook_calls,
        }
    }

    fn github_alice() -> ProviderUserInfo {
        ProviderUserInfo::new("gh-1", "alice", "a@example.com", "https://avatars.example.com/a", Provider::Github)
            .unwrap()
    }

    fn callback(provider: &str, code: &str, state: &str) -> CallbackCommand {
        CallbackCommand {
            provider: provider.to_string(),
            code: code.to_string(),
            state: state.to_string(),
        }
    }

    #[test]
    fn test_login_returns_provider_auth_url() {
        let f = fixture(vec![Arc::new(SpyProvider::returning(github_alice()))]);

        let response = f
            .service
            .login(&LoginCommand {
                provider: "github".to_string(),
            })
            .unwrap();

        assert_eq!(response.redirect_url, "https://github.example.com/authorize?state=static-state");
    }

    #[actix_web::test]
    async fn test_unknown_or_unconfigured_provider_rejected() {
        let spy = Arc::new(SpyProvider::returning(github_alice()));
        let f = fixture(vec![spy.clone()]);

        for raw in ["twitter", "", "qq", "google"] {
            let login = f.service.login(&LoginCommand {
                provider: raw.to_string(),
            });
            assert!(matches!(login, Err(AppError::InvalidProvider(_))), "login {raw:?}");

            let result = f.service.callback(&callback(raw, "code", STATE)).await;
            assert!(matches!(result, Err(AppError::InvalidProvider(_))), "callback {raw:?}");
        }
        assert_eq!(spy.exchanges(), 0);
    }

    #[test]
    fn test_configured_provider() {
        let f = fixture(vec![Arc::new(SpyProvider::returning(github_alice()))]);

        assert_eq!(f.service.configured_provider("github").unwrap(), Provider::Github);
        for raw in ["twitter", "GitHub", "google", "qq"] {
            assert!(
                matches!(f.service.configured_provider(raw), Err(AppError::InvalidProvider(_))),
                "{raw:?}"
            );
        }
    }

    #[actix_web::test]
    async fn test_state_mismatch_never_exchanges() {
        let spy = Arc::new(SpyProvider::returning(github_alice()));
        let f = fixture(vec![spy.clone()]);

        for state in ["", "static-stat", "static-state ", "STATIC-STATE"] {
            let result = f.service.callback(&callback("github", "code", state)).await;
            assert!(matches!(result, Err(AppError::Unauthorized(_))), "{state:?}");
        }
        assert_eq!(spy.exchanges(), 0);
        assert_eq!(f.store.saves(), 0);
    }

    #[actix_web::test]
    async fn test_first_github_login() {
        let spy = Arc::new(SpyProvider::returning(github_alice()));
        let f = fixture(vec![spy.clone()]);

        let token = f.service.callback(&callback("github", "auth-code", STATE)).await.unwrap();

        assert!(!token.access_token().is_empty());
        assert!(!token.refresh_token().is_empty());
        assert!(!token.is_expired());
        assert_eq!(spy.last_code.lock().unwrap().as_deref(), Some("auth-code"));

        let user = f
            .store
            .inner
            .find_by_email(&Email::new("a@example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(user.permission(), Permission::Reader);
        assert_eq!(user.bound_id(Provider::Github), Some("gh-1"));
        assert_eq!(f.hook_calls.load(Ordering::SeqCst), 1);
        assert_eq!(f.service.verify_access_token(token.access_token()).unwrap(), user.id());
    }

    #[actix_web::test]
    async fn test_returning_user_google_login() {
        let google = ProviderUserInfo::new("g-9", "Alice Kim", "a@example.com", "", Provider::Google).unwrap();
        let spy = Arc::new(SpyProvider::returning(google));
        let f = fixture(vec![spy]);

        let past = Utc::now() - Duration::days(1);
        let mut existing = User::reconstruct(
            0,
            "alice".to_string(),
            Email::new("a@example.com").unwrap(),
            String::new(),
            Permission::Reader,
            past,
            past,
            past,
            Some("gh-1".to_string()),
            None,
            Some("g-old".to_string()),
        );
        f.store.inner.save(&mut existing).await.unwrap();

        let token = f.service.callback(&callback("google", "code", STATE)).await.unwrap();

        let user = f.store.inner.find_by_id(existing.id()).await.unwrap();
        assert!(user.last_login() > past);
        assert_eq!(user.bound_id(Provider::Google), Some("g-9"));
        assert_eq!(f.store.inner.len(), 1);
        assert_eq!(f.hook_calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.service.verify_access_token(token.access_token()).unwrap(), existing.id());
    }

    #[actix_web::test]
    async fn test_exchange_failure_is_unauthorized() {
        let mut spy = SpyProvider::returning(github_alice());
        spy.exchange_result = Err(ProviderError::ExchangeFailed("connection refused".to_string()));
        let spy = Arc::new(spy);
        let f = fixture(vec![spy.clone()]);

        let result = f.service.callback(&callback("github", "code", STATE)).await;

        match result {
            Err(AppError::Unauthorized(msg)) => assert!(!msg.contains("connection refused")),
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(spy.user_info_calls.load(Ordering::SeqCst), 0);
        assert_eq!(f.store.saves(), 0);
    }

    #[actix_web::test]
    async fn test_user_info_failure_is_internal() {
        let mut spy = SpyProvider::returning(github_alice());
        spy.user_info_result = Err(ProviderError::UserInfoFailed("502".to_string()));
        let f = fixture(vec![Arc::new(spy)]);

        let result = f.service.callback(&callback("github", "code", STATE)).await;

        assert!(matches!(result, Err(AppError::InternalError(_))));
        assert_eq!(f.store.saves(), 0);
    }

    #[actix_web::test]
    async fn test_reconcile_failure_is_internal() {
        let no_email = ProviderUserInfo::new("gh-1", "alice", "", "", Provider::Github).unwrap();
        let f = fixture(vec![Arc::new(SpyProvider::returning(no_email))]);

        let result = f.service.callback(&callback("github", "code", STATE)).await;

        assert!(matches!(result, Err(AppError::InternalError(_))));
    }

    #[test]
    fn test_refresh_access_token() {
        let f = fixture(vec![]);
        let refresh_token = signer("refresh-secret", Duration::days(7), true).encode_token(5).unwrap();

        let response = f.service.refresh_access_token(&refresh_token).unwrap();
        assert_eq!(f.service.verify_access_token(&response.access_token).unwrap(), 5);

        // 액세스 토큰은 리프레시 토큰으로 쓸 수 없고, 그 반대도 마찬가지
        assert!(matches!(
            f.service.refresh_access_token(&response.access_token),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            f.service.verify_access_token(&refresh_token),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(f.service.refresh_access_token("garbage"), Err(AppError::Unauthorized(_))));
    }
}
