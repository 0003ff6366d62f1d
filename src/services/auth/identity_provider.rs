//! # 외부 OAuth2 프로바이더 추상화
//!
//! 프로바이더마다 [`IdentityProvider`]를 하나씩 구현하고 [`ProviderRegistry`]에
//! 등록합니다. 오케스트레이터는 요청 시점에 레지스트리에서 구현체를 찾을 뿐,
//! 특정 프로바이더를 분기문으로 알지 못합니다.
//!
//! ```text
//! ProviderRegistry
//! ├── github → GithubProvider
//! ├── google → GoogleProvider
//! └── qq     → (미등록: InvalidProvider)
//! ```
//!
//! 모든 호출은 네트워크 I/O만 수행하며 로컬 상태를 바꾸지 않습니다.
//! 인가 코드는 일회용이므로 교환 실패를 자동으로 재시도하지 않습니다.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::oauth::{Provider, ProviderToken, ProviderUserInfo};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// 토큰 엔드포인트 전송/상태 코드/디코딩 실패
    #[error("token exchange failed: {0}")]
    ExchangeFailed(String),

    /// 사용자 정보 엔드포인트 전송/디코딩 실패
    #[error("user info request failed: {0}")]
    UserInfoFailed(String),

    /// 응답은 받았지만 사용할 수 없는 사용자 정보
    #[error("invalid user info: {0}")]
    InvalidUserInfo(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider(&self) -> Provider;

    /// 인가 페이지 URL. 네트워크 호출 없이 설정과 state 값만으로 결정됩니다.
    fn auth_url(&self, state: &str) -> String;

    /// 인가 코드를 프로바이더 액세스 토큰으로 교환 (1회 왕복)
    async fn exchange_token(&self, code: &str) -> Result<ProviderToken, ProviderError>;

    /// 프로바이더 토큰으로 정규화된 사용자 정보를 조회
    async fn user_info(&self, token: &ProviderToken) -> Result<ProviderUserInfo, ProviderError>;
}

/// 프로바이더 → 구현체 매핑
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Provider, Arc<dyn IdentityProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 프로바이더가 이미 있으면 교체합니다.
    pub fn register(&mut self, provider: Arc<dyn IdentityProvider>) -> &mut Self {
        let key = provider.provider();
        if self.providers.insert(key, provider).is_some() {
            log::warn!("OAuth2 프로바이더 재등록: {}", key);
        } else {
            log::info!("OAuth2 프로바이더 등록: {}", key);
        }
        self
    }

    pub fn with(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn resolve(&self, provider: Provider) -> Option<Arc<dyn IdentityProvider>> {
        self.providers.get(&provider).cloned()
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        self.providers.contains_key(&provider)
    }

    pub fn configured(&self) -> Vec<Provider> {
        let mut list: Vec<Provider> = self.providers.keys().copied().collect();
        list.sort_by_key(|p| p.as_str());
        list
    }
}

/// `base?k=v&...` 형태의 인가 URL 조립
pub(crate) fn build_auth_url(base: &str, params: &[(&str, &str)]) -> String {
    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query_string)
}
