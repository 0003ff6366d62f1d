//! # Google OAuth 2.0 프로바이더
//!
//! ## 사용하는 Google API 엔드포인트
//!
//! | 용도 | 엔드포인트 | 메서드 |
//! |------|------------|--------|
//! | **Authorization** | `https://accounts.google.com/o/oauth2/auth` | GET |
//! | **Token Exchange** | `https://oauth2.googleapis.com/token` | POST |
//! | **User Info** | `https://www.googleapis.com/oauth2/v2/userinfo` | GET |
//!
//! ## 필요한 OAuth 스코프
//!
//! - `openid`: OpenID Connect 식별자
//! - `email`: 사용자 이메일 주소
//! - `profile`: 기본 프로필 정보 (이름, 사진 등)
//!
//! 인가 URL에 `access_type=offline`을 붙여 리프레시 토큰 발급을 요청합니다.

use async_trait::async_trait;
use serde::Deserialize;

use super::identity_provider::{build_auth_url, IdentityProvider, ProviderError};
use crate::config::OAuthClientConfig;
use crate::domain::models::oauth::{Provider, ProviderToken, ProviderUserInfo};

#[derive(Debug, Clone)]
pub struct GoogleEndpoints {
    pub auth_uri: String,
    pub token_uri: String,
    pub userinfo_uri: String,
}

impl Default for GoogleEndpoints {
    fn default() -> Self {
        Self {
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            userinfo_uri: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
        }
    }
}

impl GoogleEndpoints {
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            auth_uri: format!("{base}/o/oauth2/auth"),
            token_uri: format!("{base}/token"),
            userinfo_uri: format!("{base}/oauth2/v2/userinfo"),
        }
    }
}

/// Google userinfo v2 응답
#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: Option<String>,
}

pub struct GoogleProvider {
    client: reqwest::Client,
    config: OAuthClientConfig,
    endpoints: GoogleEndpoints,
}

impl GoogleProvider {
    pub fn new(config: OAuthClientConfig) -> Self {
        Self::with_endpoints(config, GoogleEndpoints::default())
    }

    pub fn with_endpoints(config: OAuthClientConfig, endpoints: GoogleEndpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            endpoints,
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn auth_url(&self, state: &str) -> String {
        let scope = self.config.scopes.join(" ");
        build_auth_url(
            &self.endpoints.auth_uri,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("state", state),
                ("access_type", "offline"),
            ],
        )
    }

    async fn exchange_token(&self, code: &str) -> Result<ProviderToken, ProviderError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .client
            .post(&self.endpoints.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::ExchangeFailed(format!("Google 토큰 요청 실패: {e}")))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ExchangeFailed(format!(
                "Google 토큰 교환 실패: {error_text}"
            )));
        }

        let token = response
            .json::<ProviderToken>()
            .await
            .map_err(|e| ProviderError::ExchangeFailed(format!("Google 토큰 응답 파싱 실패: {e}")))?;

        if token.access_token.is_empty() {
            return Err(ProviderError::ExchangeFailed(
                "Google 토큰 응답의 access_token이 비어 있습니다".to_string(),
            ));
        }
        Ok(token)
    }

    async fn user_info(&self, token: &ProviderToken) -> Result<ProviderUserInfo, ProviderError> {
        let response = self
            .client
            .get(&self.endpoints.userinfo_uri)
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| ProviderError::UserInfoFailed(format!("Google 사용자 정보 요청 실패: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::UserInfoFailed(format!(
                "Google 사용자 정보 조회 실패 {status}: {error_text}"
            )));
        }

        let user = response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| ProviderError::UserInfoFailed(format!("Google 사용자 정보 파싱 실패: {e}")))?;

        ProviderUserInfo::new(
            user.id,
            user.name,
            user.email,
            user.picture.unwrap_or_default(),
            Provider::Google,
        )
    }
}
