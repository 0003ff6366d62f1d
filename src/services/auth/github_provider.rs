//! # GitHub OAuth2 프로바이더
//!
//! | 용도 | 엔드포인트 | 메서드 |
//! |------|------------|--------|
//! | **Authorization** | `https://github.com/login/oauth/authorize` | GET |
//! | **Token Exchange** | `https://github.com/login/oauth/access_token` | POST |
//! | **Profile** | `https://api.github.com/user` | GET |
//! | **Emails** | `https://api.github.com/user/emails` | GET |
//!
//! GitHub 프로필의 `email`은 비공개 설정이면 비어 있으므로 이메일 목록을 한 번 더
//! 조회해 `primary`로 표시된 주소를 사용합니다. 주 이메일이 없으면 프로필 값을 유지합니다.
//!
//! 토큰 엔드포인트는 잘못된 코드에도 `200 OK`와 `{"error": ...}` 본문을 돌려주므로
//! 상태 코드와 본문을 모두 확인합니다.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use super::identity_provider::{build_auth_url, IdentityProvider, ProviderError};
use crate::config::OAuthClientConfig;
use crate::domain::models::oauth::{Provider, ProviderToken, ProviderUserInfo};

const CLIENT_USER_AGENT: &str = concat!("oauth-identity-service/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct GithubEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub user_url: String,
    pub emails_url: String,
}

impl Default for GithubEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            user_url: "https://api.github.com/user".to_string(),
            emails_url: "https://api.github.com/user/emails".to_string(),
        }
    }
}

impl GithubEndpoints {
    /// 모든 엔드포인트를 같은 호스트 아래로 보냅니다. (테스트용 목 서버 등)
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            authorize_url: format!("{base}/login/oauth/authorize"),
            token_url: format!("{base}/login/oauth/access_token"),
            user_url: format!("{base}/user"),
            emails_url: format!("{base}/user/emails"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GithubTokenResponse {
    access_token: Option<String>,
    token_type: Option<String>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    #[serde(default)]
    primary: bool,
}

pub struct GithubProvider {
    client: reqwest::Client,
    config: OAuthClientConfig,
    endpoints: GithubEndpoints,
}

impl GithubProvider {
    pub fn new(config: OAuthClientConfig) -> Self {
        Self::with_endpoints(config, GithubEndpoints::default())
    }

    pub fn with_endpoints(config: OAuthClientConfig, endpoints: GithubEndpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            endpoints,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: &ProviderToken,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&token.access_token)
            .header(ACCEPT, GITHUB_JSON)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|e| ProviderError::UserInfoFailed(format!("GitHub 요청 실패 ({url}): {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::UserInfoFailed(format!(
                "GitHub 응답 오류 ({url}) {status}: {error_text}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::UserInfoFailed(format!("GitHub 응답 파싱 실패 ({url}): {e}")))
    }
}

#[async_trait]
impl IdentityProvider for GithubProvider {
    fn provider(&self) -> Provider {
        Provider::Github
    }

    fn auth_url(&self, state: &str) -> String {
        let scope = self.config.scopes.join(" ");
        build_auth_url(
            &self.endpoints.authorize_url,
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
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_url.as_str()),
        ];

        let response = self
            .client
            .post(&self.endpoints.token_url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::ExchangeFailed(format!("GitHub 토큰 요청 실패: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::ExchangeFailed(format!(
                "GitHub 토큰 교환 실패 {status}: {error_text}"
            )));
        }

        let body = response
            .json::<GithubTokenResponse>()
            .await
            .map_err(|e| ProviderError::ExchangeFailed(format!("GitHub 토큰 응답 파싱 실패: {e}")))?;

        if let Some(error) = body.error {
            return Err(ProviderError::ExchangeFailed(format!(
                "GitHub 토큰 교환 거부: {} ({})",
                error,
                body.error_description.unwrap_or_default()
            )));
        }

        match body.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(ProviderToken {
                access_token,
                token_type: body.token_type,
                refresh_token: None,
                expires_in: None,
                scope: body.scope,
            }),
            None => Err(ProviderError::ExchangeFailed(
                "GitHub 토큰 응답에 access_token이 없습니다".to_string(),
            )),
        }
    }

    async fn user_info(&self, token: &ProviderToken) -> Result<ProviderUserInfo, ProviderError> {
        let user: GithubUser = self.get_json(&self.endpoints.user_url, token).await?;
        let emails: Vec<GithubEmail> = self.get_json(&self.endpoints.emails_url, token).await?;

        let email = emails
            .into_iter()
            .find(|e| e.primary)
            .map(|e| e.email)
            .or(user.email)
            .unwrap_or_default();

        ProviderUserInfo::new(
            user.id.to_string(),
            user.login,
            email,
            user.avatar_url.unwrap_or_default(),
            Provider::Github,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config() -> OAuthClientConfig {
        OAuthClientConfig {
            client_id: "gh-client".to_string(),
            client_secret: "gh-secret".to_string(),
            redirect_url: "http://localhost:8080/api/v1/oauth2/github/callback".to_string(),
            scopes: vec!["read:user".to_string(), "user:email".to_string()],
        }
    }

    fn provider_for(server: &MockServer) -> GithubProvider {
        GithubProvider::with_endpoints(config(), GithubEndpoints::with_base(&server.uri()))
    }

    #[test]
    fn test_auth_url_contains_required_params() {
        let provider = GithubProvider::new(config());
        let url = provider.auth_url("state-123");

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=gh-client"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=read%3Auser%20user%3Aemail"));
        assert!(url.contains("state=state-123"));
        assert!(url.contains("access_type=offline"));
        assert_eq!(url, provider.auth_url("state-123"));
    }

    #[actix_web::test]
    async fn test_exchange_token_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .and(header("accept", "application/json"))
            .and(body_string_contains("code=good-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "gho_abc",
                "token_type": "bearer",
                "scope": "read:user,user:email"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = provider_for(&server).exchange_token("good-code").await.unwrap();
        assert_eq!(token.access_token, "gho_abc");
    }

    #[actix_web::test]
    async fn test_exchange_token_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "bad_verification_code",
                "error_description": "The code passed is incorrect or expired."
            })))
            .mount(&server)
            .await;

        let result = provider_for(&server).exchange_token("replayed").await;
        assert!(matches!(result, Err(ProviderError::ExchangeFailed(_))));
    }

    #[actix_web::test]
    async fn test_exchange_token_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login/oauth/access_token"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = provider_for(&server).exchange_token("code").await;
        assert!(matches!(result, Err(ProviderError::ExchangeFailed(_))));
    }

    #[actix_web::test]
    async fn test_user_info_selects_primary_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer gho_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1001,
                "login": "alice",
                "email": null,
                "avatar_url": "https://avatars.githubusercontent.com/u/1001"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "email": "alice@work.example.com", "primary": false, "verified": true },
                { "email": "a@example.com", "primary": true, "verified": true }
            ])))
            .mount(&server)
            .await;

        let info = provider_for(&server)
            .user_info(&ProviderToken::bearer("gho_abc"))
            .await
            .unwrap();

        assert_eq!(info.id(), "1001");
        assert_eq!(info.name(), "alice");
        assert_eq!(info.email(), "a@example.com");
        assert_eq!(info.avatar(), "https://avatars.githubusercontent.com/u/1001");
        assert_eq!(info.provider(), Provider::Github);
    }

    #[actix_web::test]
    async fn test_user_info_without_primary_keeps_profile_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 7,
                "login": "bob",
                "email": "bob@example.com"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "email": "other@example.com", "primary": false }
            ])))
            .mount(&server)
            .await;

        let info = provider_for(&server)
            .user_info(&ProviderToken::bearer("t"))
            .await
            .unwrap();
        assert_eq!(info.email(), "bob@example.com");
        assert_eq!(info.avatar(), "");
    }

    #[actix_web::test]
    async fn test_user_info_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Bad credentials"))
            .mount(&server)
            .await;

        let result = provider_for(&server)
            .user_info(&ProviderToken::bearer("expired"))
            .await;
        assert!(matches!(result, Err(ProviderError::UserInfoFailed(_))));
    }

    #[actix_web::test]
    async fn test_user_info_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = provider_for(&server)
            .user_info(&ProviderToken::bearer("t"))
            .await;
        assert!(matches!(result, Err(ProviderError::UserInfoFailed(_))));
    }
}
