//! # Authentication Configuration Module
//!
//! OAuth2 프로바이더 클라이언트, JWT 서명기, 정적 OAuth2 state 값을 읽어
//! 하나의 불변 값([`AuthSettings`])으로 묶습니다. 프로세스 시작 시 한 번만
//! 만들어 서비스에 주입하며, 인증 서비스 내부에서는 환경 변수를 읽지 않습니다.
//!
//! ## 환경 변수
//!
//! ### OAuth2 state
//! ```bash
//! export OAUTH2_STATE_STRING="random-deployment-wide-state"
//! ```
//!
//! ### GitHub / Google 클라이언트
//! ```bash
//! export OAUTH2_GITHUB_CLIENT_ID="..."
//! export OAUTH2_GITHUB_CLIENT_SECRET="..."
//! export OAUTH2_GITHUB_REDIRECT_URL="http://localhost:8080/api/v1/oauth2/github/callback"
//! export OAUTH2_GITHUB_SCOPES="read:user,user:email"      # 선택
//!
//! export OAUTH2_GOOGLE_CLIENT_ID="..."
//! export OAUTH2_GOOGLE_CLIENT_SECRET="..."
//! export OAUTH2_GOOGLE_REDIRECT_URL="http://localhost:8080/api/v1/oauth2/google/callback"
//! export OAUTH2_GOOGLE_SCOPES="openid,email,profile"      # 선택
//! ```
//!
//! 세 값(client id, secret, redirect url) 중 하나라도 없으면 해당 프로바이더는
//! 등록되지 않고, 로그인 요청은 `InvalidProvider`로 거절됩니다.
//!
//! ### JWT 토큰
//! ```bash
//! export JWT_ACCESS_TOKEN_SECRET="access-secret"
//! export JWT_ACCESS_TOKEN_EXPIRATION_MINUTES="60"
//! export JWT_REFRESH_TOKEN_SECRET="refresh-secret"
//! export JWT_REFRESH_TOKEN_EXPIRATION_DAYS="7"
//! ```

use std::env;

use chrono::Duration;

use super::data_config::Environment;
use crate::errors::errors::AppError;

const DEV_STATE_STRING: &str = "oauth2-state-dev";
const DEV_ACCESS_SECRET: &str = "dev-access-token-secret";
const DEV_REFRESH_SECRET: &str = "dev-refresh-token-secret";

const MAX_ACCESS_TOKEN_MINUTES: i64 = 24 * 60;
const MAX_REFRESH_TOKEN_DAYS: i64 = 365;

/// 프로바이더 하나의 OAuth2 클라이언트 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

impl OAuthClientConfig {
    fn load<F>(lookup: &F, prefix: &str, default_scopes: &[&str]) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |suffix: &str| {
            lookup(&format!("{prefix}_{suffix}")).filter(|v| !v.trim().is_empty())
        };

        let (client_id, client_secret, redirect_url) =
            match (read("CLIENT_ID"), read("CLIENT_SECRET"), read("REDIRECT_URL")) {
                (Some(id), Some(secret), Some(redirect)) => (id, secret, redirect),
                _ => {
                    log::warn!("{prefix} 설정이 없어 해당 프로바이더를 비활성화합니다");
                    return None;
                }
            };

        let scopes = match read("SCOPES") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            None => default_scopes.iter().map(|s| s.to_string()).collect(),
        };

        Some(Self {
            client_id,
            client_secret,
            redirect_url,
            scopes,
        })
    }
}

pub struct GithubOAuthConfig;

impl GithubOAuthConfig {
    pub const ENV_PREFIX: &'static str = "OAUTH2_GITHUB";
    pub const DEFAULT_SCOPES: [&'static str; 2] = ["read:user", "user:email"];

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<OAuthClientConfig> {
        OAuthClientConfig::load(lookup, Self::ENV_PREFIX, &Self::DEFAULT_SCOPES)
    }
}

pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    pub const ENV_PREFIX: &'static str = "OAUTH2_GOOGLE";
    pub const DEFAULT_SCOPES: [&'static str; 3] = ["openid", "email", "profile"];

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: &F) -> Option<OAuthClientConfig> {
        OAuthClientConfig::load(lookup, Self::ENV_PREFIX, &Self::DEFAULT_SCOPES)
    }
}

/// 서명기 하나의 키와 토큰 수명
#[derive(Clone, PartialEq, Eq)]
pub struct SignerConfig {
    pub secret: String,
    pub ttl: Duration,
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("secret", &"***")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// 액세스/리프레시 서명기 설정. 두 키는 반드시 달라야 합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtConfig {
    pub access: SignerConfig,
    pub refresh: SignerConfig,
}

impl JwtConfig {
    pub fn from_lookup<F>(lookup: &F, environment: &Environment) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = secret_or_dev_default(
            lookup,
            "JWT_ACCESS_TOKEN_SECRET",
            DEV_ACCESS_SECRET,
            environment,
        )?;
        let refresh_secret = secret_or_dev_default(
            lookup,
            "JWT_REFRESH_TOKEN_SECRET",
            DEV_REFRESH_SECRET,
            environment,
        )?;

        let access_minutes = parse_lifetime(
            lookup,
            "JWT_ACCESS_TOKEN_EXPIRATION_MINUTES",
            60,
            MAX_ACCESS_TOKEN_MINUTES,
        )?;
        let refresh_days = parse_lifetime(
            lookup,
            "JWT_REFRESH_TOKEN_EXPIRATION_DAYS",
            7,
            MAX_REFRESH_TOKEN_DAYS,
        )?;

        Self::new(
            SignerConfig {
                secret: access_secret,
                ttl: Duration::minutes(access_minutes),
            },
            SignerConfig {
                secret: refresh_secret,
                ttl: Duration::days(refresh_days),
            },
        )
    }

    pub fn new(access: SignerConfig, refresh: SignerConfig) -> Result<Self, AppError> {
        if access.secret == refresh.secret {
            return Err(AppError::ConfigError(
                "access/refresh token secrets must differ".to_string(),
            ));
        }
        if access.ttl <= Duration::zero() || refresh.ttl <= Duration::zero() {
            return Err(AppError::ConfigError(
                "token lifetimes must be positive".to_string(),
            ));
        }
        Ok(Self { access, refresh })
    }
}

pub struct OAuthConfig;

impl OAuthConfig {
    pub fn state_string<F>(lookup: &F, environment: &Environment) -> Result<String, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        secret_or_dev_default(lookup, "OAUTH2_STATE_STRING", DEV_STATE_STRING, environment)
    }
}

/// 인증 서브시스템 전체 설정 (시작 후 읽기 전용)
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub state_string: String,
    pub github: Option<OAuthClientConfig>,
    pub google: Option<OAuthClientConfig>,
    pub jwt: JwtConfig,
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .map(|v| Environment::from_name(&v))
            .unwrap_or(Environment::Production);

        Ok(Self {
            state_string: OAuthConfig::state_string(&lookup, &environment)?,
            github: GithubOAuthConfig::from_lookup(&lookup),
            google: GoogleOAuthConfig::from_lookup(&lookup),
            jwt: JwtConfig::from_lookup(&lookup, &environment)?,
        })
    }
}

fn secret_or_dev_default<F>(
    lookup: &F,
    key: &str,
    dev_default: &str,
    environment: &Environment,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|v| !v.is_empty()) {
        Some(value) => Ok(value),
        None if environment.allows_insecure_defaults() => {
            log::warn!("{key} not set, using default (not secure for production!)");
            Ok(dev_default.to_string())
        }
        None => Err(AppError::ConfigError(format!("{key} must be set"))),
    }
}

/// `1..=max` 범위의 정수 수명
fn parse_lifetime<F>(lookup: &F, key: &str, default: i64, max: i64) -> Result<i64, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(value) if (1..=max).contains(&value) => Ok(value),
            _ => Err(AppError::ConfigError(format!(
                "{key} must be an integer between 1 and {max}, got {raw:?}"
            ))),
        },
    }
}
