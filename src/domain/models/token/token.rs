//! JWT 클레임과 로그인 결과로 발급되는 토큰 쌍

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::auth::token_signer::TokenError;

/// 토큰 용도
///
/// 서명 키가 분리되어 있어도 클레임에 용도를 함께 실어 교차 사용을 막습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 사용자 ID (문자열 표기)
    pub sub: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

/// 액세스/리프레시 토큰 쌍 (값 객체)
#[derive(Debug, Clone)]
pub struct AuthToken {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// 만료 시각은 생성 시점 기준으로 반드시 미래여야 합니다.
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<Self, TokenError> {
        if expires_at <= Utc::now() {
            return Err(TokenError::InvalidExpiry(expires_at.to_rfc3339()));
        }

        Ok(Self {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// 호출할 때마다 현재 시각과 비교합니다.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// 남은 유효 시간(초), 만료되었으면 0
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}
