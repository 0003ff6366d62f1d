//! JWT 토큰 서명기
//!
//! 액세스 토큰용, 리프레시 토큰용으로 각각 독립된 키와 수명을 가진 인스턴스를
//! 하나씩 만들어 사용합니다. 클레임에는 토큰 용도(`kind`)가 함께 들어가므로
//! 한 서명기로 만든 토큰은 다른 서명기에서 해석되지 않습니다.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::config::SignerConfig;
use crate::domain::entities::users::UserId;
use crate::domain::models::token::{TokenClaims, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// 서명 불일치, 구조 오류, 만료
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token encoding failed: {0}")]
    EncodeFailed(String),

    #[error("token expiry must be in the future: {0}")]
    InvalidExpiry(String),
}

pub trait TokenSigner: Send + Sync {
    /// 사용자 ID를 담은 서명 토큰 발급. 만료 시각은 서명기 자신의 정책을 따릅니다.
    fn encode_token(&self, user_id: UserId) -> Result<String, TokenError>;

    /// 서명과 만료를 검증하고 사용자 ID를 돌려줍니다.
    fn decode_token(&self, token: &str) -> Result<UserId, TokenError>;

    /// 지금 발급하는 토큰의 만료 시각. 표현 범위를 넘으면 실패합니다.
    fn expires_at(&self, issued_at: DateTime<Utc>) -> Result<DateTime<Utc>, TokenError>;
}

/// HS256 JWT 서명기
pub struct JwtTokenSigner {
    kind: TokenKind,
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenSigner {
    pub fn new(kind: TokenKind, config: &SignerConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            kind,
            ttl: config.ttl,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    pub fn access(config: &SignerConfig) -> Self {
        Self::new(TokenKind::Access, config)
    }

    pub fn refresh(config: &SignerConfig) -> Self {
        Self::new(TokenKind::Refresh, config)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    fn encode_claims(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodeFailed(e.to_string()))
    }
}

impl TokenSigner for JwtTokenSigner {
    fn encode_token(&self, user_id: UserId) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            kind: self.kind,
            iat: now.timestamp(),
            exp: self.expires_at(now)?.timestamp(),
        };

        self.encode_claims(&claims)
    }

    fn decode_token(&self, token: &str) -> Result<UserId, TokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::InvalidToken("토큰이 만료되었습니다".to_string()),
                ErrorKind::InvalidSignature => TokenError::InvalidToken("서명이 일치하지 않습니다".to_string()),
                _ => TokenError::InvalidToken(format!("토큰 검증 실패: {e}")),
            })?;

        if claims.kind != self.kind {
            return Err(TokenError::InvalidToken(format!(
                "{:?} 토큰이 필요하지만 {:?} 토큰을 받았습니다",
                self.kind, claims.kind
            )));
        }

        claims
            .sub
            .parse::<UserId>()
            .map_err(|_| TokenError::InvalidToken(format!("잘못된 sub 클레임: {}", claims.sub)))
    }

    fn expires_at(&self, issued_at: DateTime<Utc>) -> Result<DateTime<Utc>, TokenError> {
        issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::EncodeFailed(format!("토큰 수명이 너무 깁니다: {}", self.ttl)))
    }
}
