//! 프로바이더 응답을 정규화한 사용자 정보

use serde::Deserialize;

use super::provider::Provider;
use crate::services::auth::identity_provider::ProviderError;

/// 외부 프로바이더에서 받은 사용자 정보 (불변 값 객체)
///
/// 콜백 한 번에 한 번만 소비되며 저장되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUserInfo {
    id: String,
    name: String,
    email: String,
    avatar: String,
    provider: Provider,
}

impl ProviderUserInfo {
    /// 외부 식별자가 비어 있으면 `InvalidUserInfo`로 실패합니다.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        avatar: impl Into<String>,
        provider: Provider,
    ) -> Result<Self, ProviderError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ProviderError::InvalidUserInfo(format!(
                "{} 사용자 ID가 비어 있습니다",
                provider
            )));
        }

        Ok(Self {
            id,
            name: name.into(),
            email: email.into(),
            avatar: avatar.into(),
            provider,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }
}

/// 토큰 엔드포인트가 돌려준 프로바이더 액세스 토큰
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl ProviderToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: Some("bearer".to_string()),
            refresh_token: None,
            expires_in: None,
            scope: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_rejected() {
        let result = ProviderUserInfo::new("", "alice", "a@example.com", "", Provider::Github);
        assert!(matches!(result, Err(ProviderError::InvalidUserInfo(_))));

        let result = ProviderUserInfo::new("   ", "alice", "a@example.com", "", Provider::Google);
        assert!(matches!(result, Err(ProviderError::InvalidUserInfo(_))));
    }

    #[test]
    fn test_accessors() {
        let info = ProviderUserInfo::new(
            "42",
            "alice",
            "a@example.com",
            "https://avatars.example.com/42",
            Provider::Github,
        )
        .unwrap();

        assert_eq!(info.id(), "42");
        assert_eq!(info.name(), "alice");
        assert_eq!(info.email(), "a@example.com");
        assert_eq!(info.avatar(), "https://avatars.example.com/42");
        assert_eq!(info.provider(), Provider::Github);
    }
}
