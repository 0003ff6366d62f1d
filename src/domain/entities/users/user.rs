//! User Aggregate
//!
//! 사용자 엔티티의 핵심 구현체입니다. 외부 OAuth2 계정 바인딩을 프로바이더별로
//! 하나씩 보관하며, 모든 변경 연산은 `updated_at`을 갱신합니다.
//!
//! # 생성 경로
//!
//! - [`User::new`]: 신규 가입. 이름과 권한을 검증합니다.
//! - [`User::reconstruct`]: 저장소에서 읽어온 필드로 복원합니다. 검증하지 않습니다.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::email::Email;
use super::permission::Permission;
use crate::domain::models::oauth::provider::Provider;

/// 저장소가 부여하는 숫자 ID, `0`은 아직 저장되지 않은 사용자
pub type UserId = u64;

pub const USER_NAME_MIN_LEN: usize = 3;
pub const USER_NAME_MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("invalid user name: {0}")]
    InvalidUserName(String),

    #[error("invalid email: {0}")]
    InvalidEmail(String),

    #[error("invalid permission: {0}")]
    InvalidPermission(String),

    #[error("{0} bind id cannot be empty")]
    EmptyBindId(Provider),
}

/// 사용자 이름 규칙: 3~20자, `[A-Za-z0-9_-]`만 허용
pub fn validate_user_name(name: &str) -> Result<(), UserError> {
    let len = name.chars().count();
    if !(USER_NAME_MIN_LEN..=USER_NAME_MAX_LEN).contains(&len) {
        return Err(UserError::InvalidUserName(format!(
            "length must be between {} and {}",
            USER_NAME_MIN_LEN, USER_NAME_MAX_LEN
        )));
    }

    let allowed = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !allowed {
        return Err(UserError::InvalidUserName(
            "can only contain letters, numbers, underscores and hyphens".to_string(),
        ));
    }

    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: String,
    email: Email,
    avatar: String,
    permission: Permission,
    last_login: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    github_bind_id: Option<String>,
    qq_bind_id: Option<String>,
    google_bind_id: Option<String>,
}

impl User {
    pub fn new(name: &str, email: Email, avatar: &str, permission: Permission) -> Result<Self, UserError> {
        validate_user_name(name)?;

        let now = Utc::now();
        Ok(Self {
            id: 0,
            name: name.to_string(),
            email,
            avatar: avatar.to_string(),
            permission,
            last_login: now,
            created_at: now,
            updated_at: now,
            github_bind_id: None,
            qq_bind_id: None,
            google_bind_id: None,
        })
    }

    /// 저장소 문서로부터 사용자 복원
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: UserId,
        name: String,
        email: Email,
        avatar: String,
        permission: Permission,
        last_login: DateTime<Utc>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        github_bind_id: Option<String>,
        qq_bind_id: Option<String>,
        google_bind_id: Option<String>,
    ) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        Self {
            id,
            name,
            email,
            avatar,
            permission,
            last_login,
            created_at,
            updated_at,
            github_bind_id: non_empty(github_bind_id),
            qq_bind_id: non_empty(qq_bind_id),
            google_bind_id: non_empty(google_bind_id),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn avatar(&self) -> &str {
        &self.avatar
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    pub fn last_login(&self) -> DateTime<Utc> {
        self.last_login
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 프로바이더별 바인딩 ID, 바인딩되지 않았으면 `None`
    pub fn bound_id(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Github => self.github_bind_id.as_deref(),
            Provider::Qq => self.qq_bind_id.as_deref(),
            Provider::Google => self.google_bind_id.as_deref(),
        }
    }

    pub fn update_name(&mut self, name: &str) -> Result<(), UserError> {
        validate_user_name(name)?;
        self.name = name.to_string();
        self.touch();
        Ok(())
    }

    pub fn update_avatar(&mut self, avatar: &str) {
        self.avatar = avatar.to_string();
        self.touch();
    }

    pub fn update_permission(&mut self, permission: Permission) {
        self.permission = permission;
        self.touch();
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login = now;
        self.updated_at = now;
    }

    /// 외부 계정 바인딩. 같은 프로바이더의 기존 값은 덮어씁니다.
    pub fn bind(&mut self, provider: Provider, external_id: &str) -> Result<(), UserError> {
        if external_id.is_empty() {
            return Err(UserError::EmptyBindId(provider));
        }

        let slot = match provider {
            Provider::Github => &mut self.github_bind_id,
            Provider::Qq => &mut self.qq_bind_id,
            Provider::Google => &mut self.google_bind_id,
        };
        *slot = Some(external_id.to_string());
        self.touch();
        Ok(())
    }

    pub fn has_permission(&self, required: Permission) -> bool {
        self.permission.has_permission(required)
    }

    /// 저장 후 저장소가 부여한 ID를 채웁니다.
    pub(crate) fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
