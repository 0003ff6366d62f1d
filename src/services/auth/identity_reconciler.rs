//! # 식별자 조정 (Identity Reconciliation)
//!
//! 프로바이더가 알려준 사용자 정보로 로컬 사용자를 찾거나 만들고, 현재
//! 프로바이더의 외부 ID를 바인딩합니다.
//!
//! ## 처리 순서
//!
//! 1. 프로바이더 이메일로 [`Email`] 생성. 실패하면 진행할 수 없습니다.
//! 2. 이메일로 기존 사용자 조회
//!    - 찾음: 로그인 시각 기록 → 바인딩(덮어쓰기) → 저장
//!    - 없음: 이름 검증(실패 시 `User{타임스탬프}`로 대체) → `Reader` 권한으로 생성
//!      → 바인딩 → 저장 → 생성 후크 실행
//!    - 그 밖의 조회 오류: 실패. 없다고 가정하지 않습니다.
//!
//! 조회 키는 이메일뿐입니다. 바인딩 ID는 이미 찾은 사용자에 덮어쓰는 용도로만
//! 쓰입니다.
//!
//! ## 동시 최초 로그인
//!
//! 이메일 유일성은 저장소 제약으로 보장됩니다. 생성 저장이
//! [`StoreError::Conflict`]로 실패하면 다른 요청이 먼저 계정을 만든 것이므로
//! 이메일로 한 번 다시 조회해 "찾음" 경로로 이어갑니다. 이때 생성 후크는
//! 실행하지 않습니다.

use std::sync::Arc;

use chrono::Utc;
use futures_util::future::BoxFuture;
use log::{error, info, warn};
use thiserror::Error;

use crate::domain::entities::users::{validate_user_name, Email, Permission, User, UserError, UserId};
use crate::domain::models::oauth::{Provider, ProviderUserInfo};
use crate::repositories::users::{StoreError, UserStore};

/// 이름 대체값 접두사
pub const FALLBACK_NAME_PREFIX: &str = "User";

/// 신규 사용자 생성 직후 실행되는 후크. 실패는 로그로만 남습니다.
pub type UserCreatedHook = Arc<dyn Fn(UserId) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("provider email rejected: {0}")]
    InvalidEmail(UserError),

    /// "없음" 이외의 조회 실패
    #[error("user lookup failed: {0}")]
    Lookup(StoreError),

    /// 사용자 생성 또는 바인딩 실패
    #[error("user aggregate rejected: {0}")]
    Create(UserError),

    #[error("user persist failed: {0}")]
    Persist(StoreError),
}

pub struct IdentityReconciler {
    store: Arc<dyn UserStore>,
    on_user_created: Option<UserCreatedHook>,
}

impl IdentityReconciler {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            on_user_created: None,
        }
    }

    pub fn with_hook(mut self, hook: UserCreatedHook) -> Self {
        self.on_user_created = Some(hook);
        self
    }

    /// `provider`는 오케스트레이터가 해석한 프로바이더입니다. 바인딩 슬롯은
    /// `info`가 자칭하는 값이 아니라 이 값으로 정해집니다.
    pub async fn reconcile(&self, provider: Provider, info: &ProviderUserInfo) -> Result<User, ReconcileError> {
        let email = Email::new(info.email()).map_err(ReconcileError::InvalidEmail)?;

        match self.store.find_by_email(&email).await {
            Ok(user) => self.link_existing(user, provider, info).await,
            Err(StoreError::NotFound) => self.create(email, provider, info).await,
            Err(e) => Err(ReconcileError::Lookup(e)),
        }
    }

    async fn link_existing(
        &self,
        mut user: User,
        provider: Provider,
        info: &ProviderUserInfo,
    ) -> Result<User, ReconcileError> {
        user.record_login();
        user.bind(provider, info.id()).map_err(ReconcileError::Create)?;
        self.store.save(&mut user).await.map_err(ReconcileError::Persist)?;
        Ok(user)
    }

    async fn create(
        &self,
        email: Email,
        provider: Provider,
        info: &ProviderUserInfo,
    ) -> Result<User, ReconcileError> {
        let name = candidate_name(info.name());
        let mut user = User::new(&name, email.clone(), info.avatar(), Permission::default())
            .map_err(ReconcileError::Create)?;
        user.bind(provider, info.id()).map_err(ReconcileError::Create)?;

        match self.store.save(&mut user).await {
            Ok(()) => {}
            Err(StoreError::Conflict(detail)) => {
                warn!("동시 가입 감지, 기존 계정으로 재조회: {} ({})", email, detail);
                let existing = self
                    .store
                    .find_by_email(&email)
                    .await
                    .map_err(ReconcileError::Lookup)?;
                return self.link_existing(existing, provider, info).await;
            }
            Err(e) => return Err(ReconcileError::Persist(e)),
        }

        info!(
            "신규 사용자 생성: id={}, name={}, provider={}",
            user.id(),
            user.name(),
            provider
        );
        self.run_hook(user.id()).await;
        Ok(user)
    }

    async fn run_hook(&self, user_id: UserId) {
        let Some(hook) = &self.on_user_created else {
            return;
        };
        if let Err(e) = hook(user_id).await {
            error!("사용자 생성 후크 실패 (id={}): {}", user_id, e);
        }
    }
}

/// 프로바이더 표시 이름이 규칙에 맞지 않으면 접두사 + 유닉스 타임스탬프로 대체
fn candidate_name(provider_name: &str) -> String {
    if validate_user_name(provider_name).is_ok() {
        provider_name.to_string()
    } else {
        format!("{}{}", FALLBACK_NAME_PREFIX, Utc::now().timestamp())
    }
}
