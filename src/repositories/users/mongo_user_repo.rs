//! # MongoDB 사용자 저장소
//!
//! - `users` 컬렉션에 사용자 문서를 저장하고, `counters` 컬렉션의 `$inc`로
//!   숫자 ID를 발급합니다.
//! - `email`에는 유니크 인덱스가 걸려 있어 동시에 같은 이메일로 가입하면 한쪽이
//!   [`StoreError::Conflict`]로 실패합니다.
//! - ID 조회는 Redis read-through 캐시(`user:id:{id}`, 10분)를 거칩니다.
//!   캐시 오류는 로그만 남기고 DB 결과를 그대로 씁니다.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{info, warn};
use mongodb::bson::{Document, doc};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};
use serde::{Deserialize, Serialize};

use super::user_repo::{StoreError, UserStore};
use crate::caching::redis::RedisClient;
use crate::db::Database;
use crate::domain::entities::users::{Email, Permission, User, UserId};
use crate::domain::models::oauth::Provider;

const USERS_COLLECTION: &str = "users";
const COUNTERS_COLLECTION: &str = "counters";
const CACHE_TTL_SECONDS: u64 = 600;
const DUPLICATE_KEY: i32 = 11000;

/// 저장 형식. 시각은 밀리초 타임스탬프로 보관해 캐시 JSON과 형식을 맞춥니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: i64,
    name: String,
    email: String,
    #[serde(default)]
    avatar: String,
    permission: Permission,
    last_login: i64,
    created_at: i64,
    updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    github_bind_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qq_bind_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_bind_id: Option<String>,
}

impl UserDocument {
    fn from_user(user: &User) -> Result<Self, StoreError> {
        Ok(Self {
            id: to_bson_id(user.id())?,
            name: user.name().to_string(),
            email: user.email().as_str().to_string(),
            avatar: user.avatar().to_string(),
            permission: user.permission(),
            last_login: user.last_login().timestamp_millis(),
            created_at: user.created_at().timestamp_millis(),
            updated_at: user.updated_at().timestamp_millis(),
            github_bind_id: user.bound_id(Provider::Github).map(str::to_string),
            qq_bind_id: user.bound_id(Provider::Qq).map(str::to_string),
            google_bind_id: user.bound_id(Provider::Google).map(str::to_string),
        })
    }

    fn into_user(self) -> Result<User, StoreError> {
        let id = UserId::try_from(self.id)
            .map_err(|_| StoreError::Backend(format!("잘못된 사용자 ID: {}", self.id)))?;
        let email = Email::new(&self.email)
            .map_err(|e| StoreError::Backend(format!("저장된 이메일 손상 (id={id}): {e}")))?;

        Ok(User::reconstruct(
            id,
            self.name,
            email,
            self.avatar,
            self.permission,
            from_millis(self.last_login)?,
            from_millis(self.created_at)?,
            from_millis(self.updated_at)?,
            self.github_bind_id,
            self.qq_bind_id,
            self.google_bind_id,
        ))
    }
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::Backend(format!("잘못된 타임스탬프: {ms}")))
}

fn to_bson_id(id: UserId) -> Result<i64, StoreError> {
    i64::try_from(id).map_err(|_| StoreError::Backend(format!("ID 범위 초과: {id}")))
}

fn bind_field(provider: Provider) -> &'static str {
    match provider {
        Provider::Github => "github_bind_id",
        Provider::Qq => "qq_bind_id",
        Provider::Google => "google_bind_id",
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

fn map_write_error(err: MongoError) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Conflict(err.to_string())
    } else {
        StoreError::Backend(err.to_string())
    }
}

fn backend(err: MongoError) -> StoreError {
    StoreError::Backend(err.to_string())
}

pub struct MongoUserRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl MongoUserRepository {
    pub fn new(db: Arc<Database>, redis: Arc<RedisClient>) -> Self {
        Self { db, redis }
    }

    fn collection(&self) -> Collection<UserDocument> {
        self.db.get_database().collection(USERS_COLLECTION)
    }

    fn cache_key(id: UserId) -> String {
        format!("user:id:{id}")
    }

    /// 인덱스 생성. 서버 시작 시 한 번 호출합니다.
    pub async fn init(&self) -> Result<(), StoreError> {
        let unique = IndexOptions::builder().unique(true).build();
        let mut indexes = vec![
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique)
                .build(),
            IndexModel::builder().keys(doc! { "name": 1 }).build(),
        ];
        for provider in Provider::ALL {
            let mut keys = Document::new();
            keys.insert(bind_field(provider), 1);
            indexes.push(IndexModel::builder().keys(keys).build());
        }

        self.collection().create_indexes(indexes).await.map_err(backend)?;
        info!("✅ users 컬렉션 인덱스 준비 완료");
        Ok(())
    }

    async fn next_id(&self) -> Result<i64, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .db
            .get_database()
            .collection::<Document>(COUNTERS_COLLECTION)
            .find_one_and_update(doc! { "_id": USERS_COLLECTION }, doc! { "$inc": { "seq": 1_i64 } })
            .with_options(options)
            .await
            .map_err(backend)?
            .ok_or_else(|| StoreError::Backend("ID 카운터를 읽을 수 없습니다".to_string()))?;

        counter
            .get_i64("seq")
            .map_err(|e| StoreError::Backend(format!("ID 카운터 형식 오류: {e}")))
    }

    async fn find_one(&self, filter: Document) -> Result<User, StoreError> {
        self.collection()
            .find_one(filter)
            .await
            .map_err(backend)?
            .ok_or(StoreError::NotFound)?
            .into_user()
    }

    async fn invalidate(&self, id: UserId) {
        if let Err(e) = self.redis.del(&Self::cache_key(id)).await {
            warn!("사용자 캐시 무효화 실패 (id={id}): {e}");
        }
    }
}

#[async_trait]
impl UserStore for MongoUserRepository {
    async fn save(&self, user: &mut User) -> Result<(), StoreError> {
        if user.is_persisted() {
            let document = UserDocument::from_user(user)?;
            self.collection()
                .replace_one(doc! { "_id": document.id }, &document)
                .upsert(true)
                .await
                .map_err(map_write_error)?;
            self.invalidate(user.id()).await;
            return Ok(());
        }

        let id = self.next_id().await?;
        let new_id = UserId::try_from(id)
            .map_err(|_| StoreError::Backend(format!("잘못된 카운터 값: {id}")))?;
        user.assign_id(new_id);

        let inserted = match UserDocument::from_user(user) {
            Ok(document) => self.collection().insert_one(&document).await.map_err(map_write_error),
            Err(e) => Err(e),
        };
        if let Err(e) = inserted {
            // 실패한 삽입은 미저장 상태로 되돌린다
            user.assign_id(0);
            return Err(e);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<User, StoreError> {
        let cache_key = Self::cache_key(id);
        match self.redis.get::<UserDocument>(&cache_key).await {
            Ok(Some(cached)) => return cached.into_user(),
            Ok(None) => {}
            Err(e) => warn!("사용자 캐시 조회 실패 (id={id}): {e}"),
        }

        let Ok(bson_id) = i64::try_from(id) else {
            return Err(StoreError::NotFound);
        };
        let document = self
            .collection()
            .find_one(doc! { "_id": bson_id })
            .await
            .map_err(backend)?
            .ok_or(StoreError::NotFound)?;

        if let Err(e) = self.redis.set_with_expiry(&cache_key, &document, CACHE_TTL_SECONDS).await {
            warn!("사용자 캐시 저장 실패 (id={id}): {e}");
        }

        document.into_user()
    }

    async fn find_by_email(&self, email: &Email) -> Result<User, StoreError> {
        self.find_one(doc! { "email": email.as_str() }).await
    }

    async fn find_by_name(&self, name: &str) -> Result<User, StoreError> {
        self.find_one(doc! { "name": name }).await
    }

    async fn find_by_bound_id(&self, provider: Provider, external_id: &str) -> Result<User, StoreError> {
        let mut filter = Document::new();
        filter.insert(bind_field(provider), external_id);
        self.find_one(filter).await
    }

    async fn exists(&self, id: UserId) -> Result<bool, StoreError> {
        let Ok(bson_id) = i64::try_from(id) else {
            return Ok(false);
        };
        let count = self
            .collection()
            .count_documents(doc! { "_id": bson_id })
            .await
            .map_err(backend)?;
        Ok(count > 0)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        let bson_id = i64::try_from(id).map_err(|_| StoreError::NotFound)?;
        let result = self
            .collection()
            .delete_one(doc! { "_id": bson_id })
            .await
            .map_err(backend)?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        self.invalidate(id).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_user() -> User {
        let mut user = User::new(
            "alice",
            Email::new("a@example.com").unwrap(),
            "https://avatars.example.com/a",
            Permission::Creator,
        )
        .unwrap();
        user.assign_id(42);
        user.bind(Provider::Github, "gh-7").unwrap();
        user
    }

    #[test]
    fn test_document_layout() {
        let document = UserDocument::from_user(&stored_user()).unwrap();
        let json = serde_json::to_value(&document).unwrap();

        assert_eq!(json["_id"], 42);
        assert_eq!(json["email"], "a@example.com");
        assert_eq!(json["permission"], "creator");
        assert_eq!(json["github_bind_id"], "gh-7");
        assert!(json.get("google_bind_id").is_none());
    }

    #[test]
    fn test_document_restores_user() {
        let user = stored_user();
        let restored = UserDocument::from_user(&user).unwrap().into_user().unwrap();

        assert_eq!(restored.id(), 42);
        assert_eq!(restored.bound_id(Provider::Github), Some("gh-7"));
        assert_eq!(restored.bound_id(Provider::Qq), None);
        assert_eq!(
            restored.created_at().timestamp_millis(),
            user.created_at().timestamp_millis()
        );
    }

    #[test]
    fn test_corrupt_document_is_backend_error() {
        let mut document = UserDocument::from_user(&stored_user()).unwrap();
        document.email = "not-an-email".to_string();
        assert!(matches!(document.into_user(), Err(StoreError::Backend(_))));
    }

    #[test]
    fn test_bind_fields() {
        assert_eq!(bind_field(Provider::Github), "github_bind_id");
        assert_eq!(bind_field(Provider::Google), "google_bind_id");
        assert_eq!(bind_field(Provider::Qq), "qq_bind_id");
    }
}
