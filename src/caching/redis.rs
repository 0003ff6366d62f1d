//! # Redis 캐시 클라이언트
//!
//! 값은 JSON 문자열로 저장됩니다. 모든 연산은 멀티플렉싱 연결을 사용하므로
//! 단일 TCP 연결에서 여러 요청이 동시에 처리됩니다.

use std::env;

use log::info;
use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};

use crate::errors::AppError;

#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn serde_failure(stage: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, stage, e.to_string()))
}

impl RedisClient {
    pub async fn new() -> Result<Self, AppError> {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        Self::connect(&redis_url).await
    }

    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|e| AppError::RedisError(format!("Redis URL 오류: {e}")))?;

        // PING으로 서버 가용성 확인
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::RedisError(format!("Redis 연결 실패: {e}")))?;
        redis::cmd("PING")
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| AppError::RedisError(format!("Redis PING 실패: {e}")))?;

        info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| serde_failure("Deserialization failed", e)),
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: u64) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value).map_err(|e| serde_failure("Serialization failed", e))?;
        conn.set_ex(key, json, seconds).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }
}
