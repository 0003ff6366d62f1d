//! 캐싱 계층 모듈
//!
//! Redis 기반 JSON 캐시를 제공합니다. 사용자 저장소의 ID 조회가
//! read-through 캐시로 이 클라이언트를 사용합니다.
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new().await?;
//! cache.set_with_expiry("user:id:42", &doc, 600).await?;
//! let cached: Option<UserDocument> = cache.get("user:id:42").await?;
//! ```
//!
//! # 환경 설정
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
