//! 데이터 액세스 계층
//!
//! MongoDB를 주 저장소로 사용하고, ID 조회에는 Redis 캐시를 둡니다.

pub mod users;
