//! 데이터 및 서버 설정 관리 모듈
//!
//! 실행 환경, HTTP 서버 바인딩, 사용자 저장소 선택, 사용자 데이터 디렉토리를 다룹니다.

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        env::var("ENVIRONMENT")
            .map(|v| Self::from_name(&v))
            .unwrap_or(Environment::Production)
    }

    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// 개발용 기본 비밀 값을 허용하는 환경인지
    pub fn allows_insecure_defaults(&self) -> bool {
        matches!(self, Environment::Development | Environment::Test)
    }
}

pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080)
    }

    pub fn host() -> String {
        env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// 사용자 저장소 백엔드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStoreKind {
    Mongo,
    Memory,
}

pub struct StorageConfig;

impl StorageConfig {
    pub fn user_store() -> UserStoreKind {
        Self::user_store_from(env::var("USER_STORE").ok().as_deref())
    }

    pub fn user_store_from(value: Option<&str>) -> UserStoreKind {
        match value.map(str::to_lowercase).as_deref() {
            Some("memory") | Some("in-memory") => UserStoreKind::Memory,
            _ => UserStoreKind::Mongo,
        }
    }

    /// 신규 사용자별 디렉토리가 만들어질 루트
    pub fn user_data_root() -> PathBuf {
        env::var("USER_DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/users"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from_name("development"), Environment::Development);
        assert_eq!(Environment::from_name("DEV"), Environment::Development);
        assert_eq!(Environment::from_name("test"), Environment::Test);
        assert_eq!(Environment::from_name("production"), Environment::Production);
        assert_eq!(Environment::from_name("unknown"), Environment::Production);
    }

    #[test]
    fn test_insecure_defaults_only_outside_production() {
        assert!(Environment::Development.allows_insecure_defaults());
        assert!(Environment::Test.allows_insecure_defaults());
        assert!(!Environment::Staging.allows_insecure_defaults());
        assert!(!Environment::Production.allows_insecure_defaults());
    }

    #[test]
    fn test_user_store_selection() {
        assert_eq!(StorageConfig::user_store_from(None), UserStoreKind::Mongo);
        assert_eq!(StorageConfig::user_store_from(Some("Memory")), UserStoreKind::Memory);
        assert_eq!(StorageConfig::user_store_from(Some("mongo")), UserStoreKind::Mongo);
    }

    #[test]
    fn test_server_config_defaults() {
        if env::var("SERVER_PORT").is_err() {
            assert_eq!(ServerConfig::port(), 8080);
        }

        if env::var("SERVER_HOST").is_err() {
            assert_eq!(ServerConfig::bind_address(), format!("127.0.0.1:{}", ServerConfig::port()));
        }
    }
}
