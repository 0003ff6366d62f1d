//! 설정 모듈

pub mod auth_config;
pub mod data_config;

pub use auth_config::*;
pub use data_config::*;
