//! # Core
//!
//! 프로세스 전역 [`ServiceLocator`](registry::ServiceLocator)를 제공합니다.

pub mod registry;

pub use registry::ServiceLocator;
