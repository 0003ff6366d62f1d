//! # Service Registry
//!
//! 타입을 키로 하는 프로세스 전역 인스턴스 저장소입니다. `main`이 시작 시점에
//! 조립한 서비스를 등록하고, HTTP 핸들러와 미들웨어가 꺼내 씁니다.
//!
//! 서비스 자신은 이 저장소를 읽지 않습니다. 의존성은 모두 생성자로 주입됩니다.
//!
//! ```rust,ignore
//! use crate::core::registry::ServiceLocator;
//!
//! ServiceLocator::set(Arc::new(auth_service));
//!
//! let auth_service = ServiceLocator::get::<AuthService>()?;
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::errors::AppError;

pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(|| ServiceLocator {
    instances: RwLock::new(HashMap::new()),
});

impl ServiceLocator {
    /// 같은 타입이 이미 있으면 교체합니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        log::info!("📦 Registering: {}", short_type_name::<T>());

        LOCATOR
            .instances
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        LOCATOR
            .instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    /// 등록되지 않은 타입은 설정 오류로 취급합니다.
    pub fn get<T: 'static + Send + Sync>() -> Result<Arc<T>, AppError> {
        Self::try_get::<T>().ok_or_else(|| {
            AppError::ConfigError(format!("{} is not registered", short_type_name::<T>()))
        })
    }
}

fn short_type_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    name.rsplit("::").next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OnlyUsedHere(u32);
    struct NeverRegistered;

    #[test]
    fn test_set_and_get() {
        ServiceLocator::set(Arc::new(OnlyUsedHere(7)));
        assert_eq!(ServiceLocator::get::<OnlyUsedHere>().unwrap().0, 7);

        ServiceLocator::set(Arc::new(OnlyUsedHere(8)));
        assert_eq!(ServiceLocator::try_get::<OnlyUsedHere>().unwrap().0, 8);
    }

    #[test]
    fn test_missing_type() {
        assert!(ServiceLocator::try_get::<NeverRegistered>().is_none());
        assert!(matches!(
            ServiceLocator::get::<NeverRegistered>(),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<OnlyUsedHere>(), "OnlyUsedHere");
    }
}
