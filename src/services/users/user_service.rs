//! # 사용자 프로필 서비스
//!
//! 로그인 이후의 프로필 조회, 이름 변경, 권한 확인을 담당합니다.
//! 사용자 생성은 OAuth2 콜백의 식별자 조정 경로에서만 일어납니다.

use std::sync::Arc;

use log::info;

use crate::domain::dto::users::{CurUserDto, UserDto};
use crate::domain::entities::users::{Permission, UserError, UserId};
use crate::errors::{AppError, AppResult};
use crate::repositories::users::UserStore;

pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// 공개 프로필
    pub async fn get_user_info(&self, user_id: UserId) -> AppResult<UserDto> {
        let user = self.store.find_by_id(user_id).await?;
        Ok(UserDto::from(&user))
    }

    /// 본인 프로필 (권한 포함)
    pub async fn get_current_user_info(&self, user_id: UserId) -> AppResult<CurUserDto> {
        let user = self.store.find_by_id(user_id).await?;
        Ok(CurUserDto::from(&user))
    }

    pub async fn update_user_name(&self, user_id: UserId, name: &str) -> AppResult<CurUserDto> {
        let mut user = self.store.find_by_id(user_id).await?;
        user.update_name(name).map_err(validation_error)?;
        self.store.save(&mut user).await?;

        info!("사용자 이름 변경: id={}, name={}", user_id, user.name());
        Ok(CurUserDto::from(&user))
    }

    pub async fn permission_of(&self, user_id: UserId) -> AppResult<Permission> {
        let user = self.store.find_by_id(user_id).await?;
        Ok(user.permission())
    }
}

fn validation_error(err: UserError) -> AppError {
    AppError::ValidationError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::users::{Email, User};
    use crate::repositories::users::InMemoryUserRepository;

    async fn service_with_user() -> (UserService, UserId) {
        let store = Arc::new(InMemoryUserRepository::new());
        let mut user = User::new(
            "alice",
            Email::new("a@example.com").unwrap(),
            "https://avatars.example.com/a",
            Permission::Creator,
        )
        .unwrap();
        store.save(&mut user).await.unwrap();
        (UserService::new(store), user.id())
    }

    #[actix_web::test]
    async fn test_get_user_info() {
        let (service, id) = service_with_user().await;

        let dto = service.get_user_info(id).await.unwrap();
        assert_eq!(dto.user_id, id);
        assert_eq!(dto.name, "alice");
        assert_eq!(dto.email, "a@example.com");

        let current = service.get_current_user_info(id).await.unwrap();
        assert_eq!(current.permission, "creator");
        assert_eq!(current.user.name, "alice");
    }

    #[actix_web::test]
    async fn test_missing_user_is_not_found() {
        let (service, _) = service_with_user().await;
        assert!(matches!(service.get_user_info(404).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.permission_of(404).await, Err(AppError::NotFound(_))));
    }

    #[actix_web::test]
    async fn test_update_user_name() {
        let (service, id) = service_with_user().await;

        let updated = service.update_user_name(id, "alice_kim").await.unwrap();
        assert_eq!(updated.user.name, "alice_kim");
        assert_eq!(service.get_user_info(id).await.unwrap().name, "alice_kim");

        let invalid = service.update_user_name(id, "no spaces").await;
        assert!(matches!(invalid, Err(AppError::ValidationError(_))));
        assert_eq!(service.get_user_info(id).await.unwrap().name, "alice_kim");
    }

    #[actix_web::test]
    async fn test_permission_of() {
        let (service, id) = service_with_user().await;
        assert_eq!(service.permission_of(id).await.unwrap(), Permission::Creator);
    }
}
