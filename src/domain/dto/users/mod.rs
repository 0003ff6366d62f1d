//! 사용자 프로필 조회/수정 DTO

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::users::{User, UserId};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 20, message = "사용자 이름은 3~20자여야 합니다"))]
    pub name: String,
}

/// 다른 사용자에게 보여지는 프로필
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: String,
    pub last_login: String,
}

/// 본인 프로필 (권한 포함)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurUserDto {
    #[serde(flatten)]
    pub user: UserDto,
    pub permission: String,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id(),
            name: user.name().to_string(),
            email: user.email().to_string(),
            avatar: user.avatar().to_string(),
            created_at: user.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
            last_login: user.last_login().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

impl From<&User> for CurUserDto {
    fn from(user: &User) -> Self {
        Self {
            user: UserDto::from(user),
            permission: user.permission().to_string(),
        }
    }
}
