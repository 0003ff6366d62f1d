//! 사용자 프로필 핸들러
//!
//! 모든 엔드포인트는 [`AuthMiddleware`](crate::middlewares::AuthMiddleware) 뒤에 놓입니다.
use actix_web::{get, patch, web, HttpResponse};
use validator::Validate;

use crate::core::registry::ServiceLocator;
use crate::domain::dto::users::UpdateUserRequest;
use crate::domain::dto::ApiResponse;
use crate::domain::entities::users::UserId;
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::users::UserService;

#[get("/current")]
pub async fn get_current_user(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let user_service = ServiceLocator::get::<UserService>()?;
    let info = user_service.get_current_user_info(user.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(info)))
}

#[get("/{user_id}")]
pub async fn get_user(
    _user: AuthenticatedUser,
    user_id: web::Path<UserId>,
) -> Result<HttpResponse, AppError> {
    let user_service = ServiceLocator::get::<UserService>()?;
    let info = user_service.get_user_info(user_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(info)))
}

#[patch("")]
pub async fn update_user(
    user: AuthenticatedUser,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user_service = ServiceLocator::get::<UserService>()?;
    let info = user_service.update_user_name(user.user_id, &payload.name).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(info, "사용자 이름이 변경되었습니다")))
}
