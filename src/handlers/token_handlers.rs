//! 토큰 재발급 핸들러
use actix_web::{post, web, HttpResponse};
use validator::Validate;

use crate::core::registry::ServiceLocator;
use crate::domain::dto::tokens::RefreshTokenRequest;
use crate::domain::dto::ApiResponse;
use crate::errors::AppError;
use crate::services::auth::AuthService;

/// 리프레시 토큰으로 새 액세스 토큰 발급
///
/// 리프레시 토큰 자체는 갱신하지 않습니다.
#[post("/refresh")]
pub async fn refresh_token_handler(
    payload: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let auth_service = ServiceLocator::get::<AuthService>()?;
    let response = auth_service.refresh_access_token(&payload.refresh_token)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
