//! OAuth2 HTTP Handlers
//!
//! - `GET /api/v1/oauth2/{provider}/login`: 프로바이더 인가 URL 반환
//! - `GET /api/v1/oauth2/{provider}/callback`: 인가 코드로 로그인 완료, JWT 토큰 쌍 반환
use actix_web::{get, web, HttpResponse};
use validator::Validate;

use crate::core::registry::ServiceLocator;
use crate::domain::dto::auth::{CallbackCommand, CallbackResponse, LoginCommand, OAuthCallbackQuery};
use crate::domain::dto::ApiResponse;
use crate::errors::AppError;
use crate::services::auth::AuthService;

#[get("/{provider}/login")]
pub async fn oauth_login(provider: web::Path<String>) -> Result<HttpResponse, AppError> {
    let auth_service = ServiceLocator::get::<AuthService>()?;

    let response = auth_service.login(&LoginCommand {
        provider: provider.into_inner(),
    })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

#[get("/{provider}/callback")]
pub async fn oauth_callback(
    provider: web::Path<String>,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let provider = provider.into_inner();
    let query = query.into_inner();
    let auth_service = ServiceLocator::get::<AuthService>()?;

    // 사용자가 동의를 거부했거나 프로바이더 측 오류. 프로바이더 문구는 로그에만 남긴다
    if let Some(error) = &query.error {
        let provider = auth_service.configured_provider(&provider)?;
        log::warn!(
            "{} OAuth 에러: {} - {}",
            provider,
            error,
            query.error_description.as_deref().unwrap_or("-")
        );
        return Err(AppError::Unauthorized("authorization was denied".to_string()));
    }

    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let token = auth_service
        .callback(&CallbackCommand {
            provider,
            code: query.code,
            state: query.state,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(CallbackResponse::from(token))))
}
