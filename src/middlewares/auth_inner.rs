//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::registry::ServiceLocator;
use crate::domain::entities::users::{Permission, UserId};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::{AppError, AppResult};
use crate::services::auth::AuthService;
use crate::services::users::UserService;

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub required_permission: Option<Permission>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let required_permission = self.required_permission;

        Box::pin(async move {
            let user_id = match authenticate(&req, required_permission).await {
                Ok(user_id) => user_id,
                Err(err) => {
                    log::warn!("인증 실패: {} {} ({})", req.method(), req.path(), err);
                    let response = err.error_response();
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthenticatedUser { user_id });
            log::debug!("인증 성공: 사용자 ID {}", user_id);

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

async fn authenticate(req: &ServiceRequest, required: Option<Permission>) -> AppResult<UserId> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let token = bearer_token(header)?;

    let user_id = ServiceLocator::get::<AuthService>()?.verify_access_token(token)?;

    if let Some(required) = required {
        let permission = ServiceLocator::get::<UserService>()?
            .permission_of(user_id)
            .await
            .map_err(|e| match e {
                // 토큰은 유효하지만 계정이 사라진 경우
                AppError::NotFound(_) => AppError::Unauthorized("사용자를 찾을 수 없습니다".to_string()),
                other => other,
            })?;

        if !permission.has_permission(required) {
            log::warn!("권한 부족: 사용자 ID {} ({}), 필요 권한: {}", user_id, permission, required);
            return Err(AppError::Forbidden("접근 권한이 부족합니다".to_string()));
        }
    }

    Ok(user_id)
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출
fn bearer_token(header: Option<&str>) -> AppResult<&str> {
    let header = header
        .ok_or_else(|| AppError::Unauthorized("Authorization 헤더가 없습니다".to_string()))?;

    match header.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::Unauthorized("Bearer 토큰 형식이 아닙니다".to_string())),
    }
}
