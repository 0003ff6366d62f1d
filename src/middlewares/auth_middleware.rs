//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 Bearer 액세스 토큰을 검증하고, 필요하면
//! 사용자의 권한 레벨까지 확인합니다.
//!
//! ```rust,ignore
//! web::scope("/user")
//!     .wrap(AuthMiddleware::required())
//!
//! web::scope("/admin")
//!     .wrap(AuthMiddleware::required_with_permission(Permission::Admin))
//! ```

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::domain::entities::users::Permission;
use crate::middlewares::auth_inner::AuthMiddlewareService;

pub struct AuthMiddleware {
    required_permission: Option<Permission>,
}

impl AuthMiddleware {
    /// 유효한 액세스 토큰만 요구
    pub fn required() -> Self {
        Self {
            required_permission: None,
        }
    }

    /// 토큰과 함께 최소 권한 레벨을 요구. 사용자를 저장소에서 한 번 조회합니다.
    pub fn required_with_permission(permission: Permission) -> Self {
        Self {
            required_permission: Some(permission),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            required_permission: self.required_permission,
        }))
    }
}
