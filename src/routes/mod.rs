//! API 라우트 설정 모듈
//!
//! | 메서드 | 경로 | 인증 |
//! |--------|------|------|
//! | GET | `/health` | - |
//! | GET | `/api/v1/oauth2/{provider}/login` | - |
//! | GET | `/api/v1/oauth2/{provider}/callback` | - |
//! | POST | `/api/v1/token/refresh` | - (리프레시 토큰 본문) |
//! | GET | `/api/v1/user/current` | Bearer |
//! | GET | `/api/v1/user/{user_id}` | Bearer |
//! | PATCH | `/api/v1/user` | Bearer |
//!
//! ```rust,ignore
//! App::new().configure(configure_all_routes)
//! ```

use actix_web::web;
use serde_json::json;

use crate::domain::entities::users::Permission;
use crate::handlers;
use crate::middlewares::AuthMiddleware;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    configure_oauth_routes(cfg);
    configure_token_routes(cfg);
    configure_user_routes(cfg);
}

fn configure_oauth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/oauth2")
            .service(handlers::auth::oauth_login)
            .service(handlers::auth::oauth_callback),
    );
}

fn configure_token_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1/token").service(handlers::token_handlers::refresh_token_handler));
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    // 삭제된 계정의 토큰을 걸러내기 위해 사용자 레코드까지 확인
    cfg.service(
        web::scope("/api/v1/user")
            .wrap(AuthMiddleware::required_with_permission(Permission::Reader))
            .service(handlers::users::get_current_user)
            .service(handlers::users::update_user)
            .service(handlers::users::get_user),
    );
}

#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
