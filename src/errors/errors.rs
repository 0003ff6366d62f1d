//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 각 컴포넌트(프로바이더, 토큰 서명기, 사용자 저장소, 식별자 조정기)는
//! 자신만의 `thiserror` 에러를 가지고, HTTP 경계에 도달하기 전에
//! 이 모듈의 [`AppError`]로 명시적으로 변환됩니다.
//!
//! ## 분류
//!
//! | 종류 | HTTP 상태 | 비고 |
//! |------|-----------|------|
//! | `InvalidProvider` | 400 | 알 수 없거나 설정되지 않은 프로바이더 |
//! | `ValidationError` | 400 | 사용자 이름/이메일 등 로컬 데이터 검증 실패 |
//! | `Unauthorized` | 401 | state 불일치, 인가 코드 거부, 토큰 검증 실패 |
//! | `Forbidden` | 403 | 권한 레벨 부족 |
//! | `NotFound` | 404 | 리소스 없음 |
//! | 그 외 | 500 | 운영자용 에러, 응답 본문에는 상세 내용을 싣지 않음 |
//!
//! ```rust,ignore
//! use crate::errors::errors::AppError;
//!
//! let provider: Provider = raw
//!     .parse()
//!     .map_err(|e: UnknownProvider| AppError::InvalidProvider(e.0))?;
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// 자동으로 HTTP 응답으로 변환되어 클라이언트에게 전달됩니다.
/// 5xx 계열은 응답 본문에 내부 메시지를 노출하지 않습니다.
#[derive(Error, Debug)]
pub enum AppError {
    /// 알 수 없거나 설정되지 않은 OAuth2 프로바이더 (400 Bad Request)
    #[error("Invalid OAuth2 provider: {0}")]
    InvalidProvider(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 설정 값 누락 또는 잘못된 설정 (500 Internal Server Error)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 에러에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::InvalidProvider(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        self.status()
    }

    /// HTTP 에러 응답을 생성합니다.
    ///
    /// 서버 에러의 상세 내용은 로그로만 남기고 클라이언트에게는 일반 메시지를 보냅니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status();

        let message = if status.is_server_error() {
            log::error!("요청 처리 실패: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        actix_web::HttpResponse::build(status).json(serde_json::json!({
            "error": message
        }))
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::body::MessageBody;
    use actix_web::http::StatusCode;

    #[test]
    fn test_invalid_provider_response() {
        let error = AppError::InvalidProvider("gitlab".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_response() {
        let error = AppError::Unauthorized("invalid state".to_string());
        assert_eq!(error.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_forbidden_response() {
        let error = AppError::Forbidden("admin required".to_string());
        assert_eq!(error.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_validation_and_not_found_responses() {
        assert_eq!(
            AppError::ValidationError("name too short".to_string()).error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("user 7".to_string()).error_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let error = AppError::InternalError("mongo timeout on users".to_string());
        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = response.into_body().try_into_bytes().unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Internal server error"));
        assert!(!text.contains("mongo timeout"));
    }

    #[test]
    fn test_config_error_is_server_error() {
        let error = AppError::ConfigError("JWT secrets must differ".to_string());
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
