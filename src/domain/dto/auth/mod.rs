//! OAuth2 로그인/콜백 요청과 응답

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::models::token::token::AuthToken;

/// 로그인 흐름 입력
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub provider: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub redirect_url: String,
}

/// 콜백 흐름 입력
#[derive(Debug, Clone)]
pub struct CallbackCommand {
    pub provider: String,
    pub code: String,
    pub state: String,
}

/// 프로바이더가 리다이렉트하며 붙여 주는 쿼리 파라미터
#[derive(Debug, Deserialize, Validate)]
pub struct OAuthCallbackQuery {
    #[serde(default)]
    #[validate(length(min = 1, message = "Authorization code가 필요합니다"))]
    pub code: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "State가 필요합니다"))]
    pub state: String,

    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl From<AuthToken> for CallbackResponse {
    fn from(token: AuthToken) -> Self {
        Self {
            expires_in: token.expires_in(),
            access_token: token.access_token().to_string(),
            refresh_token: token.refresh_token().to_string(),
            token_type: "Bearer".to_string(),
        }
    }
}
