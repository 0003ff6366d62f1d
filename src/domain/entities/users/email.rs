//! 이메일 값 객체

use std::fmt;

use serde::Serialize;
use validator::ValidateEmail;

use super::user::UserError;

/// 검증을 통과한 이메일 주소
///
/// 식별자 조정은 이메일을 키로 하므로 비어 있거나 형식이 깨진 값은 만들 수 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(value: &str) -> Result<Self, UserError> {
        let value = value.trim();

        if value.is_empty() {
            return Err(UserError::InvalidEmail("email cannot be empty".to_string()));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(UserError::InvalidEmail(format!("{value}: contains whitespace")));
        }

        if !ValidateEmail::validate_email(&value) {
            return Err(UserError::InvalidEmail(format!("{value}: malformed address")));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
