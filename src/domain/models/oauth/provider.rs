//! OAuth2 프로바이더 식별자

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 지원하는 외부 OAuth2 프로바이더
///
/// 경로 파라미터 등 외부 입력은 반드시 [`FromStr`]을 거쳐 이 타입으로 바뀐 뒤에만
/// 사용됩니다. 알 수 없는 값은 어떤 부수 효과보다도 먼저 거부됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Github,
    Google,
    Qq,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Github, Provider::Google, Provider::Qq];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Github => "github",
            Provider::Google => "google",
            Provider::Qq => "qq",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 목록에 없는 프로바이더 문자열
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported OAuth2 provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Provider::Github),
            "google" => Ok(Provider::Google),
            "qq" => Ok(Provider::Qq),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}
