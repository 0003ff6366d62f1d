//! 사용자 권한 레벨

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::user::UserError;

/// 정수 레벨로 비교되는 전순서 권한
///
/// `reader(1) < creator(2) < admin(3)`. 집합 기반 ACL이 아닙니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    #[default]
    Reader = 1,
    Creator = 2,
    Admin = 3,
}

impl Permission {
    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn has_permission(&self, required: Permission) -> bool {
        self.level() >= required.level()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Reader => "reader",
            Permission::Creator => "creator",
            Permission::Admin => "admin",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reader" => Ok(Permission::Reader),
            "creator" => Ok(Permission::Creator),
            "admin" => Ok(Permission::Admin),
            other => Err(UserError::InvalidPermission(other.to_string())),
        }
    }
}
