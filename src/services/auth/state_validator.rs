//! OAuth2 state 검증
//!
//! 배포 전체가 공유하는 정적 state 값과 콜백으로 돌아온 값을 정확히 비교합니다.
//! 요청별 nonce가 아니므로 거친 수준의 교차 사이트 위조만 막고, 이미 관찰된
//! 유효 콜백의 재전송은 막지 못합니다. 더 강한 보장이 필요하면 세션별 nonce를
//! 바깥 계층에서 덧붙여야 합니다.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid OAuth2 state")]
pub struct InvalidState;

#[derive(Clone)]
pub struct StateValidator {
    expected: String,
}

impl StateValidator {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    /// 인가 URL에 실어 보낼 state 값
    pub fn state(&self) -> &str {
        &self.expected
    }

    pub fn validate(&self, received: &str) -> Result<(), InvalidState> {
        // 빈 기대값은 어떤 입력과도 일치시키지 않는다
        if self.expected.is_empty() || received.is_empty() {
            return Err(InvalidState);
        }

        if constant_time_eq(self.expected.as_bytes(), received.as_bytes()) {
            Ok(())
        } else {
            Err(InvalidState)
        }
    }
}

impl std::fmt::Debug for StateValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateValidator").finish_non_exhaustive()
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
