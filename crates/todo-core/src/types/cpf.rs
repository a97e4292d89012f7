//! CPF(브라질 개인 납세자 번호) 타입.
//!
//! CPF는 11자리 숫자이며 마지막 두 자리가 체크 디지트입니다.
//! 이 모듈은 검증을 통과한 값만 담을 수 있는 [`Cpf`] 타입을 제공합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// CPF 검증 에러.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpfError {
    /// 11자리 ASCII 숫자가 아님
    #[error("CPF는 정확히 11자리 숫자여야 합니다")]
    InvalidFormat,
    /// 모든 자리가 동일한 숫자 (체크섬은 통과하지만 발급되지 않는 번호)
    #[error("모든 자리가 같은 CPF는 유효하지 않습니다")]
    RepeatedDigits,
    /// 체크 디지트 불일치
    #[error("CPF 체크 디지트가 일치하지 않습니다")]
    CheckDigitMismatch,
}

/// 검증된 CPF.
///
/// [`Cpf::parse`]를 통해서만 생성할 수 있으므로 인스턴스가 존재한다면
/// 체크섬까지 통과한 값임이 보장됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// 문자열을 검증하여 CPF를 생성합니다.
    ///
    /// 입력은 구분 기호 없이 정확히 11자리 숫자여야 합니다.
    /// 형식이 맞지 않으면 체크섬 계산 없이 즉시 거부합니다.
    pub fn parse(input: &str) -> Result<Self, CpfError> {
        if input.len() != 11 || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CpfError::InvalidFormat);
        }

        let digits: Vec<u32> = input.bytes().map(|b| u32::from(b - b'0')).collect();

        // "11111111111" 같은 반복 숫자는 체크섬을 통과하지만 무효로 취급
        if digits.iter().all(|&d| d == digits[0]) {
            return Err(CpfError::RepeatedDigits);
        }

        let first = check_digit(&digits[..9], 10);
        let second = check_digit(&digits[..10], 11);

        if digits[9] != first || digits[10] != second {
            return Err(CpfError::CheckDigitMismatch);
        }

        Ok(Self(input.to_string()))
    }

    /// 숫자 11자리 문자열 표현을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 내부 문자열을 소비해 반환합니다.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// 가중합 모듈로 11 방식의 체크 디지트 계산.
///
/// 가중치는 `start_weight`에서 2까지 내림차순으로 각 자리에 곱합니다.
/// 나머지가 0 또는 1이면 체크 디지트는 0, 그 외에는 `11 - 나머지`입니다.
fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Cpf {
    type Err = CpfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}
