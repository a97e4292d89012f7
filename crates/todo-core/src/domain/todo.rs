//! 할 일(task) 도메인 타입.
//!
//! 이 모듈은 할 일의 진행 상태를 정의합니다:
//! - `TodoState` - 할 일의 수명 주기 상태

use serde::{Deserialize, Serialize};

/// 할 일의 수명 주기 상태.
///
/// 와이어 및 DB 표현은 모두 소문자 문자열을 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx-support",
    sqlx(type_name = "todo_state", rename_all = "lowercase")
)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum TodoState {
    /// 초안 (아직 착수 대상 아님)
    Draft,
    /// 할 일 목록에 등록됨
    Todo,
    /// 진행 중
    Doing,
    /// 완료됨
    Done,
    /// 휴지통으로 이동됨
    Trash,
}

impl TodoState {
    /// 작업이 아직 진행될 수 있는 상태인지 확인합니다.
    pub fn is_active(&self) -> bool {
        matches!(self, TodoState::Todo | TodoState::Doing)
    }

    /// 더 이상 작업하지 않는 상태인지 확인합니다.
    pub fn is_closed(&self) -> bool {
        matches!(self, TodoState::Done | TodoState::Trash)
    }
}

impl std::fmt::Display for TodoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TodoState::Draft => write!(f, "draft"),
            TodoState::Todo => write!(f, "todo"),
            TodoState::Doing => write!(f, "doing"),
            TodoState::Done => write!(f, "done"),
            TodoState::Trash => write!(f, "trash"),
        }
    }
}

impl std::str::FromStr for TodoState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(TodoState::Draft),
            "todo" => Ok(TodoState::Todo),
            "doing" => Ok(TodoState::Doing),
            "done" => Ok(TodoState::Done),
            "trash" => Ok(TodoState::Trash),
            _ => Err(format!("unknown todo state: {}", s)),
        }
    }
}
