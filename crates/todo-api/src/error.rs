//! 통합 API 에러 타입.
//!
//! 모든 엔드포인트는 실패 시 `{"detail": "..."}` 형태의 JSON 본문을 반환합니다.
//! 인증 관련 에러 메시지는 실패 원인(사용자 없음/비밀번호 불일치 등)을
//! 구분하지 않는 단일 문구를 사용합니다.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "detail": "User not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// 사람이 읽을 수 있는 에러 설명
    pub detail: String,
}

impl ErrorDetail {
    /// 에러 본문 생성.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// API 핸들러 공통 에러.
///
/// `Display` 출력이 그대로 응답의 `detail` 필드가 됩니다 (5xx 제외).
#[derive(Debug, Error)]
pub enum ApiError {
    /// 로그인 실패. 계정 없음과 비밀번호 불일치를 같은 문구로 응답합니다.
    #[error("Incorrect username or password")]
    InvalidCredentials,
    /// 토큰 검증 실패. 만료/서명 오류/형식 오류를 같은 문구로 응답합니다.
    #[error("Could not validate credentials")]
    Unauthorized,
    /// 다른 사용자의 리소스에 대한 쓰기 시도
    #[error("Not enough permissions")]
    Forbidden,
    /// 사용자 조회 실패
    #[error("User not found")]
    UserNotFound,
    /// 할 일 조회 실패 (타인 소유 포함)
    #[error("Task not found.")]
    TaskNotFound,
    /// 고유 필드 충돌 (username/email/CPF 중복)
    #[error("{0}")]
    Conflict(String),
    /// CPF 체크섬 또는 형식 위반
    #[error("Invalid CPF")]
    InvalidCpf,
    /// 요청 본문 스키마 위반
    #[error("{0}")]
    Validation(String),
    /// 데이터베이스 오류
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),
    /// 기타 내부 오류
    #[error("내부 오류: {0}")]
    Internal(String),
}

impl ApiError {
    /// 이 에러에 대응하는 HTTP 상태 코드.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Conflict(_) | ApiError::InvalidCpf => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::UserNotFound | ApiError::TaskNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 5xx는 내부 사정을 응답에 싣지 않고 로그로만 남김
        let detail = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed with internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(ErrorDetail::new(detail));

        match self {
            // 401은 WWW-Authenticate 헤더를 동반해야 함
            ApiError::Unauthorized => {
                (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn detail_of(response: Response) -> ErrorDetail {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::TaskNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::InvalidCpf.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Validation("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_detail_body_shape() {
        let response = ApiError::UserNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let detail = detail_of(response).await;
        assert_eq!(detail.detail, "User not found");
    }

    #[tokio::test]
    async fn test_unauthorized_carries_www_authenticate() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let detail = detail_of(response).await;
        assert_eq!(detail.detail, "Could not validate credentials");
    }

    #[tokio::test]
    async fn test_internal_errors_do_not_leak() {
        let response = ApiError::Internal("secret connection string".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let detail = detail_of(response).await;
        assert_eq!(detail.detail, "Internal server error");
    }

    #[tokio::test]
    async fn test_conflict_message_passthrough() {
        let response = ApiError::Conflict("Username already exists".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let detail = detail_of(response).await;
        assert_eq!(detail.detail, "Username already exists");
    }
}
