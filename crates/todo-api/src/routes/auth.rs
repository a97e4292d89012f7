//! 인증 API 라우트
//!
//! 폼 기반 로그인으로 JWT 액세스 토큰을 발급합니다.
//!
//! # 엔드포인트
//!
//! - `POST /auth/token` - 로그인 및 액세스 토큰 발급

use axum::{extract::State, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::auth::{create_access_token, verify_password};
use crate::error::{ApiError, ApiResult, ErrorDetail};
use crate::metrics::record_login_attempt;
use crate::repository::UserRepository;
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 로그인 폼 (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginForm {
    /// 로그인 사용자명
    pub username: String,
    /// 비밀번호 평문
    pub password: String,
}

/// 액세스 토큰 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT 액세스 토큰
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /auth/token - 로그인 및 액세스 토큰 발급
///
/// 계정이 없는 경우와 비밀번호가 틀린 경우 모두 같은 400 응답을 반환하여
/// 사용자명 존재 여부를 노출하지 않습니다.
#[utoipa::path(
    post,
    path = "/auth/token",
    request_body(
        content = LoginForm,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "로그인 성공", body = TokenResponse),
        (status = 400, description = "잘못된 사용자명 또는 비밀번호", body = ErrorDetail)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    info!("로그인 시도: {}", form.username);

    let user = UserRepository::find_by_username(&state.db_pool, &form.username)
        .await?
        .ok_or_else(|| {
            warn!("로그인 실패 (계정 없음): {}", form.username);
            record_login_attempt("failure");
            ApiError::InvalidCredentials
        })?;

    match verify_password(&form.password, &user.password) {
        Ok(true) => {}
        Ok(false) => {
            warn!("로그인 실패 (비밀번호 불일치): {}", form.username);
            record_login_attempt("failure");
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => {
            error!("비밀번호 검증 불가: {}", e);
            return Err(ApiError::Internal(format!("비밀번호 검증 실패: {e}")));
        }
    }

    // 토큰 subject는 이메일을 사용
    let access_token = create_access_token(&user.email, chrono::Utc::now(), &state.auth)
        .map_err(|e| ApiError::Internal(format!("토큰 발급 실패: {e}")))?;

    record_login_attempt("success");
    info!("로그인 성공: {} - 액세스 토큰 발급", form.username);

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

// ================================================================================================
// Router
// ================================================================================================

/// 인증 라우터 생성
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/token", post(login))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::state::create_test_state;

    fn test_app() -> Router {
        Router::new()
            .nest("/auth", auth_router())
            .with_state(Arc::new(create_test_state()))
    }

    #[tokio::test]
    async fn test_login_rejects_json_body() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/token")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"username":"alice","password":"secret"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_login_rejects_incomplete_form() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/auth/token")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("username=alice"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[test]
    fn test_token_response_shape() {
        let token = TokenResponse {
            access_token: "abc".to_string(),
            token_type: "Bearer".to_string(),
        };

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "Bearer");
    }
}
