//! 요청 인증 추출기.
//!
//! Authorization 헤더의 Bearer 토큰을 검증하고, 토큰 주체(email)에
//! 해당하는 사용자 레코드를 조회합니다.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::repository::{User, UserRepository};
use crate::state::AppState;

use super::decode_access_token;

/// 인증된 사용자 추출기.
///
/// 헤더 없음, 형식 오류, 만료, 서명 불일치, 없는 사용자 등 모든 실패가
/// 같은 401 응답으로 수렴합니다. 원인은 debug 로그로만 남습니다.
/// DB 조회 자체가 실패한 경우는 인증 실패가 아니라 500입니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
///     format!("Authenticated user: {}", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);

        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        // Bearer 토큰 형식 확인
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        // 토큰 검증 후 subject(email)로 사용자 조회
        let email = decode_access_token(token, chrono::Utc::now(), &state.auth).map_err(|e| {
            tracing::debug!(error = %e, "Token validation failed");
            ApiError::Unauthorized
        })?;

        let user = UserRepository::find_by_email(&state.db_pool, &email)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Token subject does not match any user");
                ApiError::Unauthorized
            })?;

        Ok(CurrentUser(user))
    }
}
