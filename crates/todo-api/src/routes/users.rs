//! 사용자 API 라우트
//!
//! 회원 가입, 조회, 본인 정보 수정/삭제 API를 제공합니다.
//!
//! # 엔드포인트
//!
//! - `POST /users/` - 회원 가입
//! - `GET /users/` - 사용자 목록 조회
//! - `GET /users/{user_id}` - 사용자 단건 조회
//! - `PUT /users/{user_id}` - 본인 정보 수정 (인증 필요)
//! - `DELETE /users/{user_id}` - 본인 계정 삭제 (인증 필요)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use todo_core::Cpf;

use crate::auth::{hash_password, CurrentUser};
use crate::error::{ApiError, ApiResult, ErrorDetail};
use crate::metrics::record_user_signup;
use crate::repository::{NewUser, User, UserChanges, UserRepository};
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 공개 사용자 정보 (비밀번호 해시와 CPF는 절대 노출하지 않음)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserPublic {
    /// 사용자 ID
    pub id: i64,
    /// 사용자명
    pub username: String,
    /// 이메일
    pub email: String,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
    /// 마지막 수정 시각
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// 회원 가입 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserCreate {
    /// 사용자명 (최대 50자)
    #[validate(length(max = 50, message = "사용자명은 50자를 초과할 수 없습니다"))]
    pub username: String,
    /// 이메일 (최대 50자)
    #[validate(
        email(message = "올바른 이메일 형식이 아닙니다"),
        length(max = 50, message = "이메일은 50자를 초과할 수 없습니다")
    )]
    pub email: String,
    /// 비밀번호 평문 (최소 8자)
    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다"))]
    pub password: String,
    /// CPF (숫자 11자리 문자열)
    #[validate(custom(function = "validate_cpf_shape"))]
    pub cpf: Option<String>,
}

/// 본인 정보 수정 요청. 세 필드 모두 필수입니다.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserUpdate {
    /// 사용자명 (최대 50자)
    #[validate(length(max = 50, message = "사용자명은 50자를 초과할 수 없습니다"))]
    pub username: String,
    /// 이메일 (최대 50자)
    #[validate(
        email(message = "올바른 이메일 형식이 아닙니다"),
        length(max = 50, message = "이메일은 50자를 초과할 수 없습니다")
    )]
    pub email: String,
    /// 새 비밀번호 평문 (최소 8자)
    #[validate(length(min = 8, message = "비밀번호는 8자 이상이어야 합니다"))]
    pub password: String,
}

/// 사용자 목록 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserList {
    /// 사용자 목록
    pub users: Vec<UserPublic>,
}

/// 목록 조회 페이지네이션 쿼리
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersQuery {
    /// 건너뛸 레코드 수 (기본값: 0)
    #[serde(default)]
    pub skip: i64,
    /// 최대 반환 레코드 수 (기본값: 100)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// 단순 메시지 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Message {
    /// 처리 결과 메시지
    pub message: String,
}

fn validate_cpf_shape(value: &str) -> Result<(), ValidationError> {
    if value.len() != 11 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new("invalid_cpf_shape")
            .with_message("CPF는 숫자 11자리여야 합니다".into()));
    }
    Ok(())
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /users/ - 회원 가입
///
/// username, email, CPF는 각각 고유해야 합니다. CPF는 형식 검사 후
/// 체크 디지트까지 검증하며, 누락되거나 체크섬이 틀리면 400을 반환합니다.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = UserCreate,
    responses(
        (status = 201, description = "가입 성공", body = UserPublic),
        (status = 400, description = "중복 계정 또는 잘못된 CPF", body = ErrorDetail),
        (status = 422, description = "요청 본문 검증 실패", body = ErrorDetail)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserPublic>)> {
    payload.validate()?;

    info!("회원 가입 요청: {}", payload.username);

    if UserRepository::username_taken(&state.db_pool, &payload.username, None).await? {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }

    if UserRepository::email_taken(&state.db_pool, &payload.email, None).await? {
        return Err(ApiError::Conflict("Email already exists".to_string()));
    }

    // CPF 누락도 체크섬 실패와 같은 응답으로 처리
    let cpf = match payload.cpf.as_deref() {
        Some(raw) => Cpf::parse(raw).map_err(|e| {
            debug!("CPF 검증 실패: {}", e);
            ApiError::InvalidCpf
        })?,
        None => return Err(ApiError::InvalidCpf),
    };

    if UserRepository::cpf_taken(&state.db_pool, cpf.as_str()).await? {
        return Err(ApiError::Conflict("CPF already exists".to_string()));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(format!("비밀번호 해싱 실패: {e}")))?;

    let user = UserRepository::create(
        &state.db_pool,
        NewUser {
            username: payload.username,
            email: payload.email,
            password_hash,
            cpf: cpf.into_string(),
        },
    )
    .await?;

    record_user_signup();
    info!("회원 가입 완료: id={}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// GET /users/ - 사용자 목록 조회
#[utoipa::path(
    get,
    path = "/users/",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "사용자 목록", body = UserList)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<UserList>> {
    debug!("사용자 목록 조회: skip={} limit={}", query.skip, query.limit);

    let users = UserRepository::list(&state.db_pool, query.skip, query.limit).await?;

    Ok(Json(UserList {
        users: users.into_iter().map(UserPublic::from).collect(),
    }))
}

/// GET /users/{user_id} - 사용자 단건 조회
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "사용자 ID")
    ),
    responses(
        (status = 200, description = "사용자 정보", body = UserPublic),
        (status = 404, description = "사용자 없음", body = ErrorDetail)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserPublic>> {
    let user = UserRepository::find_by_id(&state.db_pool, user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(user.into()))
}

/// PUT /users/{user_id} - 본인 정보 수정
///
/// 토큰의 사용자와 경로의 사용자가 다르면 403을 반환합니다.
/// 중복 검사는 본인 레코드를 제외하고 수행합니다.
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "사용자 ID")
    ),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "수정된 사용자 정보", body = UserPublic),
        (status = 400, description = "이미 사용 중인 username 또는 email", body = ErrorDetail),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorDetail),
        (status = 403, description = "본인 계정이 아님", body = ErrorDetail)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<Json<UserPublic>> {
    payload.validate()?;

    if user.id != user_id {
        warn!("타인 계정 수정 시도: id={} by={}", user_id, user.id);
        return Err(ApiError::Forbidden);
    }

    if UserRepository::email_taken(&state.db_pool, &payload.email, Some(user.id)).await? {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    if UserRepository::username_taken(&state.db_pool, &payload.username, Some(user.id)).await? {
        return Err(ApiError::Conflict("Username already in use".to_string()));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| ApiError::Internal(format!("비밀번호 해싱 실패: {e}")))?;

    let updated = UserRepository::update(
        &state.db_pool,
        user_id,
        UserChanges {
            username: Some(payload.username),
            email: Some(payload.email),
            password_hash: Some(password_hash),
        },
    )
    .await?
    .ok_or(ApiError::UserNotFound)?;

    info!("사용자 정보 수정: id={}", user_id);

    Ok(Json(updated.into()))
}

/// DELETE /users/{user_id} - 본인 계정 삭제
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "사용자 ID")
    ),
    responses(
        (status = 200, description = "삭제 완료", body = Message),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorDetail),
        (status = 403, description = "본인 계정이 아님", body = ErrorDetail)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Message>> {
    if user.id != user_id {
        warn!("타인 계정 삭제 시도: id={} by={}", user_id, user.id);
        return Err(ApiError::Forbidden);
    }

    let deleted = UserRepository::delete(&state.db_pool, user_id).await?;
    if !deleted {
        return Err(ApiError::UserNotFound);
    }

    info!("사용자 삭제: id={}", user_id);

    Ok(Json(Message {
        message: "User deleted".to_string(),
    }))
}

// ================================================================================================
// Router
// ================================================================================================

/// 사용자 라우터 생성
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::error::ErrorDetail;
    use crate::state::create_test_state;

    fn test_app() -> Router {
        Router::new()
            .nest("/users", users_router())
            .with_state(Arc::new(create_test_state()))
    }

    fn sample_user() -> User {
        User {
            id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
            cpf: "11144477735".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_public_hides_credentials() {
        let public = UserPublic::from(sample_user());
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["username"], "alice");
        assert!(json.get("password").is_none());
        assert!(json.get("cpf").is_none());
    }

    #[test]
    fn test_cpf_shape_validation() {
        assert!(validate_cpf_shape("11144477735").is_ok());
        assert!(validate_cpf_shape("1114447773").is_err());
        assert!(validate_cpf_shape("11144477735a").is_err());
        assert!(validate_cpf_shape("111.444.777").is_err());
        assert!(validate_cpf_shape("").is_err());
    }

    #[tokio::test]
    async fn test_create_user_rejects_short_password() {
        let app = test_app();

        let body = serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "short",
            "cpf": "11144477735"
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let detail: ErrorDetail = serde_json::from_slice(&bytes).unwrap();
        assert!(detail.detail.contains("password"));
    }

    #[tokio::test]
    async fn test_create_user_rejects_malformed_email() {
        let app = test_app();

        let body = serde_json::json!({
            "username": "alice",
            "email": "not-an-email",
            "password": "correct horse",
            "cpf": "11144477735"
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_user_requires_token() {
        let app = test_app();

        let body = serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "correct horse"
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/users/1")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_delete_user_rejects_garbage_token() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/users/1")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_get_user_rejects_non_numeric_id() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
