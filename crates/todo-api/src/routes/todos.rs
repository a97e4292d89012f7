//! 할 일 API 라우트
//!
//! 인증된 사용자 본인의 할 일만 다룹니다. 모든 엔드포인트는 Bearer 토큰이
//! 필요하며, 타인 소유의 할 일은 존재 여부조차 노출하지 않고 404로 응답합니다.
//!
//! # 엔드포인트
//!
//! - `POST /todos/` - 할 일 생성
//! - `GET /todos/` - 할 일 목록 조회 (필터/페이지네이션)
//! - `PATCH /todos/{todo_id}` - 할 일 부분 수정
//! - `DELETE /todos/{todo_id}` - 할 일 삭제

use axum::{
    extract::{Path, Query, State},
    routing::{patch, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use todo_core::TodoState;

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult, ErrorDetail};
use crate::metrics::record_todo_created;
use crate::repository::{NewTodo, Todo, TodoChanges, TodoFilter, TodoRepository};
use crate::routes::users::Message;
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 할 일 생성 요청
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TodoCreate {
    /// 제목 (최대 50자)
    #[validate(length(max = 50, message = "제목은 50자를 초과할 수 없습니다"))]
    pub title: String,
    /// 설명 (최대 150자)
    #[validate(length(max = 150, message = "설명은 150자를 초과할 수 없습니다"))]
    pub description: String,
    /// 할 일 상태
    pub state: TodoState,
}

/// 할 일 부분 수정 요청. 제공된 필드만 반영됩니다.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct TodoUpdate {
    /// 제목 (최대 50자)
    #[validate(length(max = 50, message = "제목은 50자를 초과할 수 없습니다"))]
    pub title: Option<String>,
    /// 설명 (최대 150자)
    #[validate(length(max = 150, message = "설명은 150자를 초과할 수 없습니다"))]
    pub description: Option<String>,
    /// 할 일 상태
    pub state: Option<TodoState>,
}

/// 공개 할 일 정보
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoPublic {
    /// 할 일 ID
    pub id: i64,
    /// 제목
    pub title: String,
    /// 설명
    pub description: String,
    /// 상태
    pub state: TodoState,
    /// 생성 시각
    pub created_at: DateTime<Utc>,
    /// 마지막 수정 시각
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoPublic {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            state: todo.state,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

/// 할 일 목록 응답
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoList {
    /// 할 일 목록
    pub todos: Vec<TodoPublic>,
}

/// 목록 조회 필터 쿼리
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    /// 제목 부분 일치 필터
    pub title: Option<String>,
    /// 설명 부분 일치 필터
    pub description: Option<String>,
    /// 상태 일치 필터
    pub state: Option<TodoState>,
    /// 건너뛸 레코드 수
    pub offset: Option<i64>,
    /// 최대 반환 레코드 수
    pub limit: Option<i64>,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// POST /todos/ - 할 일 생성
#[utoipa::path(
    post,
    path = "/todos/",
    request_body = TodoCreate,
    responses(
        (status = 200, description = "생성된 할 일", body = TodoPublic),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorDetail),
        (status = 422, description = "요청 본문 검증 실패", body = ErrorDetail)
    ),
    tag = "todos"
)]
pub async fn create_todo(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<TodoCreate>,
) -> ApiResult<Json<TodoPublic>> {
    payload.validate()?;

    debug!("할 일 생성: user_id={}", user.id);

    let todo = TodoRepository::create(
        &state.db_pool,
        user.id,
        NewTodo {
            title: payload.title,
            description: payload.description,
            state: payload.state,
        },
    )
    .await?;

    record_todo_created(&todo.state.to_string());

    Ok(Json(todo.into()))
}

/// GET /todos/ - 할 일 목록 조회
///
/// 빈 문자열로 전달된 제목/설명 필터는 없는 것으로 취급합니다.
#[utoipa::path(
    get,
    path = "/todos/",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "할 일 목록", body = TodoList),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorDetail)
    ),
    tag = "todos"
)]
pub async fn list_todos(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListTodosQuery>,
) -> ApiResult<Json<TodoList>> {
    debug!("할 일 목록 조회: user_id={}", user.id);

    let filter = TodoFilter {
        title: query.title.filter(|s| !s.is_empty()),
        description: query.description.filter(|s| !s.is_empty()),
        state: query.state,
        offset: query.offset,
        limit: query.limit,
    };

    let todos = TodoRepository::list(&state.db_pool, user.id, filter).await?;

    Ok(Json(TodoList {
        todos: todos.into_iter().map(TodoPublic::from).collect(),
    }))
}

/// PATCH /todos/{todo_id} - 할 일 부분 수정
///
/// 빈 패치는 저장된 레코드를 그대로 반환합니다 (`updated_at` 변경 없음).
#[utoipa::path(
    patch,
    path = "/todos/{todo_id}",
    params(
        ("todo_id" = i64, Path, description = "할 일 ID")
    ),
    request_body = TodoUpdate,
    responses(
        (status = 200, description = "수정된 할 일", body = TodoPublic),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorDetail),
        (status = 404, description = "할 일 없음", body = ErrorDetail)
    ),
    tag = "todos"
)]
pub async fn patch_todo(
    State(state): State<Arc<AppState>>,
    Path(todo_id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<TodoUpdate>,
) -> ApiResult<Json<TodoPublic>> {
    payload.validate()?;

    let changes = TodoChanges {
        title: payload.title,
        description: payload.description,
        state: payload.state,
    };

    let updated = if changes.is_empty() {
        TodoRepository::find_by_id(&state.db_pool, user.id, todo_id).await?
    } else {
        TodoRepository::update_partial(&state.db_pool, user.id, todo_id, changes).await?
    }
    .ok_or(ApiError::TaskNotFound)?;

    info!("할 일 수정: id={} user_id={}", todo_id, user.id);

    Ok(Json(updated.into()))
}

/// DELETE /todos/{todo_id} - 할 일 삭제
#[utoipa::path(
    delete,
    path = "/todos/{todo_id}",
    params(
        ("todo_id" = i64, Path, description = "할 일 ID")
    ),
    responses(
        (status = 200, description = "삭제 완료", body = Message),
        (status = 401, description = "유효하지 않은 토큰", body = ErrorDetail),
        (status = 404, description = "할 일 없음", body = ErrorDetail)
    ),
    tag = "todos"
)]
pub async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(todo_id): Path<i64>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Message>> {
    let deleted = TodoRepository::delete(&state.db_pool, user.id, todo_id).await?;
    if !deleted {
        return Err(ApiError::TaskNotFound);
    }

    info!("할 일 삭제: id={} user_id={}", todo_id, user.id);

    Ok(Json(Message {
        message: "Task has been deleted successfully.".to_string(),
    }))
}

// ================================================================================================
// Router
// ================================================================================================

/// 할 일 라우터 생성
pub fn todos_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_todo).get(list_todos))
        .route("/{todo_id}", patch(patch_todo).delete(delete_todo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Duration;
    use tower::ServiceExt;

    use todo_core::AuthConfig;

    use crate::auth::create_access_token;
    use crate::state::create_test_state;

    fn test_app() -> Router {
        Router::new()
            .nest("/todos", todos_router())
            .with_state(Arc::new(create_test_state()))
    }

    #[tokio::test]
    async fn test_create_todo_requires_token() {
        let app = test_app();

        let body = serde_json::json!({
            "title": "장보기",
            "description": "우유, 계란",
            "state": "todo"
        });

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/todos/")
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
    async fn test_list_todos_rejects_expired_token() {
        let config = AuthConfig::default();
        let issued_at = Utc::now() - Duration::minutes(config.access_token_expire_minutes + 5);
        let token = create_access_token("ghost@example.com", issued_at, &config).unwrap();

        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/todos/")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_todo_rejects_basic_auth_scheme() {
        let app = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/todos/1")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_todo_update_fields_are_optional() {
        let empty: TodoUpdate = serde_json::from_str("{}").unwrap();
        assert!(empty.title.is_none());
        assert!(empty.description.is_none());
        assert!(empty.state.is_none());

        let partial: TodoUpdate = serde_json::from_str(r#"{"state":"done"}"#).unwrap();
        assert_eq!(partial.state, Some(TodoState::Done));
        assert!(partial.title.is_none());
    }

    #[test]
    fn test_todo_public_hides_owner() {
        let todo = Todo {
            id: 3,
            user_id: 42,
            title: "장보기".to_string(),
            description: "우유".to_string(),
            state: TodoState::Draft,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(TodoPublic::from(todo)).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["state"], "draft");
        assert!(json.get("user_id").is_none());
    }
}
