//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/auth/token` - 로그인 및 토큰 발급
//! - `/users` - 회원 가입 및 사용자 관리
//! - `/todos` - 할 일 관리 (인증 필요)

pub mod auth;
pub mod health;
pub mod todos;
pub mod users;

pub use auth::{auth_router, LoginForm, TokenResponse};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use todos::{todos_router, ListTodosQuery, TodoCreate, TodoList, TodoPublic, TodoUpdate};
pub use users::{
    users_router, ListUsersQuery, Message, UserCreate, UserList, UserPublic, UserUpdate,
};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // 서비스 엔드포인트
        .nest("/auth", auth_router())
        .nest("/users", users_router())
        .nest("/todos", todos_router())
}
