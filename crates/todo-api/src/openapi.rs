//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! # 자동 생성 구조
//!
//! 각 라우트 모듈은 자체 스키마를 정의하고, 중앙 `ApiDoc`에서 자동으로 집계합니다.
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// ==================== 각 모듈에서 스키마 Import ====================

use todo_core::TodoState;

use crate::error::ErrorDetail;
use crate::routes::{
    // Health 모듈
    ComponentHealth,
    ComponentStatus,
    HealthResponse,
    // Auth 모듈
    LoginForm,
    // Users 모듈
    Message,
    // Todos 모듈
    TodoCreate,
    TodoList,
    TodoPublic,
    TodoUpdate,
    TokenResponse,
    UserCreate,
    UserList,
    UserPublic,
    UserUpdate,
};

// ==================== OpenAPI 문서 정의 ====================

/// ZeroTodo API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ZeroTodo API",
        version = "0.1.0",
        description = r#"
# ZeroTodo 할 일 관리 REST API

JWT 인증 기반의 멀티 테넌트 할 일 관리 REST API입니다.

## 주요 기능

- **회원 관리**: 가입, 조회, 본인 정보 수정/삭제 (CPF 검증 포함)
- **인증**: 폼 로그인 및 JWT Bearer 토큰 발급
- **할 일 관리**: 본인 소유 할 일의 생성/조회/수정/삭제 및 필터링

## 인증

`/todos` 전체와 `/users`의 수정/삭제 엔드포인트는 JWT Bearer 토큰 인증이 필요합니다.
`POST /auth/token`으로 토큰을 발급받아 `Authorization: Bearer <token>` 헤더를 포함하세요.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(
            name = "ZeroTodo Team",
            url = "https://github.com/user/zerotodo"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 로그인 및 토큰 발급"),
        (name = "users", description = "사용자 - 회원 가입 및 계정 관리"),
        (name = "todos", description = "할 일 - 본인 소유 할 일 CRUD")
    ),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ErrorDetail,
            Message,

            // ===== Auth =====
            LoginForm,
            TokenResponse,

            // ===== Users =====
            UserCreate,
            UserUpdate,
            UserPublic,
            UserList,

            // ===== Todos =====
            TodoState,
            TodoCreate,
            TodoUpdate,
            TodoPublic,
            TodoList,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== Auth =====
        crate::routes::auth::login,

        // ===== Users =====
        crate::routes::users::create_user,
        crate::routes::users::list_users,
        crate::routes::users::get_user,
        crate::routes::users::update_user,
        crate::routes::users::delete_user,

        // ===== Todos =====
        crate::routes::todos::create_todo,
        crate::routes::todos::list_todos,
        crate::routes::todos::patch_todo,
        crate::routes::todos::delete_todo,
    )
)]
pub struct ApiDoc;

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================
