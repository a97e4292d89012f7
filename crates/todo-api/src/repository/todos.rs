//! Todo Repository
//!
//! 할 일 관련 데이터베이스 연산을 담당합니다.
//! 모든 연산은 소유자(user_id) 범위로 한정되어 다른 사용자의 할 일은
//! 존재하지 않는 것처럼 처리됩니다.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use todo_core::TodoState;

// ================================================================================================
// Types
// ================================================================================================

/// 할 일 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub state: TodoState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 할 일 입력.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub state: TodoState,
}

/// 할 일 부분 수정 입력.
///
/// `None`인 필드는 기존 값을 유지합니다.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
}

impl TodoChanges {
    /// 변경할 필드가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.state.is_none()
    }
}

/// 할 일 목록 필터.
///
/// `title`/`description`은 부분 일치, `state`는 정확히 일치해야 합니다.
/// `None`인 조건은 적용되지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<TodoState>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

// ================================================================================================
// Repository
// ================================================================================================

/// Todo Repository
pub struct TodoRepository;

impl TodoRepository {
    /// 할 일 생성.
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        input: NewTodo,
    ) -> Result<Todo, sqlx::Error> {
        let record = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (user_id, title, description, state)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.state)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// 소유자 범위 내에서 ID로 할 일 조회.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let record =
            sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(pool)
                .await?;

        Ok(record)
    }

    /// 소유자의 할 일 목록 조회 (필터/페이지네이션).
    ///
    /// NULL로 바인딩된 조건은 SQL 단에서 무시됩니다.
    pub async fn list(
        pool: &PgPool,
        user_id: i64,
        filter: TodoFilter,
    ) -> Result<Vec<Todo>, sqlx::Error> {
        let records = sqlx::query_as::<_, Todo>(
            r#"
            SELECT * FROM todos
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR title LIKE '%' || $2 || '%')
              AND ($3::TEXT IS NULL OR description LIKE '%' || $3 || '%')
              AND ($4::todo_state IS NULL OR state = $4)
            ORDER BY id
            OFFSET $5 LIMIT $6
            "#,
        )
        .bind(user_id)
        .bind(&filter.title)
        .bind(&filter.description)
        .bind(filter.state)
        .bind(filter.offset)
        .bind(filter.limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// 할 일 부분 수정.
    ///
    /// `None`인 필드는 기존 값을 유지하며 `updated_at`은 항상 갱신됩니다.
    /// 소유자가 아니면 None을 반환합니다.
    pub async fn update_partial(
        pool: &PgPool,
        user_id: i64,
        id: i64,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let record = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                state = COALESCE($5, state),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.state)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// 할 일 삭제.
    ///
    /// 소유자가 아니면 false를 반환합니다.
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
