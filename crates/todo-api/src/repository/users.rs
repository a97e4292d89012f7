//! User Repository
//!
//! 사용자 계정 관련 데이터베이스 연산을 담당합니다.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 레코드.
///
/// `password`는 Argon2 해시입니다. 이 타입은 와이어로 직렬화하지 않으며
/// 응답에는 라우트 계층의 공개 스키마만 사용합니다.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub cpf: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 사용자 입력.
///
/// `password_hash`는 이미 해싱된 값이어야 합니다.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub cpf: String,
}

/// 사용자 부분 수정 입력.
///
/// `None`인 필드는 기존 값을 유지합니다.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

// ================================================================================================
// Repository
// ================================================================================================

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// 사용자 생성.
    pub async fn create(pool: &PgPool, input: NewUser) -> Result<User, sqlx::Error> {
        let record = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, cpf)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.cpf)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// ID로 사용자 조회.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        let record = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// username으로 사용자 조회 (로그인용).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let record = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// email로 사용자 조회 (토큰 subject 해석용).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let record = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// 사용자 목록 조회 (페이지네이션).
    pub async fn list(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<User>, sqlx::Error> {
        let records = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            ORDER BY id
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// username 중복 확인.
    ///
    /// `exclude_id`가 주어지면 해당 사용자 본인은 중복으로 치지 않습니다
    /// (수정 시 자기 자신과의 충돌 방지).
    pub async fn username_taken(
        pool: &PgPool,
        username: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE username = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    /// email 중복 확인.
    pub async fn email_taken(
        pool: &PgPool,
        email: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    /// CPF 중복 확인.
    pub async fn cpf_taken(pool: &PgPool, cpf: &str) -> Result<bool, sqlx::Error> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE cpf = $1)")
                .bind(cpf)
                .fetch_one(pool)
                .await?;

        Ok(taken)
    }

    /// 사용자 부분 수정.
    ///
    /// `None`인 필드는 기존 값을 유지하며 `updated_at`은 항상 갱신됩니다.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        changes: UserChanges,
    ) -> Result<Option<User>, sqlx::Error> {
        let record = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// 사용자 삭제 (CASCADE로 소유한 할 일도 삭제됨).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
