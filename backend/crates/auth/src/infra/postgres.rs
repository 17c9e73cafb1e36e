//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::user::{Avatar, CourseRef, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    name,
    email,
    password_hash,
    avatar,
    role,
    is_verified,
    courses,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `users_email_key` violations surface as `EmailTaken`
fn map_write_error(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AuthError::EmailTaken;
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                name,
                email,
                password_hash,
                avatar,
                role,
                is_verified,
                courses,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.password.as_ref().map(|p| p.as_phc_string()))
        .bind(user.avatar.as_ref().map(Json))
        .bind(user.role.code())
        .bind(user.is_verified)
        .bind(Json(&user.courses))
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_newest_first(&self) -> AuthResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                name = $2,
                email = $3,
                password_hash = $4,
                avatar = $5,
                role = $6,
                is_verified = $7,
                courses = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(user.password.as_ref().map(|p| p.as_phc_string()))
        .bind(user.avatar.as_ref().map(Json))
        .bind(user.role.code())
        .bind(user.is_verified)
        .bind(Json(&user.courses))
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: Option<String>,
    avatar: Option<Json<Avatar>>,
    role: String,
    is_verified: bool,
    courses: Json<Vec<CourseRef>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password = self
            .password_hash
            .map(UserPassword::from_phc_string)
            .transpose()
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let role = UserRole::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role: {}", self.role)))?;

        Ok(User {
            id: UserId::from(self.id),
            name: self.name,
            email: Email::from_trusted(self.email),
            password,
            avatar: self.avatar.map(|a| a.0),
            role,
            is_verified: self.is_verified,
            courses: self.courses.0,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
