use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::EmailAddress;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::UserRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    session_id: Option<String>,
    reset_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn try_into_user(self) -> Result<User, AuthError> {
        Ok(User {
            id: UserId(self.id),
            email: EmailAddress::new(self.email)?,
            password_hash: self.password_hash,
            session_id: self.session_id,
            reset_token: self.reset_token,
            created_at: self.created_at,
        })
    }
}

const SELECT_USER: &str =
    "SELECT id, email, password_hash, session_id, reset_token, created_at FROM users";

impl PostgresUserRepository {
    async fn fetch_optional(
        &self,
        query: String,
        value: &str,
    ) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, session_id, reset_token, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.0)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.session_id)
        .bind(&user.reset_token)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AuthError::AlreadyExists(user.email.as_str().to_string());
                }
            }
            AuthError::Repository(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        row.map(UserRow::try_into_user).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.fetch_optional(format!("{SELECT_USER} WHERE email = $1"), email)
            .await
    }

    async fn find_all_by_email(&self, email: &str) -> Result<Vec<User>, AuthError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE email = $1"))
            .bind(email)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        rows.into_iter().map(UserRow::try_into_user).collect()
    }

    async fn find_by_session_id(&self, token: &str) -> Result<Option<User>, AuthError> {
        self.fetch_optional(format!("{SELECT_USER} WHERE session_id = $1"), token)
            .await
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        self.fetch_optional(format!("{SELECT_USER} WHERE reset_token = $1"), token)
            .await
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        // Email is immutable after creation, so it is not written back.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, session_id = $3, reset_token = $4
            WHERE id = $1
            "#,
        )
        .bind(user.id.0)
        .bind(&user.password_hash)
        .bind(&user.session_id)
        .bind(&user.reset_token)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::Repository(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound(user.id.to_string()));
        }

        Ok(user)
    }

    async fn clear_session(&self, token: &str) -> Result<bool, AuthError> {
        // The single conditional UPDATE decides the winner between concurrent
        // destroys of the same token.
        let result = sqlx::query("UPDATE users SET session_id = NULL WHERE session_id = $1")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
