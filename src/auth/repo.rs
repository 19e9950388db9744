//! Typed queries against the user and verification-token tables.

use sqlx::PgPool;
use time::OffsetDateTime;

use crate::auth::error::AuthError;
use crate::auth::repo_types::{User, VerificationToken};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, \
     role, status, email_verified, profile_image, last_visit_at, created_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user by id.
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new pending user with a hashed password.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Activate an account after its email address was confirmed.
    pub async fn mark_verified(db: &PgPool, id: i64) -> Result<(), AuthError> {
        sqlx::query(
            "UPDATE users SET status = 'active', email_verified = TRUE WHERE id = $1",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Record a successful login.
    pub async fn touch_last_visit(db: &PgPool, id: i64) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET last_visit_at = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

const TOKEN_COLUMNS: &str = "id, token, user_id, expires_at, used_at, created_at";

impl VerificationToken {
    /// Persist a freshly generated token.
    pub async fn create(
        db: &PgPool,
        token: &str,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<VerificationToken, AuthError> {
        let row = sqlx::query_as::<_, VerificationToken>(&format!(
            "INSERT INTO email_verification_tokens (token, user_id, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {TOKEN_COLUMNS}"
        ))
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Look up a token by its opaque value.
    pub async fn find_by_token(
        db: &PgPool,
        token: &str,
    ) -> Result<Option<VerificationToken>, AuthError> {
        let row = sqlx::query_as::<_, VerificationToken>(&format!(
            "SELECT {TOKEN_COLUMNS} FROM email_verification_tokens WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Mark a token consumed, returning the owning user id.
    ///
    /// The update is conditional on `used_at IS NULL`, so of two requests
    /// racing on the same token value exactly one gets a row back.
    pub async fn consume(db: &PgPool, token: &str) -> Result<Option<i64>, AuthError> {
        let user_id: Option<(i64,)> = sqlx::query_as(
            "UPDATE email_verification_tokens SET used_at = now() \
             WHERE token = $1 AND used_at IS NULL \
             RETURNING user_id",
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(user_id.map(|(id,)| id))
    }
}
