use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User role matching the `user_role` database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Instructor,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Account status matching the `user_status` database type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Pending,
    Active,
    Suspended,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 hash, never exposed in JSON
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub status: UserStatus,
    pub email_verified: bool,
    pub profile_image: Option<String>,
    pub last_visit_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

/// Single-use email confirmation token record.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationToken {
    pub id: i64,
    pub token: String,
    pub user_id: i64,
    pub expires_at: OffsetDateTime,
    pub used_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl VerificationToken {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn token_row(expires_at: OffsetDateTime, used_at: Option<OffsetDateTime>) -> VerificationToken {
        VerificationToken {
            id: 1,
            token: "ab".repeat(32),
            user_id: 7,
            expires_at,
            used_at,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn fresh_token_is_neither_used_nor_expired() {
        let now = OffsetDateTime::now_utc();
        let row = token_row(now + Duration::hours(24), None);
        assert!(!row.is_expired(now));
        assert!(!row.is_used());
    }

    #[test]
    fn past_expiry_is_expired_even_if_never_used() {
        let now = OffsetDateTime::now_utc();
        let row = token_row(now - Duration::seconds(1), None);
        assert!(row.is_expired(now));
        assert!(!row.is_used());
    }

    #[test]
    fn consumed_token_is_used_even_before_expiry() {
        let now = OffsetDateTime::now_utc();
        let row = token_row(now + Duration::hours(12), Some(now - Duration::minutes(5)));
        assert!(!row.is_expired(now));
        assert!(row.is_used());
    }

    #[test]
    fn user_json_never_contains_password_hash() {
        let user = User {
            id: 1,
            email: "a@x.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            first_name: "Ana".into(),
            last_name: "Li".into(),
            phone: None,
            role: Role::Client,
            status: UserStatus::Active,
            email_verified: true,
            profile_image: None,
            last_visit_at: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"client\"");
        assert!(Role::Admin.is_admin());
        assert!(!Role::Instructor.is_admin());
    }
}
