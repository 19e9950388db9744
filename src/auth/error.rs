use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Authentication errors. The HTTP boundary maps each variant to a status
/// code and a user-facing message; internal detail stays in the logs.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Account is not active")]
    AccountNotActive,

    #[error("Email already verified")]
    AlreadyVerified,

    #[error("User not found")]
    UserNotFound,

    #[error("Verification token not found")]
    TokenNotFound,

    #[error("Verification token has expired")]
    TokenExpired,

    #[error("Verification token already used")]
    TokenAlreadyUsed,

    #[error("Invalid session token")]
    InvalidToken,

    #[error("Session token has expired")]
    ExpiredToken,

    #[error("{0}")]
    Validation(String),

    #[error("Verification email could not be delivered")]
    NotificationDeliveryFailed,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error")]
    Internal,
}

impl AuthError {
    /// Stable machine-readable code, also used in redirect query strings.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidToken | AuthError::ExpiredToken => "invalid_session",
            AuthError::AccountNotActive => "account_not_active",
            AuthError::UserNotFound => "user_not_found",
            AuthError::TokenNotFound => "token_not_found",
            AuthError::EmailAlreadyRegistered => "email_exists",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenAlreadyUsed => "token_used",
            AuthError::AlreadyVerified => "already_verified",
            AuthError::Validation(_) => "validation_error",
            AuthError::NotificationDeliveryFailed => "delivery_failed",
            AuthError::Database(_) | AuthError::Internal => "internal_error",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::AccountNotActive => StatusCode::FORBIDDEN,
            AuthError::UserNotFound | AuthError::TokenNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailAlreadyRegistered => StatusCode::CONFLICT,
            AuthError::TokenExpired
            | AuthError::TokenAlreadyUsed
            | AuthError::AlreadyVerified
            | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::NotificationDeliveryFailed => StatusCode::BAD_GATEWAY,
            AuthError::Database(_) | AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Store and hashing failures never leak detail to the client.
            AuthError::Database(_) | AuthError::Internal => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        (
            self.status(),
            Json(serde_json::json!({
                "error": self.code(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!(error = %err, "database error");
        AuthError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AuthError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(status_of(AuthError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::ExpiredToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AuthError::AccountNotActive), StatusCode::FORBIDDEN);
        assert_eq!(status_of(AuthError::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AuthError::TokenNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AuthError::EmailAlreadyRegistered), StatusCode::CONFLICT);
        assert_eq!(status_of(AuthError::TokenExpired), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AuthError::TokenAlreadyUsed), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(AuthError::AlreadyVerified), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AuthError::Validation("missing field".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AuthError::NotificationDeliveryFailed),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(AuthError::Database("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_detail() {
        let response = AuthError::Database("password for bob is hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is built from a fixed message, not the database error.
    }
}
