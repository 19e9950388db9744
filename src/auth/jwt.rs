use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::error::AuthError;
use crate::auth::repo_types::Role;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Session validity window, matching the cookie lifetime.
pub const SESSION_TTL: Duration = Duration::days(7);

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }
}

impl JwtKeys {
    /// Sign a session token for an authenticated user.
    pub fn sign_session(&self, sub: i64, email: &str, role: Role) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub,
            email: email.to_string(),
            role,
            iat: now.unix_timestamp(),
            exp: (now + SESSION_TTL).unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "jwt sign error");
            AuthError::Internal
        })?;
        debug!(user_id = %sub, "session token signed");
        Ok(token)
    }

    /// Verify a session token. Nothing in the payload is trusted unless the
    /// signature checks out.
    pub fn verify_session(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "session token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            }
        })?;
        Ok(data.claims)
    }
}
