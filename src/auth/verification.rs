//! Single-use, time-limited email confirmation tokens.

use rand::{rngs::OsRng, RngCore};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::info;

use crate::auth::error::AuthError;
use crate::auth::repo_types::VerificationToken;

/// Confirmation links expire a day after they are issued.
pub const VERIFICATION_TTL: Duration = Duration::hours(24);

const TOKEN_BYTES: usize = 32;

/// Generate an opaque token with 256 bits of entropy, hex encoded.
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Mint and persist a fresh confirmation token for a user.
pub async fn issue(db: &PgPool, user_id: i64) -> Result<String, AuthError> {
    let token = generate_token();
    let expires_at = OffsetDateTime::now_utc() + VERIFICATION_TTL;
    VerificationToken::create(db, &token, user_id, expires_at).await?;
    info!(user_id = %user_id, "verification token issued");
    Ok(token)
}

/// Consume a confirmation token, returning the owning user id.
///
/// Lookup, expiry check and consumption act as one unit: the final update is
/// conditional on the token being unconsumed, so a duplicate request racing
/// this one cannot also succeed.
pub async fn consume(db: &PgPool, token: &str) -> Result<i64, AuthError> {
    let row = VerificationToken::find_by_token(db, token)
        .await?
        .ok_or(AuthError::TokenNotFound)?;

    if row.is_used() {
        return Err(AuthError::TokenAlreadyUsed);
    }
    if row.is_expired(OffsetDateTime::now_utc()) {
        return Err(AuthError::TokenExpired);
    }

    match VerificationToken::consume(db, token).await? {
        Some(user_id) => {
            info!(user_id = %user_id, "verification token consumed");
            Ok(user_id)
        }
        // Another request consumed it between the lookup and the update.
        None => Err(AuthError::TokenAlreadyUsed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }
}
