//! Registration, login, verification and resend flows.

use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, warn};

use crate::auth::dto::{LoginRequest, PublicUser, RegisterRequest};
use crate::auth::error::AuthError;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo_types::User;
use crate::auth::verification;
use crate::email::verification_email;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Create a pending account and send the confirmation email.
///
/// Returns the new user id together with the raw verification token. No
/// session token is minted; registration does not imply login.
pub async fn register(state: &AppState, req: &RegisterRequest) -> Result<(i64, String), AuthError> {
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AuthError::EmailAlreadyRegistered);
    }

    let hash = hash_password(&req.password)?;
    let user = User::create(
        &state.db,
        &req.email,
        &hash,
        &req.first_name,
        &req.last_name,
        req.phone.as_deref(),
    )
    .await?;

    let token = verification::issue(&state.db, user.id).await?;

    let message = verification_email(&state.config.public_url, &user.first_name, &user.email, &token);
    if let Err(e) = state.mailer.send(&message).await {
        // The token record stays valid; the user can ask for a resend.
        error!(error = %e, user_id = %user.id, "verification email delivery failed");
        return Err(AuthError::NotificationDeliveryFailed);
    }

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((user.id, token))
}

/// Authenticate with email and password, returning a session token and the
/// public user projection.
pub async fn login(state: &AppState, req: &LoginRequest) -> Result<(String, PublicUser), AuthError> {
    // Unknown email and wrong password are indistinguishable to the caller.
    let user = match User::find_by_email(&state.db, &req.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %req.email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active() {
        warn!(user_id = %user.id, status = ?user.status, "login on inactive account");
        return Err(AuthError::AccountNotActive);
    }

    let keys = JwtKeys::from_ref(state);
    let token = keys.sign_session(user.id, &user.email, user.role)?;

    User::touch_last_visit(&state.db, user.id).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((token, user.into()))
}

/// Confirm an email address by consuming its verification token.
pub async fn verify_email(state: &AppState, token: &str) -> Result<(), AuthError> {
    let user_id = verification::consume(&state.db, token).await?;
    User::mark_verified(&state.db, user_id).await?;
    info!(user_id = %user_id, "email verified, account active");
    Ok(())
}

/// Issue a fresh verification token and resend the confirmation email.
pub async fn resend_verification(state: &AppState, email: &str) -> Result<(), AuthError> {
    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if user.email_verified {
        return Err(AuthError::AlreadyVerified);
    }

    let token = verification::issue(&state.db, user.id).await?;

    let message = verification_email(&state.config.public_url, &user.first_name, &user.email, &token);
    if let Err(e) = state.mailer.send(&message).await {
        error!(error = %e, user_id = %user.id, "verification email delivery failed");
        return Err(AuthError::NotificationDeliveryFailed);
    }

    info!(user_id = %user.id, "verification email resent");
    Ok(())
}
