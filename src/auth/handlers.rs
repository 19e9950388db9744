use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::{
    dto::{
        AuthResponse, LoginRequest, LogoutResponse, MessageResponse, PublicUser, RegisterRequest,
        RegisterResponse, ResendVerificationRequest, VerifyQuery,
    },
    error::AuthError,
    extractors::{SessionUser, AUTH_COOKIE},
    jwt::SESSION_TTL,
    repo_types::User,
    services,
};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/verify", get(verify))
        .route("/auth/resend-verification", post(resend_verification))
}

/// Build the session cookie for a freshly minted token.
fn session_cookie(token: &str, secure: bool) -> HeaderValue {
    let mut cookie = format!(
        "{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_TTL.whole_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).expect("cookie header from token")
}

fn clear_session_cookie(secure: bool) -> HeaderValue {
    let mut cookie = format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).expect("cookie header")
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    if !services::is_valid_email(&payload.email) {
        return Err(AuthError::Validation("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err(AuthError::Validation("Password too short".into()));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AuthError::Validation("First and last name are required".into()));
    }

    let (user_id, _token) = services::register(&state, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful. Please verify your email address.".into(),
            user_id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    if !services::is_valid_email(&payload.email) {
        return Err(AuthError::Validation("Invalid email".into()));
    }

    let (token, user) = services::login(&state, &payload).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        session_cookie(&token, state.config.secure_cookies()),
    );

    Ok((headers, Json(AuthResponse { user, token })))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<LogoutResponse>) {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        clear_session_cookie(state.config.secure_cookies()),
    );
    (headers, Json(LogoutResponse { success: true }))
}

#[instrument(skip(state, session))]
pub async fn me(
    State(state): State<AppState>,
    session: SessionUser,
) -> Result<Json<PublicUser>, AuthError> {
    let SessionUser(claims) = session;
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    if !user.is_active() {
        return Err(AuthError::AccountNotActive);
    }

    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state, query))]
pub async fn verify(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Redirect, AuthError> {
    let token = query
        .token
        .ok_or_else(|| AuthError::Validation("Missing token".into()))?;

    // Verification links land in a browser, so failures redirect back to the
    // login page instead of rendering a JSON error.
    match services::verify_email(&state, &token).await {
        Ok(()) => Ok(Redirect::to("/login?verified=true")),
        Err(e) => Ok(Redirect::to(&format!("/login?error={}", e.code()))),
    }
}

#[instrument(skip(state, payload))]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<ResendVerificationRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let email = payload.email.trim().to_lowercase();

    if !services::is_valid_email(&email) {
        return Err(AuthError::Validation("Invalid email".into()));
    }

    services::resend_verification(&state, &email).await?;

    Ok(Json(MessageResponse {
        message: "Verification email sent.".into(),
    }))
}
