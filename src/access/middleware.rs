use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::access::policy::{classify, decide, AccessDecision, PathClass};
use crate::auth::extractors::token_from_headers;
use crate::auth::jwt::JwtKeys;
use crate::state::AppState;

/// Route guard applied to every request before its handler.
///
/// Expired, malformed and missing tokens all land in the same "no session"
/// bucket; the client only ever sees a redirect.
pub async fn route_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let class = classify(req.uri().path());
    if class == PathClass::Unrestricted {
        return next.run(req).await;
    }

    let keys = JwtKeys::from_ref(&state);
    let role = token_from_headers(req.headers())
        .and_then(|token| keys.verify_session(&token).ok())
        .map(|claims| claims.role);

    match decide(class, role) {
        AccessDecision::Allow => next.run(req).await,
        decision => {
            let target = decision
                .redirect_target()
                .expect("non-allow decisions carry a target");
            debug!(path = %req.uri().path(), target = %target, "request redirected");
            Redirect::to(target).into_response()
        }
    }
}
