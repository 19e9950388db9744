use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::error::AuthError;
use crate::auth::jwt::JwtKeys;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth_token";

/// Pull a bearer credential out of the request headers: the session cookie
/// first, then the Authorization header.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
        for pair in cookies.split(';') {
            if let Some(value) = pair
                .trim()
                .strip_prefix(AUTH_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
            {
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Extracts and validates the session token, returning its claims.
pub struct SessionUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = token_from_headers(&parts.headers).ok_or(AuthError::InvalidToken)?;
        let claims = keys.verify_session(&token).map_err(|e| {
            debug!("session rejected: {e}");
            e
        })?;
        Ok(SessionUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn reads_the_session_cookie() {
        let map = headers(&[(header::COOKIE, "theme=dark; auth_token=tok123; lang=es")]);
        assert_eq!(token_from_headers(&map).as_deref(), Some("tok123"));
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer tok456")]);
        assert_eq!(token_from_headers(&map).as_deref(), Some("tok456"));
    }

    #[test]
    fn cookie_takes_precedence_over_header() {
        let map = headers(&[
            (header::COOKIE, "auth_token=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(token_from_headers(&map).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn ignores_empty_cookie_and_non_bearer_schemes() {
        let map = headers(&[(header::COOKIE, "auth_token=")]);
        assert_eq!(token_from_headers(&map), None);

        let map = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwdw==")]);
        assert_eq!(token_from_headers(&map), None);

        assert_eq!(token_from_headers(&HeaderMap::new()), None);
    }
}
