use serde::{Deserialize, Serialize};

use crate::auth::repo_types::Role;

/// Session JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,     // user ID
    pub email: String,
    pub role: Role,
    pub iat: i64,     // issued at (unix timestamp)
    pub exp: i64,     // expires at (unix timestamp)
    pub iss: String,  // issuer
    pub aud: String,  // audience
}
