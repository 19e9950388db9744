//! Path classification and the access decision table.
//!
//! Pure functions, evaluated once per request before any handler runs.

use crate::auth::repo_types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_HOME: &str = "/admin";
pub const USER_HOME: &str = "/account";

/// Access-policy bucket for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Admin area, admins only.
    Admin,
    /// Signed-in area for any role.
    UserProtected,
    /// Login and registration pages; signed-in users are sent home.
    AuthOnly,
    /// Everything else.
    Unrestricted,
}

fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub fn classify(path: &str) -> PathClass {
    if under(path, "/admin") {
        PathClass::Admin
    } else if under(path, "/account") || under(path, "/bookings") {
        PathClass::UserProtected
    } else if path == "/login" || path == "/register" {
        PathClass::AuthOnly
    } else {
        PathClass::Unrestricted
    }
}

/// Outcome of the access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    RedirectToLogin,
    RedirectToAdminHome,
    RedirectToUserHome,
}

impl AccessDecision {
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectToLogin => Some(LOGIN_PATH),
            AccessDecision::RedirectToAdminHome => Some(ADMIN_HOME),
            AccessDecision::RedirectToUserHome => Some(USER_HOME),
        }
    }
}

/// Decide the outcome for a path class and the role of a validated session,
/// if any. An invalid or expired token must be passed as `None`; the caller
/// never surfaces validation detail to the client.
pub fn decide(class: PathClass, session: Option<Role>) -> AccessDecision {
    match class {
        PathClass::Unrestricted => AccessDecision::Allow,
        PathClass::Admin => match session {
            Some(Role::Admin) => AccessDecision::Allow,
            _ => AccessDecision::RedirectToLogin,
        },
        PathClass::UserProtected => match session {
            Some(_) => AccessDecision::Allow,
            None => AccessDecision::RedirectToLogin,
        },
        PathClass::AuthOnly => match session {
            Some(Role::Admin) => AccessDecision::RedirectToAdminHome,
            Some(_) => AccessDecision::RedirectToUserHome,
            None => AccessDecision::Allow,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_admin_paths() {
        assert_eq!(classify("/admin"), PathClass::Admin);
        assert_eq!(classify("/admin/dashboard"), PathClass::Admin);
        // A shared prefix is not enough.
        assert_eq!(classify("/administrator"), PathClass::Unrestricted);
    }

    #[test]
    fn classifies_user_paths() {
        assert_eq!(classify("/account"), PathClass::UserProtected);
        assert_eq!(classify("/account/profile"), PathClass::UserProtected);
        assert_eq!(classify("/bookings"), PathClass::UserProtected);
        assert_eq!(classify("/bookings/42"), PathClass::UserProtected);
    }

    #[test]
    fn classifies_auth_pages_exactly() {
        assert_eq!(classify("/login"), PathClass::AuthOnly);
        assert_eq!(classify("/register"), PathClass::AuthOnly);
        assert_eq!(classify("/login/reset"), PathClass::Unrestricted);
    }

    #[test]
    fn everything_else_is_unrestricted() {
        assert_eq!(classify("/"), PathClass::Unrestricted);
        assert_eq!(classify("/schedule"), PathClass::Unrestricted);
        assert_eq!(classify("/auth/verify"), PathClass::Unrestricted);
    }

    #[test]
    fn admin_paths_require_the_admin_role() {
        assert_eq!(decide(PathClass::Admin, None), AccessDecision::RedirectToLogin);
        assert_eq!(
            decide(PathClass::Admin, Some(Role::Client)),
            AccessDecision::RedirectToLogin
        );
        assert_eq!(
            decide(PathClass::Admin, Some(Role::Instructor)),
            AccessDecision::RedirectToLogin
        );
        assert_eq!(decide(PathClass::Admin, Some(Role::Admin)), AccessDecision::Allow);
    }

    #[test]
    fn user_paths_accept_any_valid_session() {
        assert_eq!(
            decide(PathClass::UserProtected, None),
            AccessDecision::RedirectToLogin
        );
        assert_eq!(
            decide(PathClass::UserProtected, Some(Role::Client)),
            AccessDecision::Allow
        );
        assert_eq!(
            decide(PathClass::UserProtected, Some(Role::Admin)),
            AccessDecision::Allow
        );
    }

    #[test]
    fn auth_pages_send_signed_in_users_home() {
        assert_eq!(decide(PathClass::AuthOnly, None), AccessDecision::Allow);
        assert_eq!(
            decide(PathClass::AuthOnly, Some(Role::Admin)),
            AccessDecision::RedirectToAdminHome
        );
        assert_eq!(
            decide(PathClass::AuthOnly, Some(Role::Client)),
            AccessDecision::RedirectToUserHome
        );
        assert_eq!(
            decide(PathClass::AuthOnly, Some(Role::Instructor)),
            AccessDecision::RedirectToUserHome
        );
    }

    #[test]
    fn unrestricted_paths_ignore_the_session() {
        assert_eq!(decide(PathClass::Unrestricted, None), AccessDecision::Allow);
        assert_eq!(
            decide(PathClass::Unrestricted, Some(Role::Admin)),
            AccessDecision::Allow
        );
    }

    #[test]
    fn redirect_targets() {
        assert_eq!(AccessDecision::Allow.redirect_target(), None);
        assert_eq!(
            AccessDecision::RedirectToLogin.redirect_target(),
            Some("/login")
        );
        assert_eq!(
            AccessDecision::RedirectToAdminHome.redirect_target(),
            Some("/admin")
        );
        assert_eq!(
            AccessDecision::RedirectToUserHome.redirect_target(),
            Some("/account")
        );
    }
}
