//! Route guard for the protected area.
//!
//! The policy is evaluated reactively on `(is_authenticated, path)` changes,
//! not as a blocking check: a protected view may render briefly before the
//! redirect fires, so views must tolerate a short unauthenticated mount.

/// Public entry view (login)
pub const LOGIN_PATH: &str = "/";

/// Protected home view; everything under this prefix requires a session
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Decide whether the current path requires a redirect.
///
/// Unauthenticated visitors under the protected area are sent to the login
/// view; authenticated ones sitting on the login view are sent to the
/// dashboard. Any other combination stays put.
pub fn redirect_for(authenticated: bool, path: &str) -> Option<&'static str> {
    if path.starts_with(DASHBOARD_PATH) && !authenticated {
        return Some(LOGIN_PATH);
    }
    if path == LOGIN_PATH && authenticated {
        return Some(DASHBOARD_PATH);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_on_dashboard_is_sent_to_login() {
        assert_eq!(redirect_for(false, "/dashboard"), Some(LOGIN_PATH));
        assert_eq!(redirect_for(false, "/dashboard/settings"), Some(LOGIN_PATH));
    }

    #[test]
    fn authenticated_on_login_is_sent_to_dashboard() {
        assert_eq!(redirect_for(true, "/"), Some(DASHBOARD_PATH));
    }

    #[test]
    fn authenticated_in_protected_area_stays_put() {
        assert_eq!(redirect_for(true, "/dashboard"), None);
        assert_eq!(redirect_for(true, "/dashboard/settings"), None);
    }

    #[test]
    fn anonymous_on_login_stays_put() {
        assert_eq!(redirect_for(false, "/"), None);
    }
}
