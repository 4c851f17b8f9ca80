//! Routing decision between the sign-in flow and the dashboard.

use super::AuthSession;

/// Where a command may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

/// Decides whether dashboard screens are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthGate {
    auth_required: bool,
}

impl AuthGate {
    /// Gate for a profile with auth endpoints configured.
    #[must_use]
    pub const fn required() -> Self {
        Self {
            auth_required: true,
        }
    }

    /// Gate for a local-only setup: everyone is the single anonymous user.
    #[must_use]
    pub const fn local_only() -> Self {
        Self {
            auth_required: false,
        }
    }

    #[must_use]
    pub const fn is_auth_required(&self) -> bool {
        self.auth_required
    }

    #[must_use]
    pub const fn route(&self, session: Option<&AuthSession>) -> Route {
        match (self.auth_required, session) {
            (false, _) | (true, Some(_)) => Route::Dashboard,
            (true, None) => Route::Login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;

    fn session() -> AuthSession {
        AuthSession {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: i64::MAX,
            user: AuthUser {
                id: "u".to_string(),
                email: None,
            },
        }
    }

    #[test]
    fn routes_by_session_presence() {
        let gate = AuthGate::required();
        assert_eq!(gate.route(None), Route::Login);
        assert_eq!(gate.route(Some(&session())), Route::Dashboard);
    }

    #[test]
    fn local_only_always_reaches_dashboard() {
        assert_eq!(AuthGate::local_only().route(None), Route::Dashboard);
    }
}
