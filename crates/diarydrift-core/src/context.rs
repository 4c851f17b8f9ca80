//! Process-wide application state, passed explicitly to every command.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::auth::{AuthGate, AuthUser, Route};
use crate::models::Settings;
use crate::theme::Theme;

/// Current user, loading flag and theme.
#[derive(Debug, Clone)]
pub struct AppContext {
    current_user: Option<AuthUser>,
    gate: AuthGate,
    loading: Arc<AtomicUsize>,
    theme: Theme,
    settings: Settings,
}

impl AppContext {
    /// Context for a local-only setup with no signed-in user.
    #[must_use]
    pub fn local(settings: Settings) -> Self {
        Self::new(AuthGate::local_only(), None, settings)
    }

    #[must_use]
    pub fn new(gate: AuthGate, current_user: Option<AuthUser>, settings: Settings) -> Self {
        Self {
            current_user,
            gate,
            loading: Arc::new(AtomicUsize::new(0)),
            theme: Theme::from_settings(&settings),
            settings,
        }
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&AuthUser> {
        self.current_user.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.current_user.as_ref().map(|user| user.id.as_str())
    }

    pub fn set_current_user(&mut self, user: Option<AuthUser>) {
        self.current_user = user;
    }

    #[must_use]
    pub const fn gate(&self) -> AuthGate {
        self.gate
    }

    /// Route implied by the gate and the current user.
    #[must_use]
    pub const fn route(&self) -> Route {
        match (self.gate.is_auth_required(), &self.current_user) {
            (true, None) => Route::Login,
            _ => Route::Dashboard,
        }
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire) > 0
    }

    /// Mark the context busy until the guard is dropped.
    ///
    /// Guards nest: the context stays busy while any of them is alive.
    #[must_use]
    pub fn begin_loading(&self) -> LoadingGuard {
        self.loading.fetch_add(1, Ordering::AcqRel);
        LoadingGuard {
            in_flight: Arc::clone(&self.loading),
        }
    }
}

/// Releases one loading slot on drop.
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthUser {
        AuthUser {
            id: "u1".to_string(),
            email: Some("u1@example.com".to_string()),
        }
    }

    #[test]
    fn loading_flag_follows_guard() {
        let context = AppContext::local(Settings::default());
        assert!(!context.is_loading());
        {
            let _guard = context.begin_loading();
            assert!(context.clone().is_loading());
        }
        assert!(!context.is_loading());
    }

    #[test]
    fn overlapping_fetches_keep_context_busy() {
        let context = AppContext::local(Settings::default());
        let older = context.begin_loading();
        let newer = context.clone().begin_loading();

        drop(older);
        assert!(context.is_loading());

        drop(newer);
        assert!(!context.is_loading());
    }

    #[test]
    fn route_depends_on_gate_and_user() {
        let mut context = AppContext::new(AuthGate::required(), None, Settings::default());
        assert_eq!(context.route(), Route::Login);

        context.set_current_user(Some(user()));
        assert_eq!(context.route(), Route::Dashboard);
        assert_eq!(context.user_id(), Some("u1"));

        assert_eq!(AppContext::local(Settings::default()).route(), Route::Dashboard);
    }
}
