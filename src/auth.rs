use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{fmt::Debug, sync::Arc};

/// Snapshot of the session as reported by the auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
pub struct AuthState {
    pub is_authenticated: bool,
    /// Provider is still restoring the session or a login is running
    #[default(true)]
    pub is_pending: bool,
}

impl AuthState {
    pub fn authenticated() -> Self {
        Self {
            is_authenticated: true,
            is_pending: false,
        }
    }

    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            is_pending: false,
        }
    }

    pub fn pending() -> Self {
        Self::default()
    }
}

/// Starts the interactive login flow of the auth provider.
///
/// The guard only calls [AuthService::login] and then waits for [AuthState] to change, so
/// implementations report completion (or failure) through the state they own.
pub trait AuthService: Send + Sync {
    fn login(&self);
}

impl<F> AuthService for F
where
    F: Fn() + Send + Sync,
{
    fn login(&self) {
        self()
    }
}

/// Auth capabilities handed to a guarded route.
#[derive(Clone)]
pub struct Auth {
    pub state: Signal<AuthState>,
    pub service: Arc<dyn AuthService>,
}

impl Auth {
    pub fn new(state: impl Into<Signal<AuthState>>, service: impl AuthService + 'static) -> Self {
        Self {
            state: state.into(),
            service: Arc::new(service),
        }
    }
}

impl Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("state", &self.state.try_get_untracked())
            .finish_non_exhaustive()
    }
}
