use crate::{
    auth::{AuthService, AuthState},
    route_match::{PathMatcher, RouteMatch, RouteMatcher, RouteSpec},
};
use leptos_router::PossibleRouteMatch;
use log::{debug, info, trace};
use std::{fmt::Debug, sync::Arc};

/// Login progress of a single guard instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoginGate {
    /// No login was started yet, or the previous session ended
    #[default]
    Idle,
    /// `login()` was called and the session is not authenticated yet
    LoginInFlight,
    Authenticated,
}

/// What a single evaluation of the gate decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    /// `AuthService::login()` has to be called now
    pub start_login: bool,
    /// Protected content may be shown
    pub render: bool,
}

impl LoginGate {
    /// Advances the gate for one evaluation of the guard.
    ///
    /// Nothing changes while the route doesn't match. A login is started at most once until
    /// the session becomes authenticated again.
    pub fn advance(&mut self, route_matches: bool, state: AuthState) -> GateDecision {
        let render = state.is_authenticated;
        if !route_matches {
            return GateDecision {
                start_login: false,
                render,
            };
        }

        let next = if state.is_authenticated {
            LoginGate::Authenticated
        } else if !state.is_pending && *self != LoginGate::LoginInFlight {
            LoginGate::LoginInFlight
        } else {
            *self
        };
        let start_login = next == LoginGate::LoginInFlight && *self != LoginGate::LoginInFlight;
        if next != *self {
            debug!("Login gate {:?} -> {:?}", self, next);
        } else if next == LoginGate::LoginInFlight && !state.is_authenticated {
            trace!("Login already in flight, not starting another one");
        }
        *self = next;

        GateDecision {
            start_login,
            render,
        }
    }

    pub fn login_in_flight(&self) -> bool {
        *self == LoginGate::LoginInFlight
    }
}

/// Result of [RouteGuard::evaluate].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    pub route_match: Option<RouteMatch>,
    pub login_started: bool,
    pub render: bool,
}

/// Renders a route only for authenticated sessions and starts the login flow otherwise.
///
/// The guard owns its [LoginGate]. Route matching and login are injected capabilities.
pub struct RouteGuard<Segments> {
    spec: RouteSpec<Segments>,
    matcher: Arc<dyn RouteMatcher<Segments>>,
    service: Arc<dyn AuthService>,
    gate: LoginGate,
}

impl<Segments> RouteGuard<Segments>
where
    Segments: PossibleRouteMatch + Send + Sync + 'static,
{
    pub fn new(spec: RouteSpec<Segments>, service: Arc<dyn AuthService>) -> Self {
        Self {
            spec,
            matcher: Arc::new(PathMatcher),
            service,
            gate: LoginGate::default(),
        }
    }
}

impl<Segments> RouteGuard<Segments> {
    pub fn with_matcher(mut self, matcher: Arc<dyn RouteMatcher<Segments>>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn spec(&self) -> &RouteSpec<Segments> {
        &self.spec
    }

    pub fn gate(&self) -> LoginGate {
        self.gate
    }

    pub fn route_match(&self, location: &str) -> Option<RouteMatch> {
        self.matcher.match_route(&self.spec, location)
    }

    /// Runs one evaluation for the given location and session state, calling
    /// `AuthService::login()` if needed.
    pub fn evaluate(&mut self, location: &str, state: AuthState) -> GuardOutcome {
        let route_match = self.route_match(location);
        let decision = self.evaluate_match(route_match.is_some(), state);
        GuardOutcome {
            route_match,
            login_started: decision.start_login,
            render: decision.render,
        }
    }

    /// Same as [RouteGuard::evaluate] for callers which already matched the route.
    pub fn evaluate_match(&mut self, route_matches: bool, state: AuthState) -> GateDecision {
        let decision = self.gate.advance(route_matches, state);
        if decision.start_login {
            info!("Session is not authenticated, starting login");
            self.service.login();
        }
        decision
    }

    /// Evaluates the guard and renders the wrapped route if the session is authenticated.
    /// The route receives the spec and match result unchanged and decides itself what to show
    /// for a location it doesn't match.
    pub fn render<V>(
        &mut self,
        location: &str,
        state: AuthState,
        route: impl FnOnce(&RouteSpec<Segments>, Option<&RouteMatch>) -> V,
    ) -> Option<V> {
        let outcome = self.evaluate(location, state);
        if !outcome.render {
            return None;
        }
        Some(route(&self.spec, outcome.route_match.as_ref()))
    }
}

impl<Segments> Debug for RouteGuard<Segments> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("options", &self.spec.options())
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}
