use crate::{
    auth::{Auth, AuthState},
    guard::{LoginGate, RouteGuard},
    route_match::{PathMatcher, RouteMatch, RouteMatcher, RouteSpec},
};
use leptos::prelude::*;
use leptos_router::{hooks::use_location, NestedRoute, PossibleRouteMatch, SsrMode};
use std::sync::Arc;

/// Match result of the enclosing [SecureRoute], provided as context to its view.
#[derive(Clone, Copy, Debug)]
pub struct CurrentRouteMatch(pub Memo<Option<RouteMatch>>);

/// Match result of the enclosing [SecureRoute], for example to read path params.
pub fn use_route_match() -> Option<RouteMatch> {
    use_context::<CurrentRouteMatch>().and_then(|current| current.0.get())
}

/// Reactive state of one rendered [SecureRoute].
pub(crate) struct GuardedRoute<Segments: Send + Sync + 'static> {
    guard: StoredValue<RouteGuard<Segments>>,
    route_match: Memo<Option<RouteMatch>>,
    state: Signal<AuthState>,
}

impl<Segments: Send + Sync + 'static> Clone for GuardedRoute<Segments> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Segments: Send + Sync + 'static> Copy for GuardedRoute<Segments> {}

impl<Segments: Send + Sync + 'static> GuardedRoute<Segments> {
    pub(crate) fn new(
        guard: RouteGuard<Segments>,
        location: Signal<String>,
        state: Signal<AuthState>,
    ) -> Self {
        let guard = StoredValue::new(guard);
        let route_match = Memo::new(move |_| {
            let pathname = location.get();
            guard.with_value(|guard| guard.route_match(&pathname))
        });
        provide_context(CurrentRouteMatch(route_match));
        Self {
            guard,
            route_match,
            state,
        }
    }

    /// Body of the guard effect. Reads the session and the match result, so it reruns
    /// whenever one of them changes.
    pub(crate) fn evaluate(&self) {
        let state = self.state.get();
        let route_matches = self.route_match.with(Option::is_some);
        self.guard.update_value(|guard| {
            guard.evaluate_match(route_matches, state);
        });
    }

    pub(crate) fn visible(&self) -> bool {
        self.state.with(|s| s.is_authenticated) && self.route_match.with(Option::is_some)
    }

    pub(crate) fn gate(&self) -> LoginGate {
        self.guard.with_value(|guard| guard.gate())
    }
}

/// Route which renders `view` only for authenticated sessions. When the location matches and
/// nobody is logged in, `auth.service` is asked once to start the login. `path` and `ssr` are
/// passed to the router unchanged.
#[component(transparent)]
pub fn SecureRoute<Segments, ViewFn, View>(
    path: Segments,
    view: ViewFn,
    auth: Auth,
    #[prop(optional)] exact: bool,
    #[prop(optional)] matcher: Option<Arc<dyn RouteMatcher<Segments>>>,
    #[prop(optional)] ssr: SsrMode,
) -> NestedRoute<Segments, (), (), impl Fn() -> AnyView + Send + Clone>
where
    Segments: PossibleRouteMatch + Clone + Send + Sync + 'static,
    ViewFn: Fn() -> View + Send + Clone + 'static,
    View: IntoView + 'static,
{
    let spec = RouteSpec::new(path.clone()).exact(exact);
    let matcher = matcher.unwrap_or_else(|| Arc::new(PathMatcher));
    let guarded_view = move || {
        let location = use_location();
        let guard =
            RouteGuard::new(spec.clone(), auth.service.clone()).with_matcher(matcher.clone());
        let route = GuardedRoute::new(guard, location.pathname.into(), auth.state);
        // runs after render, in the browser only
        Effect::new(move |_| route.evaluate());

        let view = view.clone();
        (move || route.visible().then(|| view().into_any())).into_any()
    };
    NestedRoute::new(path, guarded_view).ssr_mode(ssr)
}

#[cfg(test)]
mod test {
    use super::*;
    use leptos_router::{ParamSegment, StaticSegment};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_guarded_route_follows_session() {
        let owner = Owner::new();
        owner.set();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let login = move || {
            counter.fetch_add(1, Ordering::SeqCst);
        };
        let spec = RouteSpec::new((
            StaticSegment("article"),
            ParamSegment("title"),
            StaticSegment("edit"),
        ));
        let location = RwSignal::new("/article/Manu_Chao/edit".to_string());
        let session = RwSignal::new(AuthState::anonymous());
        let route = GuardedRoute::new(
            RouteGuard::new(spec, Arc::new(login)),
            location.into(),
            session.into(),
        );

        route.evaluate();
        assert_eq!(1, calls.load(Ordering::SeqCst));
        assert!(!route.visible());
        assert_eq!(LoginGate::LoginInFlight, route.gate());

        // unchanged inputs
        route.evaluate();
        session.set(AuthState::pending());
        route.evaluate();
        assert_eq!(1, calls.load(Ordering::SeqCst));
        assert!(!route.visible());

        session.set(AuthState::authenticated());
        route.evaluate();
        assert!(route.visible());
        assert_eq!(LoginGate::Authenticated, route.gate());
        assert_eq!(1, calls.load(Ordering::SeqCst));
        assert_eq!(
            Some(Some("Manu_Chao".to_string())),
            use_route_match().map(|m| m.params.get("title").cloned())
        );

        // leaving the route while logged out doesn't start a login
        location.set("/search".to_string());
        session.set(AuthState::anonymous());
        route.evaluate();
        assert_eq!(1, calls.load(Ordering::SeqCst));
        assert!(!route.visible());
        assert_eq!(None, use_route_match());
    }
}
