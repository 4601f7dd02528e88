//! Route guard for Leptos apps: protected content is only rendered for authenticated
//! sessions, and the login flow of an external auth provider is started otherwise.
//!
//! ```ignore
//! let auth = Auth::new(auth_state, move || provider.login());
//! view! {
//!     <Router>
//!         <Routes fallback=|| "Not found">
//!             <Route path=path!("/") view=ReadArticle />
//!             <SecureRoute path=path!("/article/:title/edit") view=EditArticle auth />
//!         </Routes>
//!     </Router>
//! }
//! ```

pub mod auth;
pub mod components;
pub mod config;
pub mod error;
pub mod guard;
pub mod route_match;

pub use auth::{Auth, AuthService, AuthState};
pub use components::secure_route::{
    use_route_match, CurrentRouteMatch, SecureRoute, SecureRouteProps,
};
pub use error::{GuardError, GuardResult};
pub use guard::{GateDecision, GuardOutcome, LoginGate, RouteGuard};
pub use route_match::{MatchOptions, PathMatcher, RouteMatch, RouteMatcher, RouteSpec};
