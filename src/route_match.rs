use leptos_router::PossibleRouteMatch;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{borrow::Cow, collections::BTreeMap};

/// Flags controlling how a [RouteSpec] is compared against a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct MatchOptions {
    /// The whole location has to be consumed by the path. A single trailing slash is ignored.
    #[default(false)]
    pub exact: bool,
}

/// Result of matching a [RouteSpec] against the current location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    /// Matched portion of the location
    pub url: String,
    pub is_exact: bool,
    pub params: BTreeMap<String, String>,
}

/// Which locations a guarded route responds to. `segments` are the same router segments
/// given to the route, usually built with `leptos_router::path!`.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSpec<Segments> {
    segments: Segments,
    options: MatchOptions,
}

impl<Segments> RouteSpec<Segments> {
    pub fn new(segments: Segments) -> Self {
        Self {
            segments,
            options: MatchOptions::default(),
        }
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.options.exact = exact;
        self
    }

    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn segments(&self) -> &Segments {
        &self.segments
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }
}

impl RouteSpec<()> {
    /// Spec without a path. It matches every location.
    pub fn pathless() -> Self {
        Self::new(())
    }
}

/// Decides whether a location is covered by a [RouteSpec].
pub trait RouteMatcher<Segments>: Send + Sync {
    fn match_route(&self, spec: &RouteSpec<Segments>, location: &str) -> Option<RouteMatch>;
}

impl<F, Segments> RouteMatcher<Segments> for F
where
    F: Fn(&RouteSpec<Segments>, &str) -> Option<RouteMatch> + Send + Sync,
{
    fn match_route(&self, spec: &RouteSpec<Segments>, location: &str) -> Option<RouteMatch> {
        self(spec, location)
    }
}

/// Default matcher, using the segment matching of `leptos_router`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathMatcher;

impl<Segments> RouteMatcher<Segments> for PathMatcher
where
    Segments: PossibleRouteMatch + Send + Sync,
{
    fn match_route(&self, spec: &RouteSpec<Segments>, location: &str) -> Option<RouteMatch> {
        let location = normalize_location(location);
        let partial = spec.segments.test(&location)?;
        let remaining = partial.remaining();
        // segments match on prefixes, the rest has to start a new segment
        if !remaining.is_empty() && !remaining.starts_with('/') {
            return None;
        }
        let unmatched = if remaining == "/" { 0 } else { remaining.len() };
        let is_exact = unmatched == 0;
        if spec.options.exact && !is_exact {
            return None;
        }

        let url = match &location[..location.len() - unmatched] {
            "" => "/".to_string(),
            url => url.to_string(),
        };
        let params = partial
            .params()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Some(RouteMatch {
            url,
            is_exact,
            params,
        })
    }
}

fn normalize_location(location: &str) -> Cow<'_, str> {
    if location.starts_with('/') {
        Cow::Borrowed(location)
    } else {
        Cow::Owned(format!("/{location}"))
    }
}
