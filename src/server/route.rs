// src/server/route.rs
use crate::config::{RouteMatching, RouteName};

const ROUTES: [RouteName; 4] = [
    RouteName::About,
    RouteName::Gtg,
    RouteName::Health,
    RouteName::Error,
];

/// Map a request path to the operational route it names, if any.
pub fn resolve_route(path: &str, matching: RouteMatching) -> Option<RouteName> {
    ROUTES.into_iter().find(|route| match matching {
        RouteMatching::Exact => path == route.path(),
        RouteMatching::Suffix => path.ends_with(route.path()),
    })
}
