//! Route table: registration and request matching.
//!
//! # Responsibilities
//! - Compile and store routes, replacing any earlier route with the same key
//! - Resolve a request to a route plus its extracted path parameters
//!
//! # Design Decisions
//! - Built during startup, immutable while serving (shared by reference)
//! - Method comparison is exact and case-sensitive
//! - Routes whose raw path has no `{` are tried before parameterized ones;
//!   this is a coarse specificity rule, not a segment-count ranking
//! - Within each group, registration order decides (callers must not rely on it)
//! - No match is a normal outcome (`None`), never an error

use crate::http::request::Request;
use crate::routing::matcher::{PathPattern, PatternError};
use crate::routing::route::Route;

#[derive(Debug)]
struct CompiledRoute {
    pattern: PathPattern,
    route: Route,
}

impl CompiledRoute {
    fn same_key(&self, other: &CompiledRoute) -> bool {
        self.route.method() == other.route.method() && self.pattern.as_str() == other.pattern.as_str()
    }
}

/// The set of compiled routes.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a route source.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Result<Self, PatternError> {
        let mut table = Self::new();
        table.register_all(routes)?;
        Ok(table)
    }

    /// Register a route. A route with the same method and compiled pattern
    /// is replaced (last write wins).
    pub fn register(&mut self, route: Route) -> Result<(), PatternError> {
        let compiled = CompiledRoute {
            pattern: PathPattern::compile(route.path())?,
            route,
        };

        match self.routes.iter_mut().find(|existing| existing.same_key(&compiled)) {
            Some(existing) => {
                tracing::debug!(
                    method = %compiled.route.method(),
                    path = %compiled.route.path(),
                    "Route replaced"
                );
                *existing = compiled;
            }
            None => {
                tracing::debug!(
                    method = %compiled.route.method(),
                    path = %compiled.route.path(),
                    "Route registered"
                );
                self.routes.push(compiled);
            }
        }
        Ok(())
    }

    pub fn register_all(&mut self, routes: impl IntoIterator<Item = Route>) -> Result<(), PatternError> {
        for route in routes {
            self.register(route)?;
        }
        Ok(())
    }

    /// Find the route for `request` and write its path parameters onto it.
    ///
    /// The request's route params are only touched when a route matches.
    pub fn match_request(&self, request: &mut Request) -> Option<&Route> {
        let (index, params) = {
            let method = request.method();
            let path = request.path().trim_matches('/');

            let literal = self.routes.iter().enumerate().filter(|(_, c)| !c.route.is_parameterized());
            let parameterized = self.routes.iter().enumerate().filter(|(_, c)| c.route.is_parameterized());

            literal
                .chain(parameterized)
                .filter(|(_, c)| c.route.method() == method)
                .find_map(|(i, c)| c.pattern.captures(path).map(|params| (i, params)))?
        };

        request.set_route_params(params);
        Some(&self.routes[index].route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Registered routes in table order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter().map(|c| &c.route)
    }
}
