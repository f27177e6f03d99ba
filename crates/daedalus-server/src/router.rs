//! Request routing and path matching.
//!
//! Maps incoming method + path pairs onto the service's [`Operation`]s,
//! extracting `{param}` path parameters along the way.
//!
//! # Example
//!
//! ```rust
//! use daedalus_server::{Operation, Router};
//! use http::Method;
//!
//! let router = Router::with_api_routes();
//! let m = router.match_route(&Method::GET, "/api/projects/42").unwrap();
//! assert_eq!(m.operation(), Operation::GetProject);
//! assert_eq!(m.param("projectId"), Some("42"));
//! ```

use http::Method;
use std::collections::HashMap;

/// The operations exposed at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `POST /api/projects` — ingest an uploaded archive.
    UploadProject,
    /// `GET /api/projects/{projectId}` — project resource.
    GetProject,
    /// `GET /api/uml/plant-uml-code/{projectId}` — text artifact.
    GetUmlText,
    /// `GET /api/uml/svg/{projectId}` — image artifact.
    GetUmlSvg,
    /// `DELETE /api/projects/{projectId}/parsed` — discard the parsed
    /// representation.
    DeleteParsed,
    /// `GET /health` — liveness.
    Health,
}

/// A matched route with extracted path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    operation: Operation,
    params: HashMap<String, String>,
}

impl RouteMatch {
    /// Returns the matched operation.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns a path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
}

/// A registered route.
#[derive(Debug, Clone)]
struct Route {
    method: Method,
    segments: Vec<PathSegment>,
    operation: Operation,
}

impl Route {
    fn new(method: Method, pattern: &str, operation: Operation) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('{') && s.ends_with('}') {
                    PathSegment::Param(s[1..s.len() - 1].to_string())
                } else {
                    PathSegment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            method,
            segments,
            operation,
        }
    }

    fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let actual: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if actual.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (pattern, segment) in self.segments.iter().zip(&actual) {
            match pattern {
                PathSegment::Literal(expected) => {
                    if expected != segment {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    params.insert(name.clone(), (*segment).to_string());
                }
            }
        }
        Some(params)
    }
}

/// HTTP request router.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a router pre-populated with the service's API routes.
    #[must_use]
    pub fn with_api_routes() -> Self {
        let mut router = Self::new();
        router.add_route(Method::POST, "/api/projects", Operation::UploadProject);
        router.add_route(Method::GET, "/api/projects/{projectId}", Operation::GetProject);
        router.add_route(
            Method::GET,
            "/api/uml/plant-uml-code/{projectId}",
            Operation::GetUmlText,
        );
        router.add_route(Method::GET, "/api/uml/svg/{projectId}", Operation::GetUmlSvg);
        router.add_route(
            Method::DELETE,
            "/api/projects/{projectId}/parsed",
            Operation::DeleteParsed,
        );
        router.add_route(Method::GET, "/health", Operation::Health);
        router
    }

    /// Registers a route.
    pub fn add_route(&mut self, method: Method, pattern: &str, operation: Operation) {
        self.routes.push(Route::new(method, pattern, operation));
    }

    /// Matches a request against the registered routes.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route.match_path(path).map(|params| RouteMatch {
                    operation: route.operation,
                    params,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_literal_route() {
        let router = Router::with_api_routes();
        let m = router.match_route(&Method::GET, "/health").unwrap();
        assert_eq!(m.operation(), Operation::Health);
    }

    #[test]
    fn extracts_path_parameters() {
        let router = Router::with_api_routes();
        let m = router
            .match_route(&Method::GET, "/api/uml/plant-uml-code/abc-123")
            .unwrap();
        assert_eq!(m.operation(), Operation::GetUmlText);
        assert_eq!(m.param("projectId"), Some("abc-123"));
    }

    #[test]
    fn method_mismatch_does_not_match() {
        let router = Router::with_api_routes();
        assert!(router.match_route(&Method::GET, "/api/projects").is_none());
        assert!(router
            .match_route(&Method::POST, "/api/projects")
            .is_some());
    }

    #[test]
    fn unknown_path_does_not_match() {
        let router = Router::with_api_routes();
        assert!(router.match_route(&Method::GET, "/api/nope").is_none());
    }

    #[test]
    fn delete_parsed_requires_suffix_segment() {
        let router = Router::with_api_routes();
        let m = router
            .match_route(&Method::DELETE, "/api/projects/xyz/parsed")
            .unwrap();
        assert_eq!(m.operation(), Operation::DeleteParsed);
        assert_eq!(m.param("projectId"), Some("xyz"));
        assert!(router.match_route(&Method::DELETE, "/api/projects/xyz").is_none());
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let router = Router::with_api_routes();
        assert!(router.match_route(&Method::GET, "/health/").is_some());
    }
}
