//! Route classification.
//!
//! # Responsibilities
//! - Store the ordered guard list
//! - Classify a request into exactly one [`RouteClass`]
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan over a handful of guards
//! - First match wins; the fallback arm is mandatory, so there is no NoMatch

use axum::http::Method;

use super::matcher::{Matcher, PathPrefixMatcher};

/// Where a request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Static OpenAPI document from disk.
    DocsAsset,
    /// Swagger UI page.
    DocsViewer,
    /// Internal API router (open and gated groups).
    InternalApi,
    /// Forward unchanged to the backend.
    BackendPassthrough,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::DocsAsset => "docs",
            RouteClass::DocsViewer => "swagger",
            RouteClass::InternalApi => "api",
            RouteClass::BackendPassthrough => "backend",
        }
    }
}

impl std::fmt::Display for RouteClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
struct Guard {
    matcher: Box<dyn Matcher>,
    class: RouteClass,
}

/// Ordered guards ending in a fallback class.
#[derive(Debug)]
pub struct Classifier {
    guards: Vec<Guard>,
    fallback: RouteClass,
}

impl Classifier {
    /// Start an empty classifier; everything falls through to `fallback`.
    pub fn new(fallback: RouteClass) -> Self {
        Self {
            guards: Vec::new(),
            fallback,
        }
    }

    /// Append a guard. Guards are evaluated in insertion order.
    pub fn guard(mut self, matcher: impl Matcher + 'static, class: RouteClass) -> Self {
        self.guards.push(Guard {
            matcher: Box::new(matcher),
            class,
        });
        self
    }

    pub fn classify(&self, method: &Method, path: &str) -> RouteClass {
        self.guards
            .iter()
            .find(|g| g.matcher.matches(method, path))
            .map(|g| g.class)
            .unwrap_or(self.fallback)
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }
}

impl Default for Classifier {
    /// `/docs`, then `/swagger`, then `/api`, else the backend.
    fn default() -> Self {
        Classifier::new(RouteClass::BackendPassthrough)
            .guard(PathPrefixMatcher::new("/docs"), RouteClass::DocsAsset)
            .guard(PathPrefixMatcher::new("/swagger"), RouteClass::DocsViewer)
            .guard(PathPrefixMatcher::new("/api"), RouteClass::InternalApi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(path: &str) -> RouteClass {
        Classifier::default().classify(&Method::GET, path)
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(classify("/docs"), RouteClass::DocsAsset);
        assert_eq!(classify("/docs/swagger.json"), RouteClass::DocsAsset);
        assert_eq!(classify("/swagger"), RouteClass::DocsViewer);
        assert_eq!(classify("/swagger/index.html"), RouteClass::DocsViewer);
        assert_eq!(classify("/api/"), RouteClass::InternalApi);
        assert_eq!(classify("/api/address/search"), RouteClass::InternalApi);
    }

    #[test]
    fn test_fallback() {
        assert_eq!(classify("/"), RouteClass::BackendPassthrough);
        assert_eq!(classify("/anything-else"), RouteClass::BackendPassthrough);
        assert_eq!(classify("/posts/api"), RouteClass::BackendPassthrough);
        assert_eq!(classify("/Docs"), RouteClass::BackendPassthrough);
    }

    #[test]
    fn test_first_match_wins() {
        let classifier = Classifier::new(RouteClass::BackendPassthrough)
            .guard(PathPrefixMatcher::new("/a"), RouteClass::DocsAsset)
            .guard(PathPrefixMatcher::new("/a/b"), RouteClass::InternalApi);
        assert_eq!(classifier.classify(&Method::GET, "/a/b/c"), RouteClass::DocsAsset);
        assert_eq!(classifier.len(), 2);
    }

    #[test]
    fn test_empty_classifier_always_falls_back() {
        let classifier = Classifier::new(RouteClass::InternalApi);
        assert!(classifier.is_empty());
        assert_eq!(classifier.classify(&Method::POST, "/docs"), RouteClass::InternalApi);
    }
}
