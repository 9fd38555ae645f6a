//! # Route Descriptors
//!
//! Controllers declare routes as data; the bootstrap turns them into
//! dispatcher entries. This module owns the descriptor types and the
//! mount-path arithmetic, nothing HTTP-aware.

// =============================================================================
// ROUTE SPEC
// =============================================================================

/// One route declared by a controller.
///
/// The pattern is relative to the controller's mount point and uses the
/// dispatcher's parameter syntax (`/greet/{name}`, `/{*path}`). The action
/// is the controller method the route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// Explicit route name; defaults to `"<ClassName>.<action>"`.
    pub name: Option<String>,
    /// URL pattern relative to the mount point.
    pub pattern: String,
    /// Action name the route dispatches to.
    pub action: String,
}

impl RouteSpec {
    /// Declare a route for an action.
    #[must_use]
    pub fn new(pattern: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            name: None,
            pattern: pattern.into(),
            action: action.into(),
        }
    }

    /// Attach an explicit route name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The route's name, qualified with the class name when none was given.
    #[must_use]
    pub fn qualified_name(&self, class_name: &str) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{}.{}", class_name, self.action),
        }
    }
}

// =============================================================================
// MOUNT ARITHMETIC
// =============================================================================

/// Join a route pattern onto a mount point.
///
/// The mount's trailing slash and the pattern's leading slash collapse into
/// one separator; a bare pattern on the root mount stays `/`.
#[must_use]
pub fn join_mount(mount: &str, pattern: &str) -> String {
    let head = mount.trim_end_matches('/');
    let tail = pattern.trim_start_matches('/');
    if tail.is_empty() {
        if head.is_empty() {
            "/".to_string()
        } else {
            head.to_string()
        }
    } else {
        format!("{head}/{tail}")
    }
}

// =============================================================================
// MOUNTED ROUTE
// =============================================================================

/// The bootstrap's record of one route it actually mounted.
///
/// `bob go` prints these as the startup table; tests read them to check
/// what ended up where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedRoute {
    /// Qualified route name.
    pub name: String,
    /// Absolute URL path as mounted.
    pub path: String,
    /// Controller class name.
    pub controller: String,
    /// Action the path dispatches to.
    pub action: String,
}

// =============================================================================
// TESTS
// =============================================================================
