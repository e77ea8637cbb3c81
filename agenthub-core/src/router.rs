//! Static routing table
//!
//! Four paths map to four pages. There are no guards and no async
//! resolution; path parameters reach the page exactly as written in the URL
//! (percent-decoded, otherwise unvalidated).

use std::collections::BTreeMap;

/// Page-level views the router can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Overview,
    AgentHub,
    ProjectDetail,
    AgentRunOutput,
}

/// One row of the routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    pub name: &'static str,
    pub pattern: &'static str,
    pub page: Page,
}

pub const ROUTES: [RouteDef; 4] = [
    RouteDef {
        name: "Overview",
        pattern: "/",
        page: Page::Overview,
    },
    RouteDef {
        name: "AgentHub",
        pattern: "/agent-hub",
        page: Page::AgentHub,
    },
    RouteDef {
        name: "ProjectDetail",
        pattern: "/projects/:id",
        page: Page::ProjectDetail,
    },
    RouteDef {
        name: "AgentRunOutput",
        pattern: "/agent-runs/:id",
        page: Page::AgentRunOutput,
    },
];

/// A resolved path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static RouteDef,
    pub params: BTreeMap<String, String>,
}

impl RouteMatch {
    pub fn page(&self) -> Page {
        self.route.page
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

impl Page {
    pub fn route(&self) -> &'static RouteDef {
        // Every page has exactly one row in ROUTES.
        match self {
            Page::Overview => &ROUTES[0],
            Page::AgentHub => &ROUTES[1],
            Page::ProjectDetail => &ROUTES[2],
            Page::AgentRunOutput => &ROUTES[3],
        }
    }

    /// Build the path for this page, filling `:name` segments from `params`.
    /// Returns `None` when a parameter is missing.
    pub fn href(&self, params: &[(&str, &str)]) -> Option<String> {
        let pattern = self.route().pattern;
        if pattern == "/" {
            return Some("/".to_string());
        }

        let mut path = String::new();
        for segment in segments(pattern)? {
            path.push('/');
            match segment.strip_prefix(':') {
                Some(name) => {
                    let (_, value) = params.iter().find(|(k, _)| *k == name)?;
                    path.push_str(&urlencoding::encode(value));
                }
                None => path.push_str(segment),
            }
        }
        Some(path)
    }
}

/// Resolve a path (query string and fragment allowed) to a route.
pub fn resolve(path: &str) -> Option<RouteMatch> {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path_segments = segments(path)?;

    ROUTES.iter().find_map(|route| {
        let pattern = segments(route.pattern)?;
        if pattern.len() != path_segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (expected, actual) in pattern.iter().zip(&path_segments) {
            match expected.strip_prefix(':') {
                Some(name) => {
                    let value = urlencoding::decode(actual)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| actual.to_string());
                    params.insert(name.to_string(), value);
                }
                None if expected.eq_ignore_ascii_case(actual) => {}
                None => return None,
            }
        }

        Some(RouteMatch { route, params })
    })
}

/// Path segments after dropping one leading and one trailing slash.
/// `None` when an empty segment remains, e.g. `/projects//42`.
fn segments(path: &str) -> Option<Vec<&str>> {
    let path = match path {
        "" | "/" => return Some(Vec::new()),
        p => p.strip_suffix('/').unwrap_or(p),
    };
    let path = path.strip_prefix('/').unwrap_or(path);
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments)
}
