use common_session::Role;
use serde::Serialize;
use tracing::debug;

use crate::policy::authorize;
use crate::SecurityError;

/// Where anonymous visitors land (the login screen).
pub const LANDING_PATH: &str = "/";

/// Path prefixes one role may render. A prefix covers itself and anything
/// below it (`/teacher` covers `/teacher/classes` but not `/teachers`).
#[derive(Debug)]
pub struct RouteSet {
    pub home: &'static str,
    pub prefixes: &'static [&'static str],
}

impl RouteSet {
    pub fn permits(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.prefixes
            .iter()
            .any(|prefix| covers(prefix, &path))
    }
}

fn covers(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

const ADMIN_ROUTES: RouteSet = RouteSet {
    home: "/admin",
    prefixes: &[
        "/admin",
        "/manage-users",
        "/manage-states",
        "/manage-centers",
        "/courses",
        "/reports",
    ],
};

const SUPER_ADMIN_ROUTES: RouteSet = RouteSet {
    home: "/super-admin",
    prefixes: &[
        "/super-admin",
        "/manage-admins",
        "/manage-users",
        "/manage-states",
        "/audit-log",
    ],
};

const MANAGER_ROUTES: RouteSet = RouteSet {
    home: "/manager",
    prefixes: &["/manager", "/manage-centers", "/enquiries", "/reports"],
};

const FINANCIAL_ROUTES: RouteSet = RouteSet {
    home: "/financial",
    prefixes: &["/financial", "/fees", "/invoices", "/payouts"],
};

const ACADEMIC_COORDINATOR_ROUTES: RouteSet = RouteSet {
    home: "/academic",
    prefixes: &[
        "/academic",
        "/courses",
        "/batches",
        "/assessments",
        "/assignments",
    ],
};

const STATE_ADMIN_ROUTES: RouteSet = RouteSet {
    home: "/state-admin",
    prefixes: &[
        "/state-admin",
        "/manage-users",
        "/manage-states",
        "/manage-centers",
    ],
};

const CENTER_ADMIN_ROUTES: RouteSet = RouteSet {
    home: "/center-admin",
    prefixes: &[
        "/center-admin",
        "/students",
        "/batches",
        "/attendance",
        "/chat",
    ],
};

const TEACHER_ROUTES: RouteSet = RouteSet {
    home: "/teacher",
    prefixes: &["/teacher", "/attendance", "/assignments", "/chat"],
};

const CARD_ADMIN_ROUTES: RouteSet = RouteSet {
    home: "/card-admin",
    prefixes: &["/card-admin", "/cards"],
};

/// Static route table. Unknown roles have no screens.
pub fn route_set(role: &Role) -> Option<&'static RouteSet> {
    let set = match role {
        Role::Admin => &ADMIN_ROUTES,
        Role::SuperAdmin => &SUPER_ADMIN_ROUTES,
        Role::Manager => &MANAGER_ROUTES,
        Role::Financial => &FINANCIAL_ROUTES,
        Role::AcademicCoordinator => &ACADEMIC_COORDINATOR_ROUTES,
        Role::StateAdmin => &STATE_ADMIN_ROUTES,
        Role::CenterAdmin => &CENTER_ADMIN_ROUTES,
        Role::Teacher => &TEACHER_ROUTES,
        Role::CardAdmin => &CARD_ADMIN_ROUTES,
        Role::Unknown(_) => return None,
    };
    Some(set)
}

/// Drops query and fragment, collapses repeated and trailing slashes and
/// resolves `.` and `..` segments. `..` never climbs above the root.
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
    /// Show the requested screen.
    Render { role: Role, path: String },
    /// Show the landing (login) screen.
    Landing,
    /// Send the client elsewhere without rendering anything.
    Redirect { to: String },
}

/// Router-side consumer of the session role.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    landing: String,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self::new(LANDING_PATH)
    }
}

impl RoutePolicy {
    pub fn new(landing: impl AsRef<str>) -> Self {
        Self {
            landing: normalize_path(landing.as_ref()),
        }
    }

    pub fn landing(&self) -> &str {
        &self.landing
    }

    pub fn decide(&self, role: Option<&Role>, path: &str) -> RouteDecision {
        let path = normalize_path(path);

        if path == self.landing {
            return match role.and_then(route_set) {
                Some(set) => RouteDecision::Redirect {
                    to: set.home.to_string(),
                },
                None => RouteDecision::Landing,
            };
        }

        match (role, authorize(role, &path)) {
            (Some(role), Ok(())) => RouteDecision::Render {
                role: role.clone(),
                path,
            },
            (_, outcome) => {
                let reason = match outcome {
                    Err(SecurityError::Forbidden { .. }) => "forbidden",
                    _ => "unauthenticated",
                };
                debug!(%path, reason, landing = %self.landing, "redirecting to landing path");
                RouteDecision::Redirect {
                    to: self.landing.clone(),
                }
            }
        }
    }
}
