use common_session::Role;
use smallvec::SmallVec;
use tracing::warn;

use crate::routes::{normalize_path, route_set};
use crate::SecurityError;

/// Flat equality: no hierarchy, no inheritance between roles.
pub fn is_allowed(role: Option<&Role>, required: &Role) -> bool {
    matches!(role, Some(current) if current == required)
}

/// Every role whose route set contains `path`.
pub fn required_roles(path: &str) -> SmallVec<[Role; 4]> {
    let path = normalize_path(path);
    Role::ALL
        .into_iter()
        .filter(|role| route_set(role).is_some_and(|set| set.permits(&path)))
        .collect()
}

pub fn authorize(role: Option<&Role>, path: &str) -> Result<(), SecurityError> {
    let Some(current) = role else {
        return Err(SecurityError::Unauthenticated);
    };

    let required = required_roles(path);
    if required.iter().any(|candidate| is_allowed(role, candidate)) {
        return Ok(());
    }

    warn!(role = %current, path, ?required, "route_check_failed");
    Err(SecurityError::Forbidden {
        role: current.to_string(),
        path: normalize_path(path),
    })
}
