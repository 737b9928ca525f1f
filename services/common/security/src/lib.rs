//! Role to screen bindings for the portal router.
//!
//! These checks only decide what the portal renders. Backends authorize
//! every request on their own.

pub mod error;
pub mod menu;
pub mod policy;
pub mod routes;

pub use error::SecurityError;
pub use menu::{menu_for, MenuItem};
pub use policy::{authorize, is_allowed, required_roles};
pub use routes::{normalize_path, route_set, RouteDecision, RoutePolicy, RouteSet, LANDING_PATH};
