pub mod app;
pub mod config;
pub mod identity;
pub mod screen_handlers;
pub mod session_handlers;

pub use app::{build_router, AppState};
