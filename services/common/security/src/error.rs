use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecurityError {
    #[error("no authenticated session")]
    Unauthenticated,
    #[error("role '{role}' may not open '{path}'")]
    Forbidden { role: String, path: String },
}
