use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("credential must have three dot-separated segments, found {0}")]
    MalformedStructure(usize),
    #[error("credential payload is not valid base64url: {0}")]
    InvalidEncoding(String),
    #[error("malformed claim payload: {0}")]
    InvalidJson(String),
    #[error("credential is missing the '{0}' claim")]
    MissingClaim(&'static str),
    #[error("invalid claim '{0}' with value '{1}'")]
    InvalidClaim(&'static str, String),
    #[error("credential expired at {0}")]
    Expired(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Short label used for log fields and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            SessionError::Expired(_) => "expired",
            SessionError::Store(_) => "store",
            _ => "malformed",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
    #[error("credential store i/o failure on '{path}': {message}")]
    Io { path: String, message: String },
}
