//! Client-side session gate for the franchise portal.
//!
//! The gate decodes the stored session credential WITHOUT verifying its
//! signature and derives the role the router uses to pick screens. That
//! makes it a navigation aid only: every backend endpoint must authorize
//! each request independently.

pub mod claims;
pub mod clock;
pub mod config;
pub mod error;
pub mod gate;
pub mod revalidation;
pub mod roles;
pub mod signal;
pub mod store;

pub use claims::{decode_unverified, encode_unsigned, SessionClaims};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GateConfig;
pub use error::{SessionError, SessionResult, StoreError, StoreResult};
pub use gate::{SessionGate, SessionGateBuilder, SessionState, Trigger};
pub use revalidation::RevalidationHandle;
pub use roles::Role;
pub use signal::{StorageChange, StorageSignal};
pub use store::{CredentialStore, FileCredentialStore, MemoryCredentialStore, DEFAULT_CREDENTIAL_KEY};
