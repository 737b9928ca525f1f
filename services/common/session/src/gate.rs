use std::fmt;
use std::sync::Arc;

use common_observability::GateMetrics;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::claims::{decode_unverified, SessionClaims};
use crate::clock::{Clock, SystemClock};
use crate::config::GateConfig;
use crate::error::{SessionError, SessionResult};
use crate::roles::Role;
use crate::signal::StorageSignal;
use crate::store::CredentialStore;

/// What the router may show right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "role", rename_all = "snake_case")]
pub enum SessionState {
    Anonymous,
    Authenticated(Role),
}

impl SessionState {
    pub fn role(&self) -> Option<&Role> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(role) => Some(role),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

/// Why the gate looked at the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Load,
    Timer,
    StorageEvent,
    Manual,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Load => "load",
            Trigger::Timer => "timer",
            Trigger::StorageEvent => "storage_event",
            Trigger::Manual => "manual",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side authentication state derived from the stored credential.
///
/// Cheap to clone; clones observe and mutate the same state. The role it
/// reports comes from an unverified credential and only decides which
/// screens are offered.
#[derive(Clone)]
pub struct SessionGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    origin: Uuid,
    config: GateConfig,
    store: Arc<dyn CredentialStore>,
    signal: StorageSignal,
    clock: Arc<dyn Clock>,
    metrics: Option<GateMetrics>,
    state: watch::Sender<SessionState>,
}

impl SessionGate {
    pub fn builder(store: Arc<dyn CredentialStore>) -> SessionGateBuilder {
        SessionGateBuilder::new(store)
    }

    pub fn origin(&self) -> Uuid {
        self.inner.origin
    }

    pub fn key(&self) -> &str {
        self.inner.store.key()
    }

    pub fn config(&self) -> &GateConfig {
        &self.inner.config
    }

    pub fn signal(&self) -> &StorageSignal {
        &self.inner.signal
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.inner.state.borrow().role().cloned()
    }

    /// Receiver that wakes whenever the state actually changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Load-time inspection of the credential store.
    ///
    /// Drops undecodable credentials. Expired credentials are dropped too
    /// unless `enforce_expiry_on_load` is off.
    pub fn initialize(&self) -> SessionState {
        let check_expiry = self.inner.config.enforce_expiry_on_load;
        self.inspect(Trigger::Load, check_expiry)
    }

    /// Re-reads the store and collapses to anonymous on a missing,
    /// undecodable or expired credential. Never fails.
    pub fn revalidate(&self) -> SessionState {
        self.revalidate_with(Trigger::Manual)
    }

    pub(crate) fn revalidate_with(&self, trigger: Trigger) -> SessionState {
        self.inspect(trigger, true)
    }

    /// Persists a freshly issued credential and adopts its role.
    ///
    /// The credential is decoded and checked against the same expiry rule
    /// as `initialize` before anything is written, so a rejected credential
    /// leaves the store untouched.
    pub fn establish_session(&self, credential: &str) -> SessionResult<Role> {
        let credential = credential.trim();
        let claims = match self.validate(credential, self.inner.config.enforce_expiry_on_load) {
            Ok(claims) => claims,
            Err(err) => {
                warn!(error = %err, reason = err.reason(), "rejected credential from login flow");
                self.record_establish(match err {
                    SessionError::Expired(_) => "expired",
                    _ => "rejected",
                });
                return Err(err);
            }
        };

        if let Err(err) = self.inner.store.save(credential) {
            warn!(error = %err, key = self.key(), "unable to persist session credential");
            self.record_establish("store_error");
            return Err(SessionError::from(err));
        }

        let role = claims.role;
        self.publish(SessionState::Authenticated(role.clone()));
        self.broadcast();
        self.record_establish("ok");
        info!(%role, origin = %self.origin(), "session established");
        Ok(role)
    }

    /// Logs out locally and tells sibling contexts to re-check.
    ///
    /// If the credential cannot be removed the state is left as it was and
    /// the store error is returned; the credential would otherwise come
    /// back on the next revalidation.
    pub fn clear_session(&self) -> SessionResult<()> {
        if let Err(err) = self.inner.store.remove() {
            warn!(error = %err, key = self.key(), "unable to remove session credential");
            return Err(SessionError::from(err));
        }
        let was_authenticated = self.state().is_authenticated();
        self.publish(SessionState::Anonymous);
        self.broadcast();
        if was_authenticated {
            if let Some(metrics) = &self.inner.metrics {
                metrics.cleared("logout");
            }
            info!(origin = %self.origin(), "session cleared");
        }
        Ok(())
    }

    fn inspect(&self, trigger: Trigger, check_expiry: bool) -> SessionState {
        if let Some(metrics) = &self.inner.metrics {
            metrics.revalidation(trigger.as_str());
        }

        let credential = match self.inner.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => return self.publish(SessionState::Anonymous),
            Err(err) => {
                warn!(error = %err, %trigger, "credential store unreadable; treating as empty");
                return self.publish(SessionState::Anonymous);
            }
        };

        match self.validate(&credential, check_expiry) {
            Ok(claims) => {
                debug!(%trigger, role = %claims.role, "credential accepted");
                self.publish(SessionState::Authenticated(claims.role))
            }
            Err(err) => {
                self.discard(&err, trigger);
                self.publish(SessionState::Anonymous)
            }
        }
    }

    fn validate(&self, credential: &str, check_expiry: bool) -> SessionResult<SessionClaims> {
        let claims = decode_unverified(credential)?;
        if check_expiry {
            let now = self.inner.clock.now_unix();
            if let Some(exp) = claims.expires_at.filter(|_| claims.is_expired_at(now)) {
                return Err(SessionError::Expired(exp));
            }
        }
        Ok(claims)
    }

    fn discard(&self, err: &SessionError, trigger: Trigger) {
        let reason = err.reason();
        match err {
            SessionError::Expired(exp) => {
                info!(%trigger, exp, reason, "stored credential expired; clearing")
            }
            other => warn!(%trigger, error = %other, reason, "stored credential unusable; clearing"),
        }

        match self.inner.store.remove() {
            Ok(()) => self.broadcast(),
            Err(store_err) => warn!(error = %store_err, "unable to remove stale credential"),
        }
        if let Some(metrics) = &self.inner.metrics {
            metrics.cleared(reason);
        }
    }

    fn publish(&self, next: SessionState) -> SessionState {
        let authenticated = next.is_authenticated();
        let published = next.clone();
        self.inner.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if let Some(metrics) = &self.inner.metrics {
            metrics.set_authenticated(authenticated);
        }
        published
    }

    fn broadcast(&self) {
        self.inner.signal.notify(self.key(), self.inner.origin);
    }

    fn record_establish(&self, outcome: &str) {
        if let Some(metrics) = &self.inner.metrics {
            metrics.establish(outcome);
        }
    }
}

pub struct SessionGateBuilder {
    store: Arc<dyn CredentialStore>,
    config: GateConfig,
    signal: Option<StorageSignal>,
    clock: Arc<dyn Clock>,
    metrics: Option<GateMetrics>,
}

impl SessionGateBuilder {
    fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            config: GateConfig::default(),
            signal: None,
            clock: Arc::new(SystemClock),
            metrics: None,
        }
    }

    pub fn with_config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a signal with sibling gates over the same store.
    pub fn with_signal(mut self, signal: StorageSignal) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_metrics(mut self, metrics: GateMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the gate and runs [`SessionGate::initialize`] before
    /// returning, so the first authorization check already sees the
    /// stored session.
    pub fn build(self) -> SessionGate {
        let (state, _) = watch::channel(SessionState::Anonymous);
        let gate = SessionGate {
            inner: Arc::new(GateInner {
                origin: Uuid::new_v4(),
                config: self.config,
                store: self.store,
                signal: self.signal.unwrap_or_default(),
                clock: self.clock,
                metrics: self.metrics,
                state,
            }),
        };
        let initial = gate.initialize();
        debug!(origin = %gate.origin(), state = ?initial, "session gate initialised");
        gate
    }
}
