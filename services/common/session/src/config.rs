use std::time::Duration;

/// Runtime configuration for the session gate.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Period of the background revalidation timer.
    pub revalidate_every: Duration,
    /// Whether the load-time inspection also drops expired credentials.
    /// Turning this off keeps an expired credential authenticated until the
    /// first revalidation.
    pub enforce_expiry_on_load: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            revalidate_every: Duration::from_secs(60),
            enforce_expiry_on_load: true,
        }
    }
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust the timer period. Clamped to at least one second.
    pub fn with_revalidate_every(mut self, period: Duration) -> Self {
        self.revalidate_every = period.max(Duration::from_secs(1));
        self
    }

    pub fn with_expiry_on_load(mut self, enforce: bool) -> Self {
        self.enforce_expiry_on_load = enforce;
        self
    }
}
