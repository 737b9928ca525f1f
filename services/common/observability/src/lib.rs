use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

/// Counters describing session gate activity.
#[derive(Clone)]
pub struct GateMetrics {
    pub registry: Registry,
    pub revalidations_total: IntCounterVec,
    pub sessions_cleared_total: IntCounterVec,
    pub establish_total: IntCounterVec,
    pub authenticated: IntGauge,
}

impl GateMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let revalidations_total = IntCounterVec::new(
            Opts::new(
                "session_revalidations_total",
                "Session revalidations grouped by trigger",
            ),
            &["trigger"],
        )?;
        let sessions_cleared_total = IntCounterVec::new(
            Opts::new(
                "session_cleared_total",
                "Stored credentials dropped, grouped by reason",
            ),
            &["reason"],
        )?;
        let establish_total = IntCounterVec::new(
            Opts::new(
                "session_establish_total",
                "Attempts to establish a session grouped by outcome",
            ),
            &["outcome"],
        )?;
        let authenticated = IntGauge::new(
            "session_authenticated",
            "1 while the gate holds an authenticated role",
        )?;

        registry.register(Box::new(revalidations_total.clone()))?;
        registry.register(Box::new(sessions_cleared_total.clone()))?;
        registry.register(Box::new(establish_total.clone()))?;
        registry.register(Box::new(authenticated.clone()))?;

        Ok(Self {
            registry,
            revalidations_total,
            sessions_cleared_total,
            establish_total,
            authenticated,
        })
    }

    pub fn revalidation(&self, trigger: &str) {
        self.revalidations_total.with_label_values(&[trigger]).inc();
    }

    pub fn cleared(&self, reason: &str) {
        self.sessions_cleared_total.with_label_values(&[reason]).inc();
    }

    pub fn establish(&self, outcome: &str) {
        self.establish_total.with_label_values(&[outcome]).inc();
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.authenticated.set(i64::from(authenticated));
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}
