use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

// ============================================================================
// Metrics Module - Prometheus counters for the ordering services
// ============================================================================
//
// Provides metrics for:
// - Orders created (by fuel type)
// - Payments taken (by method and resulting payment status)
// - Status updates (by target status)
// - Auth attempts (by operation and outcome) and the active session gauge
// - Service errors (by service and error kind)
//
// There is no scrape endpoint; callers render the registry with `render()`.
// ============================================================================

/// Central metrics registry shared by the order and auth services
pub struct Metrics {
    registry: Registry,

    // Order Metrics
    pub orders_created: IntCounterVec,
    pub payments: IntCounterVec,
    pub status_updates: IntCounterVec,

    // Auth Metrics
    pub auth_attempts: IntCounterVec,
    pub active_session: IntGauge,

    // Error Metrics
    pub service_errors: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let orders_created = IntCounterVec::new(
            Opts::new("fuel_orders_created_total", "Total fuel orders created"),
            &["fuel_type"],
        )?;
        registry.register(Box::new(orders_created.clone()))?;

        let payments = IntCounterVec::new(
            Opts::new("fuel_order_payments_total", "Total payments recorded against orders"),
            &["method", "payment_status"],
        )?;
        registry.register(Box::new(payments.clone()))?;

        let status_updates = IntCounterVec::new(
            Opts::new("fuel_order_status_updates_total", "Total order status updates"),
            &["status"],
        )?;
        registry.register(Box::new(status_updates.clone()))?;

        let auth_attempts = IntCounterVec::new(
            Opts::new("auth_attempts_total", "Total signup and login attempts"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(auth_attempts.clone()))?;

        let active_session = IntGauge::new(
            "auth_active_session",
            "Whether a user session is currently established (0 or 1)",
        )?;
        registry.register(Box::new(active_session.clone()))?;

        let service_errors = IntCounterVec::new(
            Opts::new("service_errors_total", "Total errors surfaced by services"),
            &["service", "kind"],
        )?;
        registry.register(Box::new(service_errors.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            payments,
            status_updates,
            auth_attempts,
            active_session,
            service_errors,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render every registered metric in the Prometheus text format
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn record_order_created(&self, fuel_type: &str) {
        self.orders_created.with_label_values(&[fuel_type]).inc();
    }

    pub fn record_payment(&self, method: &str, payment_status: &str) {
        self.payments.with_label_values(&[method, payment_status]).inc();
    }

    pub fn record_status_update(&self, status: &str) {
        self.status_updates.with_label_values(&[status]).inc();
    }

    pub fn record_auth_attempt(&self, operation: &str, success: bool) {
        let outcome = if success { "success" } else { "failure" };
        self.auth_attempts.with_label_values(&[operation, outcome]).inc();
    }

    pub fn set_session_active(&self, active: bool) {
        self.active_session.set(i64::from(active));
    }

    pub fn record_error(&self, service: &str, kind: &str) {
        self.service_errors.with_label_values(&[service, kind]).inc();
    }
}
