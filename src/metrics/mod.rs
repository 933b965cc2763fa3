use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

// ============================================================================
// Metrics Module - Prometheus metrics for the dispatch loop
// ============================================================================
//
// Provides metrics for:
// - Order intake and completion
// - Dispatch outcomes and latency
// - Courier movement
//
// ============================================================================

pub struct DispatchMetrics {
    registry: Registry,

    // Order Lifecycle
    pub orders_created: IntCounter,
    pub orders_assigned: IntCounter,
    pub orders_completed: IntCounter,

    // Dispatch
    pub dispatch_failures: IntCounterVec,
    pub dispatch_duration: Histogram,

    // Couriers
    pub couriers_registered: IntCounter,
    pub courier_moves: IntCounter,
}

impl DispatchMetrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let orders_created = IntCounter::new("orders_created_total", "Total orders accepted")?;
        registry.register(Box::new(orders_created.clone()))?;

        let orders_assigned = IntCounter::new("orders_assigned_total", "Total orders assigned to a courier")?;
        registry.register(Box::new(orders_assigned.clone()))?;

        let orders_completed = IntCounter::new("orders_completed_total", "Total orders delivered")?;
        registry.register(Box::new(orders_completed.clone()))?;

        let dispatch_failures = IntCounterVec::new(
            Opts::new("dispatch_failures_total", "Dispatch attempts that assigned nothing"),
            &["reason"],
        )?;
        registry.register(Box::new(dispatch_failures.clone()))?;

        let dispatch_duration = Histogram::with_opts(
            HistogramOpts::new("dispatch_duration_seconds", "Courier selection duration")
                .buckets(vec![0.00001, 0.0001, 0.001, 0.01, 0.1]),
        )?;
        registry.register(Box::new(dispatch_duration.clone()))?;

        let couriers_registered = IntCounter::new("couriers_registered_total", "Total couriers registered")?;
        registry.register(Box::new(couriers_registered.clone()))?;

        let courier_moves = IntCounter::new("courier_moves_total", "Movement steps that changed a courier location")?;
        registry.register(Box::new(courier_moves.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            orders_assigned,
            orders_completed,
            dispatch_failures,
            dispatch_duration,
            couriers_registered,
            courier_moves,
        })
    }

    pub fn record_dispatch(&self, duration_secs: f64) {
        self.dispatch_duration.observe(duration_secs);
        self.orders_assigned.inc();
    }

    /// `reason` is the error code of the failed dispatch
    pub fn record_dispatch_failure(&self, reason: &str, duration_secs: f64) {
        self.dispatch_duration.observe(duration_secs);
        self.dispatch_failures.with_label_values(&[reason]).inc();
    }

    /// Prometheus text exposition of every registered metric
    pub fn render(&self) -> anyhow::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = DispatchMetrics::new().unwrap();
        assert!(metrics.render().unwrap().contains("orders_created_total"));
    }

    #[test]
    fn test_record_dispatch() {
        let metrics = DispatchMetrics::new().unwrap();
        metrics.record_dispatch(0.0001);
        metrics.record_dispatch(0.0002);

        assert_eq!(metrics.orders_assigned.get(), 2);
        assert_eq!(metrics.dispatch_duration.get_sample_count(), 2);
    }

    #[test]
    fn test_record_dispatch_failure_by_reason() {
        let metrics = DispatchMetrics::new().unwrap();
        metrics.record_dispatch_failure("dispatch.nobody.can.take.order", 0.0001);
        metrics.record_dispatch_failure("dispatch.nobody.can.take.order", 0.0001);
        metrics.record_dispatch_failure("order.already.assigned", 0.0001);

        let nobody = metrics
            .dispatch_failures
            .with_label_values(&["dispatch.nobody.can.take.order"])
            .get();
        assert_eq!(nobody, 2);
        assert_eq!(metrics.orders_assigned.get(), 0);
    }

    #[test]
    fn test_render_text_format() {
        let metrics = DispatchMetrics::new().unwrap();
        metrics.orders_created.inc();

        let text = metrics.render().unwrap();
        assert!(text.contains("orders_created_total 1"));
    }
}
