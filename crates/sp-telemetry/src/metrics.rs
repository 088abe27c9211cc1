//! Prometheus metrics for the sequence proxy core.
//!
//! All metrics follow the naming convention: `sp_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // HASH RING METRICS (Subsystem 01)
    // =========================================================================

    /// Ring lookups by outcome: hit, empty
    pub static ref RING_LOOKUPS: IntCounterVec = IntCounterVec::new(
        Opts::new("sp_ring_lookups_total", "Total hash ring lookups"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Virtual nodes on the most recently mutated ring
    pub static ref RING_VNODES: IntGauge = IntGauge::new(
        "sp_ring_vnodes",
        "Virtual nodes currently on the ring"
    ).expect("metric creation failed");

    // =========================================================================
    // COUNTER STORE METRICS (Subsystem 02)
    // =========================================================================

    /// Flush cycles by outcome: written, clean, in_flight, failed
    pub static ref STORE_FLUSHES: IntCounterVec = IntCounterVec::new(
        Opts::new("sp_store_flushes_total", "Counter store flush cycles"),
        &["outcome"]
    ).expect("metric creation failed");

    /// Time spent writing a flush to disk
    pub static ref STORE_FLUSH_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "sp_store_flush_duration_seconds",
            "Time spent writing counter snapshots to disk"
        ).buckets(exponential_buckets(0.0001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");

    /// Records loaded by the last recovery pass
    pub static ref STORE_RECOVERED_RECORDS: IntGauge = IntGauge::new(
        "sp_store_recovered_records",
        "Records restored from disk at startup"
    ).expect("metric creation failed");
}

/// Register all metrics with [`REGISTRY`].
///
/// Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Ring
        Box::new(RING_LOOKUPS.clone()),
        Box::new(RING_VNODES.clone()),
        // Store
        Box::new(STORE_FLUSHES.clone()),
        Box::new(STORE_FLUSH_DURATION.clone()),
        Box::new(STORE_RECOVERED_RECORDS.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::Metrics(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}
