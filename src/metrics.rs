//! Prometheus metrics for the voice dispatch engine.
//!
//! Counts utterances by how they were matched, handler failures and
//! announcements, and times handler execution.

use prometheus::{
    self, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Global metrics instance.
static METRICS: std::sync::OnceLock<Arc<Metrics>> = std::sync::OnceLock::new();

/// Get or initialize the global metrics instance.
pub fn get_metrics() -> Arc<Metrics> {
    METRICS.get_or_init(|| Arc::new(Metrics::new())).clone()
}

/// Histogram buckets for handler latency in seconds, 1ms to 10s.
fn default_latency_buckets() -> Vec<f64> {
    vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]
}

/// Matcher stage labels, in resolution order.
const STAGES: [&str; 4] = ["exact", "substring", "grammar", "fallback"];

pub struct Metrics {
    pub registry: Registry,

    // =========================================================================
    // Counters
    // =========================================================================
    /// Utterances received, including empty ones.
    pub utterances_total: IntCounter,
    /// Utterances resolved, by matcher stage.
    pub match_stage_total: IntCounterVec,
    /// Dispatched intents, by intent name.
    pub intents_total: IntCounterVec,
    /// Utterances no stage recognized.
    pub dispatch_misses_total: IntCounter,
    /// Data calls that failed or were rejected.
    pub handler_errors_total: IntCounter,
    pub announcements_total: IntCounter,

    // =========================================================================
    // Gauges
    // =========================================================================
    pub context_depth: IntGauge,

    // =========================================================================
    // Histograms (durations in seconds)
    // =========================================================================
    pub handler_duration_seconds: Histogram,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let utterances_total = IntCounter::new(
            "netops_voice_utterances_total",
            "Total number of utterances received",
        )
        .expect("failed to create counter");

        let match_stage_total = IntCounterVec::new(
            Opts::new(
                "netops_voice_match_stage_total",
                "Utterances resolved, by matcher stage",
            ),
            &["stage"],
        )
        .expect("failed to create counter");

        let intents_total = IntCounterVec::new(
            Opts::new("netops_voice_intents_total", "Dispatched intents, by intent"),
            &["intent"],
        )
        .expect("failed to create counter");

        let dispatch_misses_total = IntCounter::new(
            "netops_voice_dispatch_misses_total",
            "Total number of unrecognized utterances",
        )
        .expect("failed to create counter");

        let handler_errors_total = IntCounter::new(
            "netops_voice_handler_errors_total",
            "Total number of failed data calls",
        )
        .expect("failed to create counter");

        let announcements_total = IntCounter::new(
            "netops_voice_announcements_total",
            "Total number of announcements emitted",
        )
        .expect("failed to create counter");

        let context_depth = IntGauge::new(
            "netops_voice_context_depth",
            "Current number of entries on the context stack",
        )
        .expect("failed to create gauge");

        let handler_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "netops_voice_handler_duration_seconds",
                "Intent handler duration in seconds",
            )
            .buckets(default_latency_buckets()),
        )
        .expect("failed to create histogram");

        registry
            .register(Box::new(utterances_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(match_stage_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(intents_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(dispatch_misses_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(handler_errors_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(announcements_total.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(context_depth.clone()))
            .expect("failed to register metric");
        registry
            .register(Box::new(handler_duration_seconds.clone()))
            .expect("failed to register metric");

        Self {
            registry,
            utterances_total,
            match_stage_total,
            intents_total,
            dispatch_misses_total,
            handler_errors_total,
            announcements_total,
            context_depth,
            handler_duration_seconds,
        }
    }

    pub fn record_match(&self, stage: &str, intent: &str) {
        self.match_stage_total.with_label_values(&[stage]).inc();
        self.intents_total.with_label_values(&[intent]).inc();
    }

    /// Export metrics in Prometheus text format.
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::warn!("failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    /// Export metrics as JSON.
    pub fn export_json(&self) -> MetricsSnapshot {
        let match_stages = STAGES
            .iter()
            .map(|stage| {
                (
                    stage.to_string(),
                    self.match_stage_total.with_label_values(&[*stage]).get(),
                )
            })
            .collect();

        MetricsSnapshot {
            counters: MetricsCounters {
                utterances_total: self.utterances_total.get(),
                dispatch_misses_total: self.dispatch_misses_total.get(),
                handler_errors_total: self.handler_errors_total.get(),
                announcements_total: self.announcements_total.get(),
                match_stages,
            },
            context_depth: self.context_depth.get(),
            handler_duration_seconds: HistogramSnapshot::from_prometheus(
                &self.handler_duration_seconds,
            ),
        }
    }

    /// Start a timer that records duration to a histogram when dropped.
    pub fn start_timer(histogram: &Histogram) -> HistogramTimer {
        HistogramTimer {
            histogram: histogram.clone(),
            start: Instant::now(),
        }
    }
}

/// Timer that records duration to a histogram when dropped.
pub struct HistogramTimer {
    histogram: Histogram,
    start: Instant,
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.histogram.observe(duration.as_secs_f64());
    }
}

impl HistogramTimer {
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Snapshot of all metrics for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub counters: MetricsCounters,
    pub context_depth: i64,
    pub handler_duration_seconds: HistogramSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsCounters {
    pub utterances_total: u64,
    pub dispatch_misses_total: u64,
    pub handler_errors_total: u64,
    pub announcements_total: u64,
    pub match_stages: BTreeMap<String, u64>,
}

/// Snapshot of a histogram for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSnapshot {
    pub count: u64,
    pub sum: f64,
    pub mean: Option<f64>,
}

impl HistogramSnapshot {
    pub fn from_prometheus(h: &Histogram) -> Self {
        let sample_count = h.get_sample_count();
        let sample_sum = h.get_sample_sum();
        let mean = if sample_count > 0 {
            Some(sample_sum / sample_count as f64)
        } else {
            None
        };
        Self {
            count: sample_count,
            sum: sample_sum,
            mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_match() {
        let metrics = Metrics::new();
        metrics.record_match("grammar", "store_investigation");
        metrics.record_match("grammar", "log_search");
        metrics.record_match("exact", "go_back");

        let snapshot = metrics.export_json();
        assert_eq!(snapshot.counters.match_stages["grammar"], 2);
        assert_eq!(snapshot.counters.match_stages["exact"], 1);
        assert_eq!(snapshot.counters.match_stages["fallback"], 0);
    }

    #[test]
    fn test_histogram_timer() {
        let metrics = Metrics::new();
        {
            let _timer = Metrics::start_timer(&metrics.handler_duration_seconds);
            std::thread::sleep(Duration::from_millis(10));
        }
        let snapshot = metrics.export_json();
        assert_eq!(snapshot.handler_duration_seconds.count, 1);
        assert!(snapshot.handler_duration_seconds.sum >= 0.01);
    }

    #[test]
    fn test_prometheus_export() {
        let metrics = Metrics::new();
        metrics.utterances_total.inc_by(7);
        metrics.dispatch_misses_total.inc();
        metrics.context_depth.set(3);
        metrics.record_match("substring", "help");

        let output = metrics.export_prometheus();
        assert!(output.contains("netops_voice_utterances_total 7"));
        assert!(output.contains("netops_voice_dispatch_misses_total 1"));
        assert!(output.contains("netops_voice_context_depth 3"));
        assert!(output.contains("netops_voice_match_stage_total{stage=\"substring\"} 1"));
        assert!(output.contains("netops_voice_handler_duration_seconds"));
    }

    #[test]
    fn test_global_metrics() {
        let metrics = get_metrics();
        metrics.announcements_total.inc();
        assert!(metrics.announcements_total.get() >= 1);
    }
}
