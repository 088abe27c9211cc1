//! # SP Telemetry
//!
//! Shared observability plumbing for the sequence proxy core.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry with `EnvFilter`, plain or JSON
//! - **Metrics**: Prometheus counters for ring lookups and counter-store flushes
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sp_telemetry::{init_logging, register_metrics, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! init_logging(&config)?;
//! register_metrics()?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SP_SERVICE_NAME` | `seq-proxy` | Service name attached to logs |
//! | `SP_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SP_JSON_LOGS` | `false` | Emit JSON lines |
//! | `SP_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics, HistogramTimer};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("logging already initialized")]
    AlreadyInitialized,

    /// The log filter directive could not be parsed.
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// Prometheus registration or encoding failed.
    #[error("metrics error: {0}")]
    Metrics(String),
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
