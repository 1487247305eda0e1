//! # Telemetry Module
//!
//! `tracing` setup for processes embedding a ring buffer log. The buffer
//! itself only emits events; installing a subscriber is up to the host.
//!
//! ```rust
//! use ringlog_core::telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(&TelemetryConfig::default());
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Configuration for telemetry initialization
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Log level filter, used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ringlog".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Telemetry guard - keep alive for the lifetime of the process
#[derive(Debug)]
pub struct TelemetryGuard {
    installed: bool,
}

impl TelemetryGuard {
    /// Whether this call installed the global subscriber.
    pub fn installed(&self) -> bool {
        self.installed
    }
}

/// Install a global fmt subscriber filtered by `RUST_LOG` or
/// `config.log_level`.
///
/// A second call leaves the existing subscriber in place.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryGuard {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = Registry::default()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(service = %config.service_name, "Telemetry initialized");
    }

    TelemetryGuard { installed }
}
