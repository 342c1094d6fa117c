//! # FDK Telemetry
//!
//! Subscriber setup for applications and tests that embed the FDK. The SDK
//! itself only emits `tracing` events; installing a subscriber is left to
//! the host, and this crate is the standard way to do it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fdk_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_tracing(&config).expect("Failed to init tracing");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FDK_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `FDK_JSON_LOGS` | `false` | JSON output |
//! | `FDK_SERVICE_NAME` | `fdk` | Service name |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_test_tracing, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
