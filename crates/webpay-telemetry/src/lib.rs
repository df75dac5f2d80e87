//! # WebPay Telemetry
//!
//! Log setup shared by services that embed the WebPay callback pipeline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use webpay_telemetry::{init_tracing, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_tracing(&config).expect("Failed to init tracing");
//!
//!     // Callback handling code here
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `WEBPAY_SERVICE_NAME` | `webpay` | Service name attached to log lines |
//! | `WEBPAY_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `WEBPAY_JSON_LOGS` | `false` | Emit JSON lines instead of human-readable output |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },
}
