//! Verifier configuration.
//!
//! # Example
//!
//! ```ignore
//! use webpay_verification::VerifierConfig;
//! use std::time::Duration;
//!
//! let config = VerifierConfig::default()
//!     .with_public_key_mode(true)
//!     .with_certificate_fetch_timeout(Duration::from_secs(5));
//! config.validate()?;
//! ```

use crate::domain::notification::DEFAULT_TRANSPORT_PREFIX;
use std::env;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default public certificate location of the gateway.
pub const DEFAULT_CERTIFICATE_URL: &str = "https://www.webtopay.com/download/public.key";

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("certificate_fetch_timeout must be greater than zero")]
    ZeroTimeout,

    #[error("Invalid certificate URL {url:?}: {reason}")]
    InvalidCertificateUrl { url: String, reason: String },

    #[error("Invalid value {value:?} for {name}")]
    InvalidEnv { name: &'static str, value: String },
}

/// Settings for signature verification and dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Try the public-key (SS2) signature before the hash (SS1) signature
    pub public_key_mode: bool,
    /// Upper bound for one certificate load
    pub certificate_fetch_timeout: Duration,
    /// Prefix the gateway puts in front of every callback parameter
    pub transport_prefix: String,
    /// Where `HttpCertificateProvider` downloads the certificate from
    pub certificate_url: Url,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            public_key_mode: true,
            certificate_fetch_timeout: Duration::from_secs(10),
            transport_prefix: DEFAULT_TRANSPORT_PREFIX.to_string(),
            certificate_url: default_certificate_url(),
        }
    }
}

impl VerifierConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `WEBPAY_PUBLIC_KEY_MODE`: `true`/`false` (default: true)
    /// - `WEBPAY_CERT_TIMEOUT_SECS`: certificate load timeout (default: 10)
    /// - `WEBPAY_TRANSPORT_PREFIX`: callback parameter prefix (default: `wp_`)
    /// - `WEBPAY_CERT_URL`: certificate location (default: gateway URL)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(v) = env::var("WEBPAY_PUBLIC_KEY_MODE") {
            config.public_key_mode = parse_bool("WEBPAY_PUBLIC_KEY_MODE", &v)?;
        }

        if let Ok(v) = env::var("WEBPAY_CERT_TIMEOUT_SECS") {
            let secs: u64 = v.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: "WEBPAY_CERT_TIMEOUT_SECS",
                value: v.clone(),
            })?;
            config.certificate_fetch_timeout = Duration::from_secs(secs);
        }

        if let Ok(v) = env::var("WEBPAY_TRANSPORT_PREFIX") {
            config.transport_prefix = v;
        }

        if let Ok(v) = env::var("WEBPAY_CERT_URL") {
            config.certificate_url =
                Url::parse(&v).map_err(|e| ConfigError::InvalidCertificateUrl {
                    url: v.clone(),
                    reason: e.to_string(),
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.certificate_fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        match self.certificate_url.scheme() {
            "https" => {}
            "http" => {
                tracing::warn!(
                    url = %self.certificate_url,
                    "Certificate URL is not HTTPS; SS2 trust depends on the network path"
                );
            }
            other => {
                return Err(ConfigError::InvalidCertificateUrl {
                    url: self.certificate_url.to_string(),
                    reason: format!("unsupported scheme {other:?}"),
                })
            }
        }

        Ok(())
    }

    /// Builder-style method to toggle SS2 verification
    pub fn with_public_key_mode(mut self, enabled: bool) -> Self {
        self.public_key_mode = enabled;
        self
    }

    /// Builder-style method to set the certificate load timeout
    pub fn with_certificate_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.certificate_fetch_timeout = timeout;
        self
    }

    /// Builder-style method to set the transport prefix
    pub fn with_transport_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.transport_prefix = prefix.into();
        self
    }

    /// Builder-style method to set the certificate location
    pub fn with_certificate_url(mut self, url: Url) -> Self {
        self.certificate_url = url;
        self
    }
}

fn default_certificate_url() -> Url {
    Url::parse(DEFAULT_CERTIFICATE_URL).unwrap_or_else(|_| unreachable!("constant URL is valid"))
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            name,
            value: value.to_string(),
        }),
    }
}
