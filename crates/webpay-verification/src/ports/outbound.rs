//! # Outbound Ports (Driven Ports / SPI)
//!
//! Traits that define dependencies this crate needs.

use std::time::Duration;
use thiserror::Error;

/// Error from a certificate source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CertificateError {
    /// No certificate source is configured
    #[error("No certificate source configured")]
    NotConfigured,

    /// The source could not be reached or answered with an error
    #[error("Certificate fetch failed: {0}")]
    Fetch(String),

    /// The source did not answer in time
    #[error("Certificate fetch timed out after {0:?}")]
    Timeout(Duration),

    /// The certificate is larger than allowed
    #[error("Certificate too large: {size} bytes exceeds {max}")]
    TooLarge { size: u64, max: u64 },
}

/// Source of the gateway's public-key certificate.
///
/// Implementations return the raw certificate bytes; parsing happens in
/// the domain layer.
#[async_trait::async_trait]
pub trait CertificateProvider: Send + Sync {
    /// Fetch the certificate bytes.
    ///
    /// # Errors
    /// * `CertificateError::Fetch` - The source is unreachable or failed
    /// * `CertificateError::NotConfigured` - There is nothing to fetch from
    async fn fetch_certificate(&self) -> Result<Vec<u8>, CertificateError>;
}

#[async_trait::async_trait]
impl<P: CertificateProvider + ?Sized> CertificateProvider for std::sync::Arc<P> {
    async fn fetch_certificate(&self) -> Result<Vec<u8>, CertificateError> {
        (**self).fetch_certificate().await
    }
}
