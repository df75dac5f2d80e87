//! In-process certificate sources.

use crate::ports::outbound::{CertificateError, CertificateProvider};
use std::path::Path;

/// Serves certificate bytes held in memory, e.g. read from disk at startup.
#[derive(Clone, Debug)]
pub struct StaticCertificateProvider {
    bytes: Vec<u8>,
}

impl StaticCertificateProvider {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Read the certificate from a file once.
    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        std::fs::read(path).map(Self::new)
    }
}

#[async_trait::async_trait]
impl CertificateProvider for StaticCertificateProvider {
    async fn fetch_certificate(&self) -> Result<Vec<u8>, CertificateError> {
        Ok(self.bytes.clone())
    }
}

/// Provider for deployments that run with public-key mode disabled.
///
/// Every fetch fails with `CertificateError::NotConfigured`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCertificateProvider;

#[async_trait::async_trait]
impl CertificateProvider for NoCertificateProvider {
    async fn fetch_certificate(&self) -> Result<Vec<u8>, CertificateError> {
        Err(CertificateError::NotConfigured)
    }
}
