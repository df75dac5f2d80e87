//! # HTTP Certificate Provider
//!
//! Downloads the gateway certificate over HTTP(S).
//!
//! Hardening:
//! - Redirects are not followed
//! - Responses above `MAX_CERTIFICATE_BYTES` are rejected
//! - The client carries its own request timeout; `CertificateStore` adds an
//!   outer timeout around the whole load

use crate::config::VerifierConfig;
use crate::ports::outbound::{CertificateError, CertificateProvider};
use reqwest::Client;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Largest certificate body accepted.
pub const MAX_CERTIFICATE_BYTES: u64 = 64 * 1024;

#[derive(Clone, Debug)]
pub struct HttpCertificateProvider {
    client: Client,
    url: Url,
}

impl HttpCertificateProvider {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, CertificateError> {
        if !matches!(url.scheme(), "https" | "http") {
            return Err(CertificateError::Fetch(format!(
                "unsupported scheme {:?}",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("webpay-verification/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CertificateError::Fetch(e.to_string()))?;

        Ok(Self { client, url })
    }

    /// Provider for the configured certificate URL and timeout.
    pub fn from_config(config: &VerifierConfig) -> Result<Self, CertificateError> {
        Self::new(
            config.certificate_url.clone(),
            config.certificate_fetch_timeout,
        )
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait::async_trait]
impl CertificateProvider for HttpCertificateProvider {
    async fn fetch_certificate(&self) -> Result<Vec<u8>, CertificateError> {
        info!(event = "certificate_fetch", url = %self.url);

        let mut resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| CertificateError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CertificateError::Fetch(format!(
                "unexpected status {}",
                resp.status()
            )));
        }

        if let Some(len) = resp.content_length() {
            if len > MAX_CERTIFICATE_BYTES {
                return Err(CertificateError::TooLarge {
                    size: len,
                    max: MAX_CERTIFICATE_BYTES,
                });
            }
        }

        // The length header may be absent (chunked) or wrong, so the cap is
        // enforced while reading.
        let mut body = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .map_err(|e| CertificateError::Fetch(e.to_string()))?
        {
            let size = (body.len() + chunk.len()) as u64;
            if size > MAX_CERTIFICATE_BYTES {
                return Err(CertificateError::TooLarge {
                    size,
                    max: MAX_CERTIFICATE_BYTES,
                });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }
}
