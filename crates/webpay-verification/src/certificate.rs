//! # Certificate Store
//!
//! Lazily loads and caches the gateway public key.
//!
//! The load is single-flight: concurrent callers that find the cache empty
//! wait on one in-flight load instead of each calling the provider. Callers
//! that waited on a load which failed receive that same failure. The next
//! caller after a failure starts a fresh load, so a failure is never cached.

use crate::domain::errors::WebPaymentError;
use crate::domain::public_key::GatewayPublicKey;
use crate::ports::outbound::{CertificateError, CertificateProvider};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct CertificateStore<P: CertificateProvider> {
    provider: P,
    timeout: Duration,
    cached: RwLock<Option<Arc<GatewayPublicKey>>>,
    flight: tokio::sync::Mutex<()>,
    /// Completed load attempts, successful or not
    attempts: AtomicU64,
    last_error: Mutex<Option<WebPaymentError>>,
}

impl<P: CertificateProvider> CertificateStore<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            cached: RwLock::new(None),
            flight: tokio::sync::Mutex::new(()),
            attempts: AtomicU64::new(0),
            last_error: Mutex::new(None),
        }
    }

    /// Return the cached key, loading it on first use.
    ///
    /// # Errors
    /// * `CertificateUnavailable` - The provider failed, timed out or
    ///   returned bytes that are not an RSA key
    pub async fn get(&self) -> Result<Arc<GatewayPublicKey>, WebPaymentError> {
        if let Some(key) = self.cached() {
            return Ok(key);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let _flight = self.flight.lock().await;

        if let Some(key) = self.cached() {
            return Ok(key);
        }

        // A load completed while we were waiting and it failed.
        if self.attempts.load(Ordering::Acquire) != seen {
            let shared = self.last_error.lock().clone();
            if let Some(err) = shared {
                debug!(event = "certificate_shared_failure", error = %err);
                return Err(err);
            }
        }

        let result = self.load().await;
        match &result {
            Ok(key) => {
                *self.cached.write() = Some(Arc::clone(key));
                *self.last_error.lock() = None;
            }
            Err(err) => {
                *self.last_error.lock() = Some(err.clone());
            }
        }
        self.attempts.fetch_add(1, Ordering::Release);

        result
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.read().is_some()
    }

    /// Drop the cached key so the next `get` loads it again.
    pub fn reset(&self) {
        *self.cached.write() = None;
    }

    fn cached(&self) -> Option<Arc<GatewayPublicKey>> {
        self.cached.read().clone()
    }

    async fn load(&self) -> Result<Arc<GatewayPublicKey>, WebPaymentError> {
        let bytes = match tokio::time::timeout(self.timeout, self.provider.fetch_certificate()).await
        {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(err)) => return Err(unavailable(err)),
            Err(_) => return Err(unavailable(CertificateError::Timeout(self.timeout))),
        };

        let key = GatewayPublicKey::from_bytes(&bytes).map_err(|err| {
            warn!(event = "certificate_parse_failed", error = %err);
            WebPaymentError::CertificateUnavailable(err.to_string())
        })?;

        info!(event = "certificate_loaded", bytes = bytes.len());
        Ok(Arc::new(key))
    }
}

fn unavailable(err: CertificateError) -> WebPaymentError {
    warn!(event = "certificate_load_failed", error = %err);
    WebPaymentError::CertificateUnavailable(err.to_string())
}

impl<P: CertificateProvider> std::fmt::Debug for CertificateStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateStore")
            .field("timeout", &self.timeout)
            .field("loaded", &self.is_loaded())
            .field("attempts", &self.attempts.load(Ordering::Relaxed))
            .finish()
    }
}
