//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this crate.

use crate::domain::errors::WebPaymentError;
use crate::domain::notification::Notification;
use crate::domain::record::PaymentRecord;
use crate::domain::signature::VerificationOutcome;

/// Primary callback API.
///
/// This is the main entry point for transport code that received a
/// gateway callback. Implementations must be thread-safe (`Send + Sync`).
#[async_trait::async_trait]
pub trait PaymentCallbackApi: Send + Sync {
    /// Verify a raw callback and resolve it to a payment record.
    ///
    /// `raw` still carries the transport prefix on every key.
    ///
    /// # Errors
    /// * `MalformedNotification` / `UnsupportedShape` - Rejected before verification
    /// * `VerificationFailed` - Neither signature verified
    /// * `CertificateUnavailable` - Public-key mode on and the certificate could not be loaded
    /// * `NoMatchingDescriptor` - Verified, but no descriptor matches `to`/`key`
    async fn create(&self, raw: &Notification, secret: &str)
        -> Result<PaymentRecord, WebPaymentError>;

    /// Check the signatures of an already-stripped notification.
    ///
    /// SS2 is preferred when public-key mode is on; SS1 is tried whenever
    /// SS2 was not attempted or did not verify.
    async fn check_response(
        &self,
        notification: &Notification,
        secret: &str,
        order_id: &str,
    ) -> Result<VerificationOutcome, WebPaymentError>;
}
