//! # Callback Errors
//!
//! Error types for the verification-and-dispatch pipeline.
//!
//! Every failure is surfaced as a distinct variant. None of them is ever
//! turned into a generic payment record.

use super::notification::PaymentShape;
use thiserror::Error;

/// Errors that can occur while verifying and dispatching a callback.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WebPaymentError {
    /// Required micro-payment fields are missing
    #[error("Malformed notification: missing fields {missing:?}")]
    MalformedNotification { missing: Vec<&'static str> },

    /// The notification is not micro-payment shaped
    #[error("Unsupported notification shape: {0:?}")]
    UnsupportedShape(PaymentShape),

    /// Neither the SS2 nor the SS1 signature could be verified
    #[error("Signature verification failed")]
    VerificationFailed,

    /// Public-key mode is enabled but the certificate could not be obtained.
    ///
    /// Recoverable: the load is retried on the next call.
    #[error("Gateway certificate unavailable: {0}")]
    CertificateUnavailable(String),

    /// Verified notification, but no registered descriptor matches it
    #[error("No payment descriptor matches to={to:?} key={key:?}")]
    NoMatchingDescriptor { to: String, key: String },

    /// A descriptor or handler binding was rejected at registration
    #[error("Invalid registration: {0}")]
    InvalidRegistration(String),
}

impl WebPaymentError {
    /// Whether the same notification may succeed if submitted again later.
    ///
    /// Only certificate loading is retryable; verification and matching
    /// failures are final for a given input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CertificateUnavailable(_))
    }
}
