//! # Callback Service
//!
//! Application service layer that implements the `PaymentCallbackApi` trait.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`PaymentCallbackApi`)
//! - Uses the outbound port (`CertificateProvider`) through a `CertificateStore`
//! - Delegates signature math and matching to the domain layer
//!
//! ## Pipeline
//!
//! ```text
//! raw ─► strip prefix ─► shape check ─► SS2 / SS1 ─► descriptor ─► handler ─► record
//! ```

use crate::certificate::CertificateStore;
use crate::config::VerifierConfig;
use crate::domain::descriptor::PaymentInfoRegistry;
use crate::domain::errors::WebPaymentError;
use crate::domain::handler::HandlerRegistry;
use crate::domain::notification::{
    classify_shape, fields, missing_micro_fields, strip_prefix, Notification, PaymentShape,
};
use crate::domain::record::PaymentRecord;
use crate::domain::signature::{verify_ss1, verify_ss2, VerificationOutcome};
use crate::ports::inbound::PaymentCallbackApi;
use crate::ports::outbound::CertificateProvider;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Checks SS2 and SS1 signatures.
pub struct SignatureVerifier<P: CertificateProvider> {
    public_key_mode: bool,
    certificates: CertificateStore<P>,
}

impl<P: CertificateProvider> SignatureVerifier<P> {
    pub fn new(provider: P, config: &VerifierConfig) -> Self {
        Self {
            public_key_mode: config.public_key_mode,
            certificates: CertificateStore::new(provider, config.certificate_fetch_timeout),
        }
    }

    pub fn public_key_mode(&self) -> bool {
        self.public_key_mode
    }

    pub fn certificates(&self) -> &CertificateStore<P> {
        &self.certificates
    }

    /// Verify an already-stripped notification.
    ///
    /// In public-key mode the certificate is loaded first; if that fails the
    /// error is returned as-is and SS1 is not consulted.
    pub async fn check_response(
        &self,
        notification: &Notification,
        secret: &str,
        order_id: &str,
    ) -> Result<VerificationOutcome, WebPaymentError> {
        if self.public_key_mode {
            let key = self.certificates.get().await?;
            if verify_ss2(notification, &key) {
                debug!(event = "ss2_verified", order_id);
                return Ok(VerificationOutcome::Ss2Ok);
            }
            debug!(event = "ss2_rejected", order_id);
        }

        if verify_ss1(notification, secret, order_id) {
            debug!(event = "ss1_verified", order_id);
            return Ok(VerificationOutcome::Ss1Ok);
        }

        warn!(event = "signature_rejected", order_id, public_key_mode = self.public_key_mode);
        Ok(VerificationOutcome::Failed)
    }
}

impl<P: CertificateProvider> std::fmt::Debug for SignatureVerifier<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("public_key_mode", &self.public_key_mode)
            .field("certificates", &self.certificates)
            .finish()
    }
}

/// Verifies callbacks and resolves them to payment records.
///
/// Holds read-only registries; any number of `create` calls may run
/// concurrently.
pub struct Dispatcher<P: CertificateProvider> {
    transport_prefix: String,
    verifier: SignatureVerifier<P>,
    payments: Arc<PaymentInfoRegistry>,
    handlers: Arc<HandlerRegistry>,
}

impl<P: CertificateProvider> Dispatcher<P> {
    pub fn new(
        config: &VerifierConfig,
        provider: P,
        payments: Arc<PaymentInfoRegistry>,
        handlers: Arc<HandlerRegistry>,
    ) -> Self {
        Self {
            transport_prefix: config.transport_prefix.clone(),
            verifier: SignatureVerifier::new(provider, config),
            payments,
            handlers,
        }
    }

    pub fn verifier(&self) -> &SignatureVerifier<P> {
        &self.verifier
    }

    pub fn payments(&self) -> &PaymentInfoRegistry {
        &self.payments
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    async fn dispatch(
        &self,
        raw: &Notification,
        secret: &str,
    ) -> Result<PaymentRecord, WebPaymentError> {
        // 1. Remove the transport prefix
        let notification = strip_prefix(raw, &self.transport_prefix);

        // 2. Only micro-payment callbacks are supported
        match classify_shape(&notification) {
            PaymentShape::Micro => {}
            shape => return Err(WebPaymentError::UnsupportedShape(shape)),
        }

        let missing = missing_micro_fields(&notification);
        if !missing.is_empty() {
            return Err(WebPaymentError::MalformedNotification { missing });
        }

        // 3. Signatures
        let order_id = notification.value(fields::ID);
        let outcome = self
            .verifier
            .check_response(&notification, secret, order_id)
            .await?;
        if !outcome.is_verified() {
            return Err(WebPaymentError::VerificationFailed);
        }

        // 4. Descriptor
        let descriptor = self.payments.find_match(&notification).ok_or_else(|| {
            WebPaymentError::NoMatchingDescriptor {
                to: notification.value(fields::TO).to_string(),
                key: notification.value(fields::KEY).to_string(),
            }
        })?;

        // 5. Handler, selected by the key without the descriptor prefix
        let key = notification.value(fields::KEY);
        let stripped = descriptor.strip_key(key).unwrap_or(key);
        let handler = self.handlers.resolve(stripped);

        let record = handler.build(&notification, descriptor);
        info!(
            event = "payment_accepted",
            handler = %record.handler,
            order_id = %record.id,
            to = %record.to,
            outcome = ?outcome,
            is_test = record.is_test,
        );
        Ok(record)
    }
}

#[async_trait::async_trait]
impl<P: CertificateProvider> PaymentCallbackApi for Dispatcher<P> {
    async fn create(
        &self,
        raw: &Notification,
        secret: &str,
    ) -> Result<PaymentRecord, WebPaymentError> {
        self.dispatch(raw, secret).await.map_err(|err| {
            warn!(event = "payment_rejected", error = %err);
            err
        })
    }

    async fn check_response(
        &self,
        notification: &Notification,
        secret: &str,
        order_id: &str,
    ) -> Result<VerificationOutcome, WebPaymentError> {
        self.verifier
            .check_response(notification, secret, order_id)
            .await
    }
}

impl<P: CertificateProvider> std::fmt::Debug for Dispatcher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("transport_prefix", &self.transport_prefix)
            .field("verifier", &self.verifier)
            .field("payments", &self.payments.len())
            .field("handlers", &self.handlers)
            .finish()
    }
}
