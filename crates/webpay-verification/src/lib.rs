//! # WebPay Callback Verification
//!
//! Verifies micropayment callbacks sent by the WebPay gateway and resolves
//! each verified callback to a typed `PaymentRecord`.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Notifications, SS1/SS2 signatures, descriptors, handlers
//! - **Ports Layer** (`ports/`): Trait definitions for inbound/outbound interfaces
//! - **Adapters** (`adapters/`): Certificate sources (HTTP, in-memory)
//! - **Service Layer** (`service.rs`): `SignatureVerifier` and `Dispatcher`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webpay_verification::{
//!     Dispatcher, HandlerRegistry, HttpCertificateProvider, PaymentCallbackApi,
//!     PaymentDescriptor, PaymentInfoRegistry, VerifierConfig,
//! };
//!
//! let config = VerifierConfig::from_env()?;
//! let payments = PaymentInfoRegistry::builder()
//!     .register(PaymentDescriptor::new("CODE", "1234", "LT", 1500, 100, "EUR", 82)?)?
//!     .build();
//!
//! let dispatcher = Dispatcher::new(
//!     &config,
//!     HttpCertificateProvider::from_config(&config)?,
//!     Arc::new(payments),
//!     Arc::new(HandlerRegistry::default()),
//! );
//!
//! let record = dispatcher.create(&raw_query, &project_secret).await?;
//! ```
//!
//! ## Security Notes
//!
//! - **SS2 first**: In public-key mode the RSA signature is preferred; SS1 is
//!   still tried when SS2 does not verify
//! - **No silent downgrade**: If the certificate cannot be loaded, `create`
//!   fails with `CertificateUnavailable` instead of falling back to SS1
//! - **No defaults**: A failed verification or an unmatched descriptor never
//!   produces a record

pub mod adapters;
pub mod certificate;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
#[cfg(feature = "http-provider")]
pub use adapters::HttpCertificateProvider;
pub use adapters::{NoCertificateProvider, StaticCertificateProvider};
pub use certificate::CertificateStore;
pub use config::{ConfigError, VerifierConfig};
pub use domain::descriptor::{PaymentDescriptor, PaymentInfoRegistry, PaymentInfoRegistryBuilder};
pub use domain::errors::WebPaymentError;
pub use domain::handler::{
    GenericMicroHandler, HandlerBinding, HandlerRegistry, HandlerRegistryBuilder, PaymentHandler,
    PrefixHandler,
};
pub use domain::notification::{strip_prefix, Notification, PaymentShape};
pub use domain::public_key::{GatewayPublicKey, PublicKeyError};
pub use domain::record::PaymentRecord;
pub use domain::signature::VerificationOutcome;
pub use ports::inbound::PaymentCallbackApi;
pub use ports::outbound::{CertificateError, CertificateProvider};
pub use service::{Dispatcher, SignatureVerifier};
