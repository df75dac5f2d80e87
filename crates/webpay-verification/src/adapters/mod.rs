//! # Adapters Module
//!
//! Infrastructure adapters implementing the outbound ports.

#[cfg(feature = "http-provider")]
pub mod http_certificate;
pub mod static_certificate;

#[cfg(feature = "http-provider")]
pub use http_certificate::HttpCertificateProvider;
pub use static_certificate::{NoCertificateProvider, StaticCertificateProvider};
