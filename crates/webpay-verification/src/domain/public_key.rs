//! # Gateway Public Key
//!
//! Parses the certificate blob handed over by a `CertificateProvider` into
//! an RSA verifying key for SS2 signatures (PKCS#1 v1.5 over SHA-1).
//!
//! Accepted encodings, PEM or DER:
//! - X.509 certificate (what the gateway publishes)
//! - SubjectPublicKeyInfo (`-----BEGIN PUBLIC KEY-----`)
//! - PKCS#1 RSA public key (`-----BEGIN RSA PUBLIC KEY-----`)

use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs1v15::VerifyingKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::RsaPublicKey;
use sha1::Sha1;
use thiserror::Error;
use x509_cert::der::{Decode, DecodePem, Encode};
use x509_cert::Certificate;

/// Errors from decoding a certificate blob.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PublicKeyError {
    /// The blob is empty
    #[error("Certificate blob is empty")]
    Empty,

    /// PEM armour with a label we do not understand
    #[error("Unsupported PEM label")]
    UnsupportedPem,

    /// The bytes could not be decoded as any supported RSA key encoding
    #[error("Invalid public key encoding: {0}")]
    InvalidEncoding(String),
}

/// RSA public key of the gateway, ready to verify SS2 signatures.
#[derive(Clone, Debug)]
pub struct GatewayPublicKey {
    key: RsaPublicKey,
}

impl GatewayPublicKey {
    /// Decode a PEM or DER encoded certificate or public key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PublicKeyError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(PublicKeyError::Empty);
        }

        let key = match std::str::from_utf8(bytes) {
            Ok(text) if text.contains("-----BEGIN") => decode_pem(text)?,
            _ => decode_der(bytes)?,
        };

        Ok(Self { key })
    }

    pub fn from_rsa(key: RsaPublicKey) -> Self {
        Self { key }
    }

    pub fn rsa(&self) -> &RsaPublicKey {
        &self.key
    }

    pub(crate) fn verifying_key(&self) -> VerifyingKey<Sha1> {
        VerifyingKey::<Sha1>::new(self.key.clone())
    }
}

fn decode_pem(text: &str) -> Result<RsaPublicKey, PublicKeyError> {
    if text.contains("-----BEGIN CERTIFICATE-----") {
        let cert = Certificate::from_pem(text.trim().as_bytes())
            .map_err(|e| PublicKeyError::InvalidEncoding(e.to_string()))?;
        return key_from_certificate(&cert);
    }

    if text.contains("-----BEGIN RSA PUBLIC KEY-----") {
        return RsaPublicKey::from_pkcs1_pem(text.trim())
            .map_err(|e| PublicKeyError::InvalidEncoding(e.to_string()));
    }

    if text.contains("-----BEGIN PUBLIC KEY-----") {
        return RsaPublicKey::from_public_key_pem(text.trim())
            .map_err(|e| PublicKeyError::InvalidEncoding(e.to_string()));
    }

    Err(PublicKeyError::UnsupportedPem)
}

fn decode_der(bytes: &[u8]) -> Result<RsaPublicKey, PublicKeyError> {
    if let Ok(key) = RsaPublicKey::from_public_key_der(bytes) {
        return Ok(key);
    }

    if let Ok(cert) = Certificate::from_der(bytes) {
        return key_from_certificate(&cert);
    }

    RsaPublicKey::from_pkcs1_der(bytes).map_err(|e| PublicKeyError::InvalidEncoding(e.to_string()))
}

fn key_from_certificate(cert: &Certificate) -> Result<RsaPublicKey, PublicKeyError> {
    let spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| PublicKeyError::InvalidEncoding(e.to_string()))?;

    RsaPublicKey::from_public_key_der(&spki)
        .map_err(|e| PublicKeyError::InvalidEncoding(e.to_string()))
}
