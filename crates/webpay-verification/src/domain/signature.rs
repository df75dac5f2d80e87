//! # SS1 / SS2 Signatures
//!
//! Pure domain logic for the two callback signature schemes.
//!
//! ## SS1 (hash mode)
//!
//! `md5(secret_digest | order_id | test01 | 1)` in lower hex, compared with
//! the `_ss1` field. `secret_digest` is the secret itself when it already
//! is a 32-character hex digest, otherwise its MD5.
//!
//! ## SS2 (public-key mode)
//!
//! RSA PKCS#1 v1.5 / SHA-1 signature, base64 encoded in `_ss2`, over the
//! concatenation of `value|` for every other field in arrival order.
//!
//! ## Security Notes
//!
//! - The SS1 comparison runs in constant time via `subtle`
//! - Decode and verification errors in SS2 are reported as `false`, never panics

use super::notification::{fields, Notification};
use super::public_key::GatewayPublicKey;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs1v15::Signature;
use rsa::signature::Verifier;
use serde::Serialize;
use subtle::ConstantTimeEq;

/// Length of a lower-hex MD5 digest.
const DIGEST_HEX_LEN: usize = 32;

/// Result of `check_response`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VerificationOutcome {
    /// The public-key signature verified
    Ss2Ok,
    /// The public-key signature was not used or failed; the hash signature verified
    Ss1Ok,
    /// Neither signature verified
    Failed,
}

impl VerificationOutcome {
    pub fn is_verified(self) -> bool {
        !matches!(self, Self::Failed)
    }
}

// =============================================================================
// SS1
// =============================================================================

/// Return the secret in digest form, hashing it unless it already is one.
pub fn normalize_secret(secret: &str) -> String {
    if is_hex_digest(secret) {
        secret.to_string()
    } else {
        md5_hex(secret.as_bytes())
    }
}

/// The pipe-delimited string whose MD5 is the SS1 signature.
pub fn ss1_payload(notification: &Notification, secret: &str, order_id: &str) -> String {
    [
        normalize_secret(secret).as_str(),
        order_id,
        notification.test_flag(),
        "1",
    ]
    .join("|")
}

/// The SS1 value the gateway should have sent.
pub fn expected_ss1(notification: &Notification, secret: &str, order_id: &str) -> String {
    md5_hex(ss1_payload(notification, secret, order_id).as_bytes())
}

/// Check the `_ss1` field.
pub fn verify_ss1(notification: &Notification, secret: &str, order_id: &str) -> bool {
    let Some(received) = notification.get(fields::SS1) else {
        return false;
    };

    let expected = expected_ss1(notification, secret, order_id);
    constant_time_eq(expected.as_bytes(), received.as_bytes())
}

fn is_hex_digest(value: &str) -> bool {
    value.len() == DIGEST_HEX_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
}

fn md5_hex(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

// =============================================================================
// SS2
// =============================================================================

/// The message covered by the SS2 signature.
///
/// Every field except `_ss2`, in arrival order, each value followed by `|`.
pub fn ss2_message(notification: &Notification) -> String {
    notification
        .iter()
        .filter(|(key, _)| *key != fields::SS2)
        .fold(String::new(), |mut message, (_, value)| {
            message.push_str(value);
            message.push('|');
            message
        })
}

/// Check the `_ss2` field against the gateway key.
pub fn verify_ss2(notification: &Notification, public_key: &GatewayPublicKey) -> bool {
    let Some(encoded) = notification.get(fields::SS2) else {
        return false;
    };

    let Ok(raw) = STANDARD.decode(encoded.trim()) else {
        return false;
    };

    let Ok(signature) = Signature::try_from(raw.as_slice()) else {
        return false;
    };

    public_key
        .verifying_key()
        .verify(ss2_message(notification).as_bytes(), &signature)
        .is_ok()
}

// =============================================================================
// TESTS
// =============================================================================
