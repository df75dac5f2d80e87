//! Shared fixtures for unit tests.

use super::notification::Notification;
use super::signature::{expected_ss1, ss2_message};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs1v15::SigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use std::sync::OnceLock;

/// One RSA keypair per test binary; key generation is slow in debug builds.
pub fn test_keypair() -> (&'static RsaPrivateKey, &'static RsaPublicKey) {
    static KEYPAIR: OnceLock<(RsaPrivateKey, RsaPublicKey)> = OnceLock::new();
    let (private, public) = KEYPAIR.get_or_init(|| {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let public = RsaPublicKey::from(&private);
        (private, public)
    });
    (private, public)
}

/// Base64 SS2 signature over the notification with the test key.
pub fn sign_ss2(notification: &Notification) -> String {
    let (private, _) = test_keypair();
    let signing_key = SigningKey::<Sha1>::new(private.clone());
    let signature = signing_key.sign(ss2_message(notification).as_bytes());
    STANDARD.encode(signature.to_bytes())
}

/// A complete micro-payment notification for short number 1500.
pub fn micro_notification() -> Notification {
    Notification::new()
        .with("to", "1500")
        .with("sms", "CODE1234 hello")
        .with("from", "+37060000000")
        .with("operator", "OMNITEL")
        .with("amount", "100")
        .with("currency", "EUR")
        .with("country", "LT")
        .with("id", "55")
        .with("test", "")
        .with("key", "CODE1234")
}

/// Add valid `_ss1` and `_ss2` fields for `secret`, order id taken from `id`.
pub fn signed(notification: Notification, secret: &str) -> Notification {
    let order_id = notification.value("id").to_string();
    let ss1 = expected_ss1(&notification, secret, &order_id);
    let with_ss1 = notification.with("_ss1", ss1);
    let ss2 = sign_ss2(&with_ss1);
    with_ss1.with("_ss2", ss2)
}
