//! Shared fixtures: a gateway keypair, signed callbacks and ready-made
//! dispatchers.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use std::sync::{Arc, OnceLock};
use webpay_verification::domain::signature::{expected_ss1, ss2_message};
use webpay_verification::{
    CertificateProvider, Dispatcher, HandlerRegistry, Notification, PaymentDescriptor,
    PaymentInfoRegistry, StaticCertificateProvider, VerifierConfig,
};

/// Project secret in digest form.
pub const SECRET: &str = "d0763edaa9d9bd2a9516280e9044d885";

/// Transport prefix the gateway uses.
pub const PREFIX: &str = "wp_";

/// Gateway keypair, generated once per test binary.
pub fn gateway_keypair() -> &'static (RsaPrivateKey, RsaPublicKey) {
    static KEYPAIR: OnceLock<(RsaPrivateKey, RsaPublicKey)> = OnceLock::new();
    KEYPAIR.get_or_init(|| {
        let private =
            RsaPrivateKey::new(&mut rand::thread_rng(), 1024).expect("key generation failed");
        let public = RsaPublicKey::from(&private);
        (private, public)
    })
}

/// The gateway public key as an SPKI PEM blob.
pub fn certificate_pem() -> Vec<u8> {
    gateway_keypair()
        .1
        .to_public_key_pem(LineEnding::LF)
        .expect("PEM encoding failed")
        .into_bytes()
}

pub fn certificate_provider() -> StaticCertificateProvider {
    StaticCertificateProvider::new(certificate_pem())
}

/// Base64 SS2 over the notification, signed the way the gateway does.
pub fn sign_ss2(notification: &Notification) -> String {
    let signing_key = SigningKey::<Sha1>::new(gateway_keypair().0.clone());
    let signature = signing_key.sign(ss2_message(notification).as_bytes());
    STANDARD.encode(signature.to_bytes())
}

/// The micro-payment callback for short number 1500 and key `CODE1234`,
/// without signatures and without transport prefix.
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

/// Append `_ss1` and then `_ss2`, order id taken from `id`.
pub fn sign(notification: Notification, secret: &str) -> Notification {
    let order_id = notification.value("id").to_string();
    let ss1 = expected_ss1(&notification, secret, &order_id);
    let notification = notification.with("_ss1", ss1);
    let ss2 = sign_ss2(&notification);
    notification.with("_ss2", ss2)
}

/// Put the transport prefix in front of every key.
pub fn on_the_wire(notification: &Notification) -> Notification {
    notification
        .iter()
        .map(|(key, value)| (format!("{PREFIX}{key}"), value.to_string()))
        .collect()
}

/// A signed, prefixed callback as the transport layer hands it over.
pub fn signed_callback() -> Notification {
    on_the_wire(&sign(micro_notification(), SECRET))
}

pub fn code_descriptor() -> PaymentDescriptor {
    PaymentDescriptor::new("CODE", "1234", "LT", 1500, 100, "EUR", 82)
        .expect("valid descriptor")
}

pub fn payments(descriptors: impl IntoIterator<Item = PaymentDescriptor>) -> Arc<PaymentInfoRegistry> {
    let registry = PaymentInfoRegistry::builder()
        .register_all(descriptors)
        .expect("valid descriptors")
        .build();
    Arc::new(registry)
}

pub fn dispatcher_with<P: CertificateProvider>(
    config: &VerifierConfig,
    provider: P,
    payments: Arc<PaymentInfoRegistry>,
    handlers: HandlerRegistry,
) -> Dispatcher<P> {
    Dispatcher::new(config, provider, payments, Arc::new(handlers))
}

/// Dispatcher with the `CODE1234` descriptor and only the generic handler.
pub fn dispatcher(public_key_mode: bool) -> Dispatcher<StaticCertificateProvider> {
    dispatcher_with(
        &VerifierConfig::default().with_public_key_mode(public_key_mode),
        certificate_provider(),
        payments([code_descriptor()]),
        HandlerRegistry::default(),
    )
}
