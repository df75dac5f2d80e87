//! # Forged Callback Simulations
//!
//! Callbacks an attacker could send to the merchant endpoint:
//!
//! | Attack | Expected outcome |
//! |--------|------------------|
//! | Signature from a foreign RSA key | `VerificationFailed` |
//! | Test callback replayed as live | `VerificationFailed` |
//! | Certificate endpoint blocked to force hash mode | `CertificateUnavailable` |
//! | Unprefixed parameters smuggled next to real ones | ignored |
//! | Macro marker injected | `UnsupportedShape` |

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use rsa::pkcs1v15::SigningKey;
    use rsa::signature::{SignatureEncoding, Signer};
    use rsa::RsaPrivateKey;
    use sha1::Sha1;
    use webpay_verification::domain::signature::ss2_message;
    use webpay_verification::{
        HandlerRegistry, NoCertificateProvider, PaymentCallbackApi, PaymentShape,
        VerificationOutcome, VerifierConfig, WebPaymentError,
    };

    #[tokio::test]
    async fn test_foreign_key_signature_rejected() {
        let attacker = RsaPrivateKey::new(&mut rand::thread_rng(), 1024).unwrap();
        let signing_key = SigningKey::<Sha1>::new(attacker);

        let n = micro_notification()
            .with("amount", "1")
            .with("_ss1", "ffffffffffffffffffffffffffffffff");
        let forged = STANDARD.encode(signing_key.sign(ss2_message(&n).as_bytes()).to_bytes());
        let n = n.with("_ss2", forged);

        let err = dispatcher(true)
            .create(&on_the_wire(&n), SECRET)
            .await
            .unwrap_err();
        assert_eq!(err, WebPaymentError::VerificationFailed);
    }

    #[tokio::test]
    async fn test_test_callback_replayed_as_live() {
        let mut n = sign(micro_notification().with("test", "1"), SECRET);
        n.insert("test", "0");

        let err = dispatcher(true)
            .create(&on_the_wire(&n), SECRET)
            .await
            .unwrap_err();
        assert_eq!(err, WebPaymentError::VerificationFailed);
    }

    /// The hash signature only covers the order id and test flag, so a
    /// callback whose amount was changed in transit still passes on SS1.
    /// Only SS2 detects it.
    #[tokio::test]
    async fn test_tampered_amount_only_detected_by_ss2() {
        let mut n = sign(micro_notification(), SECRET);
        n.insert("amount", "1");

        let outcome = dispatcher(true)
            .check_response(&n, SECRET, "55")
            .await
            .unwrap();
        assert_eq!(outcome, VerificationOutcome::Ss1Ok);

        let untouched = sign(micro_notification(), SECRET);
        let outcome = dispatcher(true)
            .check_response(&untouched, SECRET, "55")
            .await
            .unwrap();
        assert_eq!(outcome, VerificationOutcome::Ss2Ok);
    }

    #[tokio::test]
    async fn test_blocked_certificate_does_not_downgrade_to_hash_mode() {
        let dispatcher = dispatcher_with(
            &VerifierConfig::default(),
            NoCertificateProvider,
            payments([code_descriptor()]),
            HandlerRegistry::default(),
        );

        let err = dispatcher.create(&signed_callback(), SECRET).await.unwrap_err();
        assert!(matches!(err, WebPaymentError::CertificateUnavailable(_)));
    }

    #[tokio::test]
    async fn test_smuggled_unprefixed_parameters_ignored() {
        let mut raw = signed_callback();
        raw.insert("to", "9999");
        raw.insert("amount", "1");
        raw.insert("wp_", "dangling");

        let record = dispatcher(true).create(&raw, SECRET).await.unwrap();
        assert_eq!(record.to, "1500");
        assert_eq!(record.amount, "100");
    }

    #[tokio::test]
    async fn test_macro_marker_rejected_before_verification() {
        let mut raw = signed_callback();
        raw.insert("wp_projectid", "42");

        let err = dispatcher(true).create(&raw, SECRET).await.unwrap_err();
        assert_eq!(err, WebPaymentError::UnsupportedShape(PaymentShape::Macro));
    }
}
