//! # Concurrent Callback Tests
//!
//! Many callbacks arriving at once share one dispatcher. The registries are
//! read without locks and the certificate is downloaded by a single caller.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::task::JoinSet;
    use webpay_verification::{
        CertificateError, CertificateProvider, HandlerRegistry, PaymentCallbackApi,
        VerifierConfig, WebPaymentError,
    };

    /// Serves the gateway certificate after a delay and counts downloads.
    struct SlowProvider {
        downloads: AtomicUsize,
        delay: Duration,
        healthy: bool,
    }

    impl SlowProvider {
        fn new(delay: Duration, healthy: bool) -> Arc<Self> {
            Arc::new(Self {
                downloads: AtomicUsize::new(0),
                delay,
                healthy,
            })
        }

        fn downloads(&self) -> usize {
            self.downloads.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl CertificateProvider for SlowProvider {
        async fn fetch_certificate(&self) -> Result<Vec<u8>, CertificateError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if self.healthy {
                Ok(certificate_pem())
            } else {
                Err(CertificateError::Fetch("gateway unreachable".into()))
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_of_callbacks_downloads_certificate_once() {
        let provider = SlowProvider::new(Duration::from_millis(100), true);
        let dispatcher = Arc::new(dispatcher_with(
            &VerifierConfig::default(),
            Arc::clone(&provider),
            payments([code_descriptor()]),
            HandlerRegistry::default(),
        ));
        let callback = signed_callback();

        let mut tasks = JoinSet::new();
        for _ in 0..32 {
            let dispatcher = Arc::clone(&dispatcher);
            let callback = callback.clone();
            tasks.spawn(async move { dispatcher.create(&callback, SECRET).await });
        }

        while let Some(result) = tasks.join_next().await {
            let record = result.unwrap().unwrap();
            assert_eq!(record.to, "1500");
        }
        assert_eq!(provider.downloads(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_shares_one_failed_download() {
        let provider = SlowProvider::new(Duration::from_millis(200), false);
        let dispatcher = Arc::new(dispatcher_with(
            &VerifierConfig::default(),
            Arc::clone(&provider),
            payments([code_descriptor()]),
            HandlerRegistry::default(),
        ));
        let callback = signed_callback();

        let mut tasks = JoinSet::new();
        for _ in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            let callback = callback.clone();
            tasks.spawn(async move { dispatcher.create(&callback, SECRET).await });
        }

        while let Some(result) = tasks.join_next().await {
            assert!(matches!(
                result.unwrap(),
                Err(WebPaymentError::CertificateUnavailable(_))
            ));
        }
        assert_eq!(provider.downloads(), 1);

        // The failure is not cached.
        let _ = dispatcher.create(&callback, SECRET).await;
        assert_eq!(provider.downloads(), 2);
    }

    #[tokio::test]
    async fn test_slow_certificate_times_out() {
        let provider = SlowProvider::new(Duration::from_secs(10), true);
        let config = VerifierConfig::default()
            .with_certificate_fetch_timeout(Duration::from_millis(50));
        let dispatcher = dispatcher_with(
            &config,
            provider,
            payments([code_descriptor()]),
            HandlerRegistry::default(),
        );

        let err = dispatcher.create(&signed_callback(), SECRET).await.unwrap_err();
        assert!(matches!(err, WebPaymentError::CertificateUnavailable(_)));
    }
}
