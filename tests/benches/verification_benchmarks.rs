//! # WebPay Verification Benchmarks
//!
//! | Stage | Target |
//! |-------|--------|
//! | SS1 check | < 10μs |
//! | SS2 check (1024-bit RSA) | < 1ms |
//! | Descriptor match over 1,000 entries | < 100μs |
//! | Full `create` with cached certificate | < 1ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;
use webpay_tests::fixtures::*;
use webpay_verification::domain::signature::{verify_ss1, verify_ss2};
use webpay_verification::{
    strip_prefix, GatewayPublicKey, PaymentCallbackApi, PaymentDescriptor, PaymentInfoRegistry,
};

fn bench_signatures(c: &mut Criterion) {
    let mut group = c.benchmark_group("webpay/signatures");
    group.measurement_time(Duration::from_secs(5));

    let notification = sign(micro_notification(), SECRET);
    let key = GatewayPublicKey::from_bytes(&certificate_pem()).expect("test key");

    group.bench_function("ss1_verify", |b| {
        b.iter(|| black_box(verify_ss1(&notification, SECRET, "55")))
    });

    group.bench_function("ss1_verify_plain_secret", |b| {
        b.iter(|| black_box(verify_ss1(&notification, "secret", "55")))
    });

    group.bench_function("ss2_verify", |b| {
        b.iter(|| black_box(verify_ss2(&notification, &key)))
    });

    group.finish();
}

fn bench_prefix_stripping(c: &mut Criterion) {
    let raw = signed_callback();
    c.bench_function("webpay/strip_prefix", |b| {
        b.iter(|| black_box(strip_prefix(&raw, PREFIX)))
    });
}

fn bench_descriptor_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("webpay/descriptor_match");
    let notification = micro_notification();

    for size in [10u64, 100, 1_000] {
        // The matching descriptor is registered last.
        let registry = (0..size)
            .map(|i| {
                let base_key = if i + 1 == size { "1234".to_string() } else { i.to_string() };
                PaymentDescriptor::new("CODE", base_key, "LT", 1500, 100, "EUR", 82)
                    .expect("valid descriptor")
            })
            .try_fold(PaymentInfoRegistry::builder(), |builder, descriptor| {
                builder.register(descriptor)
            })
            .expect("valid registry")
            .build();

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("worst_case", size), &registry, |b, registry| {
            b.iter(|| black_box(registry.find_match(&notification)))
        });
    }

    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let raw = signed_callback();

    let mut group = c.benchmark_group("webpay/create");
    for public_key_mode in [true, false] {
        let dispatcher = dispatcher(public_key_mode);
        // Warm the certificate cache.
        runtime
            .block_on(dispatcher.create(&raw, SECRET))
            .expect("valid callback");

        let name = if public_key_mode { "ss2" } else { "ss1" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(runtime.block_on(dispatcher.create(&raw, SECRET))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_signatures,
    bench_prefix_stripping,
    bench_descriptor_match,
    bench_dispatch
);
criterion_main!(benches);
