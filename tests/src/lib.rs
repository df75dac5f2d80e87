//! # WebPay Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Keys, signed callbacks, registries
//! ├── exploits/         # Forged and tampered callbacks
//! └── integration/      # End-to-end callback flows
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p webpay-tests
//!
//! # By category
//! cargo test -p webpay-tests integration::
//! cargo test -p webpay-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p webpay-tests
//! ```

#![allow(dead_code)]

pub mod exploits;
pub mod fixtures;
pub mod integration;
