//! End-to-end callback flows through the public API.

pub mod concurrency;
