//! # Domain Layer
//!
//! Pure verification and matching logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod country;
pub mod descriptor;
pub mod errors;
pub mod handler;
pub mod notification;
pub mod public_key;
pub mod record;
pub mod signature;

#[cfg(test)]
pub(crate) mod test_helpers;
