//! Attack simulations against the verification pipeline.

pub mod forged_callbacks;
