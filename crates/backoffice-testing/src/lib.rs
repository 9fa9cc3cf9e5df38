//! Test utilities for back-office services.
//!
//! Builders for signed payment-provider webhook requests. Import from
//! `[dev-dependencies]` only, never from production code.

pub mod stripe;
