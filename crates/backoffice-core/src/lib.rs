//! Shared plumbing for back-office services.
//!
//! Configuration loading, tracing setup, request ids, health checks and
//! serde helpers. Nothing in here knows about a particular service.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
