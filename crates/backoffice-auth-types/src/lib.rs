//! Session credential primitives shared by back-office services.
//!
//! Provides opaque token generation, irreversible secret hashing and the
//! session cookie builders.

pub mod cookie;
pub mod token;
