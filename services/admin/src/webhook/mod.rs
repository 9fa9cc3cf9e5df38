//! Payment-provider webhook wire format: signature scheme and event payloads.

pub mod payload;
pub mod signature;
