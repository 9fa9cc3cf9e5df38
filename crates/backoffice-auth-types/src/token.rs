//! Opaque credentials and their stored hashes.
//!
//! Secrets (session tokens, one-time codes) are only ever persisted as the
//! lower-case hex SHA-256 digest produced by [`hash_secret`].

use rand::RngExt;
use sha2::{Digest, Sha256};

/// Number of random bytes in a session token (256 bits).
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Generate a new session token: 32 CSPRNG bytes, hex encoded.
pub fn generate_session_token() -> String {
    let bytes: [u8; SESSION_TOKEN_BYTES] = rand::rng().random();
    hex::encode(bytes)
}

/// Irreversible digest of a secret, as stored in the credential tables.
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}
