//! Signed-payload verification for payment-provider webhooks.
//!
//! Header format: `Stripe-Signature: t=<unix seconds>,v1=<hex>[,v1=<hex>...]`.
//! Each `v1` is HMAC-SHA256 over `"<t>.<raw body>"` keyed with the endpoint
//! secret. Several `v1` entries appear while a secret is being rolled.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum accepted age of a signed timestamp, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("signature header missing or malformed")]
    MalformedHeader,
    #[error("no matching signature")]
    Mismatch,
    #[error("timestamp outside tolerance")]
    TimestampOutOfTolerance,
}

struct ParsedHeader<'a> {
    timestamp: i64,
    signatures: Vec<&'a str>,
}

fn parse_header(header: &str) -> Result<ParsedHeader<'_>, SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();
    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                )
            }
            "v1" => signatures.push(value),
            _ => {}
        }
    }
    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::MalformedHeader);
    }
    Ok(ParsedHeader {
        timestamp,
        signatures,
    })
}

/// Hex HMAC-SHA256 of `"<timestamp>.<payload>"`.
pub fn compute_signature(payload: &[u8], timestamp: i64, secret: &str) -> String {
    // HMAC accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac key of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify `header` against the raw request body.
///
/// `now` is unix seconds; signatures older (or further in the future) than
/// `tolerance_secs` are rejected even if the MAC matches.
pub fn verify(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let parsed = parse_header(header)?;
    let expected = compute_signature(payload, parsed.timestamp, secret);

    let matched = parsed
        .signatures
        .iter()
        .any(|candidate| bool::from(expected.as_bytes().ct_eq(candidate.as_bytes())));
    if !matched {
        return Err(SignatureError::Mismatch);
    }

    if (now - parsed.timestamp).abs() > tolerance_secs {
        return Err(SignatureError::TimestampOutOfTolerance);
    }
    Ok(())
}
