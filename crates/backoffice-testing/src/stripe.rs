//! Stripe-shaped webhook events and `Stripe-Signature` headers.

use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha2::Sha256;

/// Webhook signing secret shared by tests.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Build a `Stripe-Signature` header value for `payload` signed at `timestamp`.
pub fn signature_header(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

/// Wrap `object` in an event envelope.
pub fn event(id: &str, event_type: &str, object: Value) -> Vec<u8> {
    json!({
        "id": id,
        "object": "event",
        "type": event_type,
        "data": { "object": object },
    })
    .to_string()
    .into_bytes()
}

pub fn checkout_completed(
    id: &str,
    hosting_customer_id: &str,
    customer: &str,
    subscription: &str,
) -> Vec<u8> {
    event(
        id,
        "checkout.session.completed",
        json!({
            "id": "cs_test_1",
            "object": "checkout.session",
            "customer": customer,
            "subscription": subscription,
            "metadata": { "hostingCustomerId": hosting_customer_id },
        }),
    )
}

pub fn subscription_updated(id: &str, customer: &str, subscription: &str, status: &str) -> Vec<u8> {
    event(
        id,
        "customer.subscription.updated",
        json!({
            "id": subscription,
            "object": "subscription",
            "customer": customer,
            "status": status,
        }),
    )
}

pub fn subscription_deleted(id: &str, customer: &str, subscription: &str) -> Vec<u8> {
    event(
        id,
        "customer.subscription.deleted",
        json!({
            "id": subscription,
            "object": "subscription",
            "customer": customer,
            "status": "canceled",
        }),
    )
}

pub fn invoice_payment_succeeded(id: &str, customer: &str, subscription: &str) -> Vec<u8> {
    event(
        id,
        "invoice.payment_succeeded",
        json!({
            "id": "in_test_1",
            "object": "invoice",
            "customer": customer,
            "subscription": subscription,
        }),
    )
}

pub fn invoice_payment_failed(id: &str, customer: &str, subscription: &str) -> Vec<u8> {
    event(
        id,
        "invoice.payment_failed",
        json!({
            "id": "in_test_2",
            "object": "invoice",
            "customer": customer,
            "subscription": subscription,
        }),
    )
}
