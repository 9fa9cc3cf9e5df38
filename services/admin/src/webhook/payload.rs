//! Conversion of raw provider event JSON into [`WebhookEvent`].

use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::event::{BillingEvent, WebhookEvent};

/// Metadata key linking a checkout session to a hosting customer.
pub const HOSTING_CUSTOMER_METADATA_KEY: &str = "hostingCustomerId";

#[derive(Debug, thiserror::Error)]
#[error("malformed webhook payload: {0}")]
pub struct MalformedPayload(#[from] serde_json::Error);

#[derive(Deserialize)]
struct RawEvent {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: serde_json::Value,
}

/// A reference that is either a bare id or an expanded object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Expandable {
    Id(String),
    Object { id: String },
}

impl Expandable {
    fn into_id(self) -> String {
        match self {
            Self::Id(id) | Self::Object { id } => id,
        }
    }
}

#[derive(Deserialize)]
struct CheckoutSessionObject {
    #[serde(default)]
    customer: Option<Expandable>,
    #[serde(default)]
    subscription: Option<Expandable>,
    #[serde(default)]
    metadata: Option<HashMap<String, String>>,
}

#[derive(Deserialize)]
struct SubscriptionObject {
    id: String,
    customer: Expandable,
    status: String,
}

#[derive(Deserialize)]
struct InvoiceObject {
    customer: Expandable,
    #[serde(default)]
    subscription: Option<Expandable>,
}

fn object<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, MalformedPayload> {
    Ok(serde_json::from_value(value)?)
}

/// Parse a verified request body.
///
/// Unknown event types become [`BillingEvent::Ignored`]; a known type whose
/// object lacks required fields is malformed.
pub fn parse_event(payload: &[u8]) -> Result<WebhookEvent, MalformedPayload> {
    let raw: RawEvent = serde_json::from_slice(payload)?;
    let obj = raw.data.object;

    let kind = match raw.event_type.as_str() {
        "checkout.session.completed" => {
            let session: CheckoutSessionObject = object(obj)?;
            let hosting_customer_id = session
                .metadata
                .as_ref()
                .and_then(|m| m.get(HOSTING_CUSTOMER_METADATA_KEY))
                .and_then(|v| v.parse::<Uuid>().ok());
            BillingEvent::CheckoutCompleted {
                hosting_customer_id,
                customer_ref: session.customer.map(Expandable::into_id),
                subscription_ref: session.subscription.map(Expandable::into_id),
            }
        }
        "customer.subscription.updated" => {
            let sub: SubscriptionObject = object(obj)?;
            BillingEvent::SubscriptionUpdated {
                customer_ref: sub.customer.into_id(),
                subscription_ref: sub.id,
                provider_status: sub.status,
            }
        }
        "customer.subscription.deleted" => {
            let sub: SubscriptionObject = object(obj)?;
            BillingEvent::SubscriptionDeleted {
                customer_ref: sub.customer.into_id(),
                subscription_ref: sub.id,
            }
        }
        "invoice.payment_succeeded" => {
            let invoice: InvoiceObject = object(obj)?;
            BillingEvent::InvoicePaymentSucceeded {
                customer_ref: invoice.customer.into_id(),
                subscription_ref: invoice.subscription.map(Expandable::into_id),
            }
        }
        "invoice.payment_failed" => {
            let invoice: InvoiceObject = object(obj)?;
            BillingEvent::InvoicePaymentFailed {
                customer_ref: invoice.customer.into_id(),
                subscription_ref: invoice.subscription.map(Expandable::into_id),
            }
        }
        _ => BillingEvent::Ignored,
    };

    Ok(WebhookEvent {
        id: raw.id,
        event_type: raw.event_type,
        kind,
    })
}
