use uuid::Uuid;

/// A verified payment-provider notification, converted to internal types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEvent {
    pub id: String,
    pub event_type: String,
    pub kind: BillingEvent,
}

/// Billing state changes the reconciler acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    CheckoutCompleted {
        /// Hosting customer linked through checkout metadata.
        hosting_customer_id: Option<Uuid>,
        customer_ref: Option<String>,
        subscription_ref: Option<String>,
    },
    SubscriptionUpdated {
        customer_ref: String,
        subscription_ref: String,
        /// Provider status string, e.g. `active`, `past_due`.
        provider_status: String,
    },
    SubscriptionDeleted {
        customer_ref: String,
        subscription_ref: String,
    },
    InvoicePaymentSucceeded {
        customer_ref: String,
        subscription_ref: Option<String>,
    },
    InvoicePaymentFailed {
        customer_ref: String,
        subscription_ref: Option<String>,
    },
    /// Any event type the reconciler does not handle.
    Ignored,
}
