use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use backoffice_core::serde::{to_iso_date_opt, to_rfc3339_ms};
use backoffice_domain::admin::AdminRole;
use backoffice_domain::email::EmailAddress;
use backoffice_domain::hosting::{BillingCycle, HostingPlan, HostingStatus};
use backoffice_domain::order::{FulfillmentStatus, OrderService};

/// Number of digits in a one-time login code.
pub const OTP_DIGITS: usize = 6;

/// One-time code time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 10 * 60;

/// Session time-to-live in seconds without "remember me".
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Session time-to-live in seconds with "remember me".
pub const REMEMBER_ME_SESSION_TTL_SECS: i64 = 7 * SESSION_TTL_SECS;

/// Emails permitted to sign in. Built once from configuration; cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    emails: Arc<HashSet<EmailAddress>>,
}

impl AllowList {
    /// Entries that are not valid addresses are dropped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails: HashSet<EmailAddress> = entries
            .into_iter()
            .filter_map(|e| EmailAddress::parse(e.as_ref()).ok())
            .collect();
        Self {
            emails: Arc::new(emails),
        }
    }

    pub fn contains(&self, email: &EmailAddress) -> bool {
        self.emails.contains(email)
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }
}

#[derive(Debug, Clone)]
pub struct Admin {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: AdminRole,
    pub created_at: DateTime<Utc>,
}

impl Admin {
    /// A fresh account for a first-time login; the display name is the local part.
    pub fn provision(email: &EmailAddress, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.as_str().to_owned(),
            display_name: email.local_part().to_owned(),
            role: AdminRole::Admin,
            created_at: now,
        }
    }
}

/// Stored one-time code. Only the hash of the plaintext is kept.
#[derive(Debug, Clone)]
pub struct OneTimeCode {
    pub id: Uuid,
    pub email: String,
    pub code_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Stored session. Only the hash of the bearer token is kept.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub email: String,
    pub token_hash: String,
    pub remember_me: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn ttl(remember_me: bool) -> Duration {
        if remember_me {
            Duration::seconds(REMEMBER_ME_SESSION_TTL_SECS)
        } else {
            Duration::seconds(SESSION_TTL_SECS)
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingCustomer {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub domain: String,
    pub plan: HostingPlan,
    pub billing_cycle: BillingCycle,
    pub amount_cents: i64,
    pub status: HostingStatus,
    #[serde(serialize_with = "to_iso_date_opt")]
    pub start_date: Option<NaiveDate>,
    #[serde(serialize_with = "to_iso_date_opt")]
    pub renewal_date: Option<NaiveDate>,
    #[serde(rename = "stripeCustomerId")]
    pub external_customer_ref: Option<String>,
    #[serde(rename = "stripeSubscriptionId")]
    pub external_subscription_ref: Option<String>,
    pub notes: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl HostingCustomer {
    pub fn from_draft(draft: HostingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            customer_name: draft.customer_name,
            customer_email: draft.customer_email.as_str().to_owned(),
            domain: draft.domain,
            plan: draft.plan,
            billing_cycle: draft.billing_cycle,
            amount_cents: draft.amount_cents,
            status: draft.status,
            start_date: draft.start_date,
            renewal_date: draft.renewal_date,
            external_customer_ref: draft.external_customer_ref.flatten(),
            external_subscription_ref: draft.external_subscription_ref.flatten(),
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the admin-editable fields, keeping identity and creation time.
    /// Provider links are only touched when the draft carries them.
    pub fn apply_draft(&mut self, draft: HostingDraft, now: DateTime<Utc>) {
        self.customer_name = draft.customer_name;
        self.customer_email = draft.customer_email.as_str().to_owned();
        self.domain = draft.domain;
        self.plan = draft.plan;
        self.billing_cycle = draft.billing_cycle;
        self.amount_cents = draft.amount_cents;
        self.status = draft.status;
        self.start_date = draft.start_date;
        self.renewal_date = draft.renewal_date;
        if let Some(customer_ref) = draft.external_customer_ref {
            self.external_customer_ref = customer_ref;
        }
        if let Some(subscription_ref) = draft.external_subscription_ref {
            self.external_subscription_ref = subscription_ref;
        }
        self.notes = draft.notes;
        self.updated_at = now;
    }
}

/// Validated administrator input for creating or editing a hosting customer.
#[derive(Debug, Clone)]
pub struct HostingDraft {
    pub customer_name: String,
    pub customer_email: EmailAddress,
    pub domain: String,
    pub plan: HostingPlan,
    pub billing_cycle: BillingCycle,
    pub amount_cents: i64,
    pub status: HostingStatus,
    pub start_date: Option<NaiveDate>,
    pub renewal_date: Option<NaiveDate>,
    /// `None` keeps the stored link, `Some(None)` clears it.
    pub external_customer_ref: Option<Option<String>>,
    pub external_subscription_ref: Option<Option<String>>,
    pub notes: Option<String>,
}

/// Payment-driven change to a hosting customer. `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingUpdate {
    pub status: HostingStatus,
    pub external_customer_ref: Option<String>,
    pub external_subscription_ref: Option<String>,
    pub renewal_date: Option<NaiveDate>,
}

impl BillingUpdate {
    pub fn status(status: HostingStatus) -> Self {
        Self {
            status,
            external_customer_ref: None,
            external_subscription_ref: None,
            renewal_date: None,
        }
    }
}

/// Plan in the sales catalogue. Checkout sells one of its prices.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub features: Vec<String>,
    pub stripe_product_id: Option<String>,
    pub stripe_price_id_monthly: Option<String>,
    pub stripe_price_id_yearly: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl CatalogPlan {
    pub fn from_draft(draft: PlanDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: draft.name,
            description: draft.description,
            monthly_price_cents: draft.monthly_price_cents,
            yearly_price_cents: draft.yearly_price_cents,
            features: draft.features,
            stripe_product_id: draft.stripe_product_id.flatten(),
            stripe_price_id_monthly: draft.stripe_price_id_monthly.flatten(),
            stripe_price_id_yearly: draft.stripe_price_id_yearly.flatten(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_draft(&mut self, draft: PlanDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.description = draft.description;
        self.monthly_price_cents = draft.monthly_price_cents;
        self.yearly_price_cents = draft.yearly_price_cents;
        self.features = draft.features;
        if let Some(product) = draft.stripe_product_id {
            self.stripe_product_id = product;
        }
        if let Some(price) = draft.stripe_price_id_monthly {
            self.stripe_price_id_monthly = price;
        }
        if let Some(price) = draft.stripe_price_id_yearly {
            self.stripe_price_id_yearly = price;
        }
        self.updated_at = now;
    }

    /// Provider price to check out for `cycle`, if one exists.
    pub fn price_for(&self, cycle: BillingCycle) -> Option<&str> {
        match cycle {
            BillingCycle::Monthly => self.stripe_price_id_monthly.as_deref(),
            BillingCycle::Yearly => self.stripe_price_id_yearly.as_deref(),
        }
    }
}

/// Validated administrator input for a catalogue plan.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    pub name: String,
    pub description: String,
    pub monthly_price_cents: i64,
    pub yearly_price_cents: i64,
    pub features: Vec<String>,
    /// `None` keeps the stored id, `Some(None)` clears it.
    pub stripe_product_id: Option<Option<String>>,
    pub stripe_price_id_monthly: Option<Option<String>>,
    pub stripe_price_id_yearly: Option<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub service: OrderService,
    pub description: String,
    pub amount_cents: i64,
    pub fulfillment_status: FulfillmentStatus,
    #[serde(serialize_with = "to_iso_date_opt")]
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn from_draft(draft: OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            customer_name: draft.customer_name,
            customer_email: draft.customer_email.as_str().to_owned(),
            service: draft.service,
            description: draft.description,
            amount_cents: draft.amount_cents,
            fulfillment_status: draft.fulfillment_status,
            due_date: draft.due_date,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_draft(&mut self, draft: OrderDraft, now: DateTime<Utc>) {
        self.customer_name = draft.customer_name;
        self.customer_email = draft.customer_email.as_str().to_owned();
        self.service = draft.service;
        self.description = draft.description;
        self.amount_cents = draft.amount_cents;
        self.fulfillment_status = draft.fulfillment_status;
        self.due_date = draft.due_date;
        self.notes = draft.notes;
        self.updated_at = now;
    }

    /// Short reference quoted to customers: the id's last six hex digits, upper-cased.
    pub fn reference(&self) -> String {
        let id = self.id.simple().to_string();
        id[id.len() - 6..].to_uppercase()
    }
}

/// Validated administrator input for creating or editing an order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_email: EmailAddress,
    pub service: OrderService,
    pub description: String,
    pub amount_cents: i64,
    pub fulfillment_status: FulfillmentStatus,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// A rendered transactional email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Subscription as reported by the payment provider.
#[derive(Debug, Clone)]
pub struct ProviderSubscription {
    pub id: String,
    pub status: String,
    /// Unix seconds.
    pub current_period_end: i64,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub customer_email: EmailAddress,
    pub hosting_customer_id: Option<Uuid>,
    pub success_url: String,
    pub cancel_url: String,
}

/// Recurring price to create under a provider product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub product_id: String,
    pub unit_amount_cents: i64,
    /// Lower-case ISO 4217 code.
    pub currency: String,
    pub cycle: BillingCycle,
}

/// Hosted page the browser is redirected to (checkout or billing portal).
#[derive(Debug, Clone, Serialize)]
pub struct RedirectSession {
    pub url: String,
}
