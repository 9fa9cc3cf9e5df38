#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{
    Admin, BillingUpdate, CatalogPlan, CheckoutRequest, HostingCustomer, OneTimeCode, Order,
    OutgoingEmail, PriceRequest, ProviderSubscription, RedirectSession, Session,
};
use crate::error::AdminServiceError;

/// Administrator accounts, keyed by email.
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AdminServiceError>;

    /// Insert unless an account with the same email already exists.
    async fn create(&self, admin: &Admin) -> Result<(), AdminServiceError>;
}

/// Repository for one-time login codes.
pub trait OneTimeCodeRepository: Send + Sync {
    /// Delete every code for `code.email` and insert `code`, atomically.
    async fn replace_for_email(&self, code: &OneTimeCode) -> Result<(), AdminServiceError>;

    /// Find an unexpired code by hash. Not scoped to an email.
    async fn find_valid_by_hash(
        &self,
        code_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, AdminServiceError>;

    /// Delete every code sharing `code_hash`. Returns the number of rows removed.
    async fn delete_by_hash(&self, code_hash: &str) -> Result<u64, AdminServiceError>;

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AdminServiceError>;
}

pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AdminServiceError>;

    async fn find_valid_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, AdminServiceError>;

    /// Returns `true` if a session was deleted.
    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, AdminServiceError>;

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AdminServiceError>;
}

pub trait HostingCustomerRepository: Send + Sync {
    /// All customers, soonest renewal first.
    async fn list(&self) -> Result<Vec<HostingCustomer>, AdminServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HostingCustomer>, AdminServiceError>;

    async fn find_by_external_customer(
        &self,
        customer_ref: &str,
    ) -> Result<Option<HostingCustomer>, AdminServiceError>;

    async fn create(&self, customer: &HostingCustomer) -> Result<(), AdminServiceError>;

    /// Persist an administrator edit of the whole record.
    async fn update(&self, customer: &HostingCustomer) -> Result<(), AdminServiceError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;

    /// Apply a payment-driven change; fields left `None` are not written.
    async fn apply_billing_update(
        &self,
        id: Uuid,
        update: &BillingUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), AdminServiceError>;
}

/// Plans offered for sale.
pub trait PlanCatalogRepository: Send + Sync {
    /// All plans, cheapest monthly price first.
    async fn list(&self) -> Result<Vec<CatalogPlan>, AdminServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogPlan>, AdminServiceError>;

    async fn create(&self, plan: &CatalogPlan) -> Result<(), AdminServiceError>;

    async fn update(&self, plan: &CatalogPlan) -> Result<(), AdminServiceError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}

pub trait OrderRepository: Send + Sync {
    /// All orders, newest first.
    async fn list(&self) -> Result<Vec<Order>, AdminServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AdminServiceError>;

    async fn create(&self, order: &Order) -> Result<(), AdminServiceError>;

    async fn update(&self, order: &Order) -> Result<(), AdminServiceError>;

    /// Returns `true` if deleted, `false` if not found.
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}

/// Ledger of webhook event ids whose effects have been applied.
pub trait WebhookEventRepository: Send + Sync {
    async fn is_processed(&self, event_id: &str) -> Result<bool, AdminServiceError>;

    async fn mark_processed(
        &self,
        event_id: &str,
        event_type: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AdminServiceError>;
}

/// Port for sending transactional email.
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()>;
}

/// Port for the payment provider's REST API.
pub trait PaymentProvider: Send + Sync {
    async fn retrieve_subscription(
        &self,
        subscription_ref: &str,
    ) -> anyhow::Result<ProviderSubscription>;

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> anyhow::Result<RedirectSession>;

    async fn create_portal_session(
        &self,
        customer_ref: &str,
        return_url: &str,
    ) -> anyhow::Result<RedirectSession>;

    /// Create a product and return its id.
    async fn create_product(&self, name: &str, description: &str) -> anyhow::Result<String>;

    /// Create a recurring price and return its id.
    async fn create_price(&self, request: &PriceRequest) -> anyhow::Result<String>;
}
