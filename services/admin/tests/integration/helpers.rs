use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use backoffice_admin::domain::repository::{
    AdminRepository, HostingCustomerRepository, Mailer, OneTimeCodeRepository, OrderRepository,
    PaymentProvider, PlanCatalogRepository, SessionRepository, WebhookEventRepository,
};
use backoffice_admin::domain::types::{
    Admin, AllowList, BillingUpdate, CatalogPlan, CheckoutRequest, HostingCustomer, OneTimeCode,
    Order, OutgoingEmail, PriceRequest, ProviderSubscription, RedirectSession, Session,
};
use backoffice_admin::error::AdminServiceError;
use backoffice_domain::hosting::{BillingCycle, HostingPlan, HostingStatus};
use backoffice_domain::order::{FulfillmentStatus, OrderService};

pub const ADMIN_EMAIL: &str = "owner@example.com";
pub const OTHER_ADMIN_EMAIL: &str = "ops@example.com";

pub fn test_allow_list() -> AllowList {
    AllowList::new([ADMIN_EMAIL, OTHER_ADMIN_EMAIL])
}

// ── MockAdminRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAdminRepo {
    pub admins: Arc<Mutex<Vec<Admin>>>,
}

impl MockAdminRepo {
    pub fn admins_handle(&self) -> Arc<Mutex<Vec<Admin>>> {
        Arc::clone(&self.admins)
    }
}

impl AdminRepository for MockAdminRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AdminServiceError> {
        Ok(self
            .admins
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create(&self, admin: &Admin) -> Result<(), AdminServiceError> {
        let mut admins = self.admins.lock().unwrap();
        if !admins.iter().any(|a| a.email == admin.email) {
            admins.push(admin.clone());
        }
        Ok(())
    }
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockCodeRepo {
    pub codes: Arc<Mutex<Vec<OneTimeCode>>>,
}

impl MockCodeRepo {
    /// Returns a shared handle to the stored codes for post-execution inspection.
    pub fn codes_handle(&self) -> Arc<Mutex<Vec<OneTimeCode>>> {
        Arc::clone(&self.codes)
    }
}

impl OneTimeCodeRepository for MockCodeRepo {
    async fn replace_for_email(&self, code: &OneTimeCode) -> Result<(), AdminServiceError> {
        let mut codes = self.codes.lock().unwrap();
        codes.retain(|c| c.email != code.email);
        codes.push(code.clone());
        Ok(())
    }

    async fn find_valid_by_hash(
        &self,
        code_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, AdminServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.code_hash == code_hash && c.is_valid_at(now))
            .cloned())
    }

    async fn delete_by_hash(&self, code_hash: &str) -> Result<u64, AdminServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.code_hash != code_hash);
        Ok((before - codes.len()) as u64)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AdminServiceError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|c| c.is_valid_at(now));
        Ok((before - codes.len()) as u64)
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl MockSessionRepo {
    pub fn sessions_handle(&self) -> Arc<Mutex<Vec<Session>>> {
        Arc::clone(&self.sessions)
    }
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &Session) -> Result<(), AdminServiceError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_valid_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, AdminServiceError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token_hash == token_hash && s.is_valid_at(now))
            .cloned())
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, AdminServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.token_hash != token_hash);
        Ok(sessions.len() < before)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AdminServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.is_valid_at(now));
        Ok((before - sessions.len()) as u64)
    }
}

// ── MockHostingRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockHostingRepo {
    pub customers: Arc<Mutex<Vec<HostingCustomer>>>,
}

impl MockHostingRepo {
    pub fn new(customers: Vec<HostingCustomer>) -> Self {
        Self {
            customers: Arc::new(Mutex::new(customers)),
        }
    }

    pub fn customers_handle(&self) -> Arc<Mutex<Vec<HostingCustomer>>> {
        Arc::clone(&self.customers)
    }

    pub fn get(&self, id: Uuid) -> HostingCustomer {
        self.customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .expect("customer should exist")
    }
}

impl HostingCustomerRepository for MockHostingRepo {
    async fn list(&self) -> Result<Vec<HostingCustomer>, AdminServiceError> {
        let mut all = self.customers.lock().unwrap().clone();
        all.sort_by(|a, b| {
            (a.renewal_date.is_none(), a.renewal_date, &a.customer_name).cmp(&(
                b.renewal_date.is_none(),
                b.renewal_date,
                &b.customer_name,
            ))
        });
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HostingCustomer>, AdminServiceError> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn find_by_external_customer(
        &self,
        customer_ref: &str,
    ) -> Result<Option<HostingCustomer>, AdminServiceError> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.external_customer_ref.as_deref() == Some(customer_ref))
            .cloned())
    }

    async fn create(&self, customer: &HostingCustomer) -> Result<(), AdminServiceError> {
        self.customers.lock().unwrap().push(customer.clone());
        Ok(())
    }

    async fn update(&self, customer: &HostingCustomer) -> Result<(), AdminServiceError> {
        let mut customers = self.customers.lock().unwrap();
        if let Some(c) = customers.iter_mut().find(|c| c.id == customer.id) {
            *c = customer.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let mut customers = self.customers.lock().unwrap();
        let before = customers.len();
        customers.retain(|c| c.id != id);
        Ok(customers.len() < before)
    }

    async fn apply_billing_update(
        &self,
        id: Uuid,
        update: &BillingUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), AdminServiceError> {
        let mut customers = self.customers.lock().unwrap();
        if let Some(c) = customers.iter_mut().find(|c| c.id == id) {
            c.status = update.status;
            if let Some(r) = &update.external_customer_ref {
                c.external_customer_ref = Some(r.clone());
            }
            if let Some(r) = &update.external_subscription_ref {
                c.external_subscription_ref = Some(r.clone());
            }
            if let Some(d) = update.renewal_date {
                c.renewal_date = Some(d);
            }
            c.updated_at = now;
        }
        Ok(())
    }
}

// ── MockEventLedger ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockEventLedger {
    pub processed: Arc<Mutex<Vec<String>>>,
}

impl MockEventLedger {
    pub fn processed_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.processed)
    }
}

impl WebhookEventRepository for MockEventLedger {
    async fn is_processed(&self, event_id: &str) -> Result<bool, AdminServiceError> {
        Ok(self.processed.lock().unwrap().iter().any(|e| e == event_id))
    }

    async fn mark_processed(
        &self,
        event_id: &str,
        _event_type: &str,
        _now: DateTime<Utc>,
    ) -> Result<(), AdminServiceError> {
        let mut processed = self.processed.lock().unwrap();
        if !processed.iter().any(|e| e == event_id) {
            processed.push(event_id.to_owned());
        }
        Ok(())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<OutgoingEmail>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("smtp relay unavailable");
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Pull the plaintext code out of a login email.
pub fn code_from(email: &OutgoingEmail) -> String {
    email
        .text
        .split("code is: ")
        .nth(1)
        .and_then(|rest| rest.get(..6))
        .expect("login email should carry a code")
        .to_owned()
}

// ── MockProvider ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockProvider {
    pub subscriptions: Vec<ProviderSubscription>,
    pub checkouts: Arc<Mutex<Vec<CheckoutRequest>>>,
    pub products: Arc<Mutex<Vec<String>>>,
    pub prices: Arc<Mutex<Vec<PriceRequest>>>,
    pub fail: bool,
}

impl MockProvider {
    pub fn with_subscription(id: &str, current_period_end: i64) -> Self {
        Self {
            subscriptions: vec![ProviderSubscription {
                id: id.to_owned(),
                status: "active".to_owned(),
                current_period_end,
            }],
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn checkouts_handle(&self) -> Arc<Mutex<Vec<CheckoutRequest>>> {
        Arc::clone(&self.checkouts)
    }

    /// Names of the products created so far.
    pub fn products_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.products)
    }

    pub fn prices_handle(&self) -> Arc<Mutex<Vec<PriceRequest>>> {
        Arc::clone(&self.prices)
    }
}

impl PaymentProvider for MockProvider {
    async fn retrieve_subscription(
        &self,
        subscription_ref: &str,
    ) -> anyhow::Result<ProviderSubscription> {
        if self.fail {
            anyhow::bail!("provider unavailable");
        }
        self.subscriptions
            .iter()
            .find(|s| s.id == subscription_ref)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such subscription: {subscription_ref}"))
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> anyhow::Result<RedirectSession> {
        if self.fail {
            anyhow::bail!("provider unavailable");
        }
        self.checkouts.lock().unwrap().push(request.clone());
        Ok(RedirectSession {
            url: "https://checkout.stripe.test/c/pay/cs_test_1".to_owned(),
        })
    }

    async fn create_portal_session(
        &self,
        customer_ref: &str,
        _return_url: &str,
    ) -> anyhow::Result<RedirectSession> {
        if self.fail {
            anyhow::bail!("provider unavailable");
        }
        Ok(RedirectSession {
            url: format!("https://billing.stripe.test/p/session/{customer_ref}"),
        })
    }

    async fn create_product(&self, name: &str, _description: &str) -> anyhow::Result<String> {
        if self.fail {
            anyhow::bail!("provider unavailable");
        }
        let mut products = self.products.lock().unwrap();
        products.push(name.to_owned());
        Ok(format!("prod_{}", products.len()))
    }

    async fn create_price(&self, request: &PriceRequest) -> anyhow::Result<String> {
        if self.fail {
            anyhow::bail!("provider unavailable");
        }
        self.prices.lock().unwrap().push(request.clone());
        Ok(format!("price_{}_{}", request.product_id, request.cycle))
    }
}

// ── MockPlanRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockPlanRepo {
    pub plans: Arc<Mutex<Vec<CatalogPlan>>>,
}

impl MockPlanRepo {
    pub fn new(plans: Vec<CatalogPlan>) -> Self {
        Self {
            plans: Arc::new(Mutex::new(plans)),
        }
    }

    pub fn plans_handle(&self) -> Arc<Mutex<Vec<CatalogPlan>>> {
        Arc::clone(&self.plans)
    }
}

impl PlanCatalogRepository for MockPlanRepo {
    async fn list(&self) -> Result<Vec<CatalogPlan>, AdminServiceError> {
        let mut all = self.plans.lock().unwrap().clone();
        all.sort_by(|a, b| {
            (a.monthly_price_cents, &a.name).cmp(&(b.monthly_price_cents, &b.name))
        });
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogPlan>, AdminServiceError> {
        Ok(self.plans.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, plan: &CatalogPlan) -> Result<(), AdminServiceError> {
        self.plans.lock().unwrap().push(plan.clone());
        Ok(())
    }

    async fn update(&self, plan: &CatalogPlan) -> Result<(), AdminServiceError> {
        let mut plans = self.plans.lock().unwrap();
        if let Some(p) = plans.iter_mut().find(|p| p.id == plan.id) {
            *p = plan.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let mut plans = self.plans.lock().unwrap();
        let before = plans.len();
        plans.retain(|p| p.id != id);
        Ok(plans.len() < before)
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
}

impl MockOrderRepo {
    pub fn new(orders: Vec<Order>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
        }
    }

    pub fn orders_handle(&self) -> Arc<Mutex<Vec<Order>>> {
        Arc::clone(&self.orders)
    }
}

impl OrderRepository for MockOrderRepo {
    async fn list(&self) -> Result<Vec<Order>, AdminServiceError> {
        let mut all = self.orders.lock().unwrap().clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AdminServiceError> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn create(&self, order: &Order) -> Result<(), AdminServiceError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), AdminServiceError> {
        let mut orders = self.orders.lock().unwrap();
        if let Some(o) = orders.iter_mut().find(|o| o.id == order.id) {
            *o = order.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let mut orders = self.orders.lock().unwrap();
        let before = orders.len();
        orders.retain(|o| o.id != id);
        Ok(orders.len() < before)
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_customer(name: &str, renewal_date: Option<NaiveDate>) -> HostingCustomer {
    let now = Utc::now();
    HostingCustomer {
        id: Uuid::now_v7(),
        customer_name: name.to_owned(),
        customer_email: format!("{}@customer.test", name.to_lowercase()),
        domain: format!("{}.test", name.to_lowercase()),
        plan: HostingPlan::Business,
        billing_cycle: BillingCycle::Yearly,
        amount_cents: 19_900,
        status: HostingStatus::Active,
        start_date: NaiveDate::from_ymd_opt(2025, 7, 1),
        renewal_date,
        external_customer_ref: None,
        external_subscription_ref: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

/// A customer already linked to provider customer `cus` and subscription `sub`.
pub fn linked_customer(name: &str, cus: &str, sub: &str) -> HostingCustomer {
    HostingCustomer {
        external_customer_ref: Some(cus.to_owned()),
        external_subscription_ref: Some(sub.to_owned()),
        ..test_customer(name, NaiveDate::from_ymd_opt(2026, 7, 1))
    }
}

pub fn test_plan(name: &str, monthly_price_cents: i64) -> CatalogPlan {
    let now = Utc::now();
    CatalogPlan {
        id: Uuid::now_v7(),
        name: name.to_owned(),
        description: format!("{name} hosting"),
        monthly_price_cents,
        yearly_price_cents: monthly_price_cents * 10,
        features: vec!["SSL".to_owned()],
        stripe_product_id: Some("prod_test".to_owned()),
        stripe_price_id_monthly: Some(format!("price_{}_monthly", name.to_lowercase())),
        stripe_price_id_yearly: Some(format!("price_{}_yearly", name.to_lowercase())),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_order(name: &str, service: OrderService, amount_cents: i64) -> Order {
    let now = Utc::now();
    Order {
        id: Uuid::now_v7(),
        customer_name: name.to_owned(),
        customer_email: format!("{}@customer.test", name.to_lowercase()),
        service,
        description: "Five page brochure site".to_owned(),
        amount_cents,
        fulfillment_status: FulfillmentStatus::Pending,
        due_date: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}
