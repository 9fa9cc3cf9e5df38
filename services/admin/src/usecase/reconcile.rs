use chrono::{DateTime, Utc};

use backoffice_domain::hosting::HostingStatus;

use crate::domain::event::{BillingEvent, WebhookEvent};
use crate::domain::repository::{
    HostingCustomerRepository, Mailer, PaymentProvider, WebhookEventRepository,
};
use crate::domain::types::{BillingUpdate, HostingCustomer};
use crate::error::AdminServiceError;
use crate::templates::payment_failed_email;
use crate::webhook::payload::parse_event;
use crate::webhook::signature::{self, DEFAULT_TOLERANCE_SECS};

pub struct ReconcileInput<'a> {
    /// Raw request body, exactly as received.
    pub payload: &'a [u8],
    /// `Stripe-Signature` header value.
    pub signature: Option<&'a str>,
    pub received_at: DateTime<Utc>,
}

/// What happened to an authenticated event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied,
    /// Event id already in the ledger.
    Duplicate,
    /// Unhandled type, unmatched customer, or a terminal record.
    Skipped,
}

pub struct ReconcileWebhookUseCase<C, W, P, M>
where
    C: HostingCustomerRepository,
    W: WebhookEventRepository,
    P: PaymentProvider,
    M: Mailer,
{
    pub customers: C,
    pub events: W,
    pub provider: P,
    pub mailer: M,
    pub signing_secret: String,
}

/// Cancelled records ignore later events for the subscription they were cancelled on.
fn is_settled(customer: &HostingCustomer, subscription_ref: Option<&str>) -> bool {
    if !customer.status.is_terminal() {
        return false;
    }
    match subscription_ref {
        Some(sub) => customer.external_subscription_ref.as_deref() == Some(sub),
        None => true,
    }
}

impl<C, W, P, M> ReconcileWebhookUseCase<C, W, P, M>
where
    C: HostingCustomerRepository,
    W: WebhookEventRepository,
    P: PaymentProvider,
    M: Mailer,
{
    pub async fn execute(
        &self,
        input: ReconcileInput<'_>,
    ) -> Result<ReconcileOutcome, AdminServiceError> {
        let header = input.signature.ok_or(AdminServiceError::InvalidSignature)?;
        signature::verify(
            input.payload,
            header,
            &self.signing_secret,
            input.received_at.timestamp(),
            DEFAULT_TOLERANCE_SECS,
        )
        .map_err(|e| {
            tracing::warn!(reason = %e, "rejected webhook signature");
            AdminServiceError::InvalidSignature
        })?;

        let event = parse_event(input.payload).map_err(|e| {
            tracing::warn!(error = %e, "rejected webhook payload");
            AdminServiceError::MalformedPayload
        })?;

        if self.events.is_processed(&event.id).await? {
            tracing::info!(event_id = %event.id, event_type = %event.event_type, "duplicate webhook event");
            return Ok(ReconcileOutcome::Duplicate);
        }

        let outcome = self.apply(&event, input.received_at).await?;
        self.events
            .mark_processed(&event.id, &event.event_type, input.received_at)
            .await?;
        Ok(outcome)
    }

    async fn apply(
        &self,
        event: &WebhookEvent,
        now: DateTime<Utc>,
    ) -> Result<ReconcileOutcome, AdminServiceError> {
        let event_id = event.id.as_str();
        match &event.kind {
            BillingEvent::CheckoutCompleted {
                hosting_customer_id,
                customer_ref,
                subscription_ref,
            } => {
                let Some(id) = hosting_customer_id else {
                    tracing::info!(event_id, "checkout without a hosting customer link");
                    return Ok(ReconcileOutcome::Skipped);
                };
                // Without a provider customer no later event could reach the record.
                let Some(customer_ref) = customer_ref else {
                    tracing::warn!(event_id, hosting_customer_id = %id, "checkout without a provider customer");
                    return Ok(ReconcileOutcome::Skipped);
                };
                if self.customers.find_by_id(*id).await?.is_none() {
                    tracing::warn!(event_id, hosting_customer_id = %id, "checkout for unknown hosting customer");
                    return Ok(ReconcileOutcome::Skipped);
                }
                let update = BillingUpdate {
                    status: HostingStatus::Active,
                    external_customer_ref: Some(customer_ref.clone()),
                    external_subscription_ref: subscription_ref.clone(),
                    renewal_date: None,
                };
                self.customers.apply_billing_update(*id, &update, now).await?;
                tracing::info!(event_id, hosting_customer_id = %id, "checkout linked");
                Ok(ReconcileOutcome::Applied)
            }

            BillingEvent::SubscriptionUpdated {
                customer_ref,
                subscription_ref,
                provider_status,
            } => {
                let Some(customer) = self.linked(event_id, customer_ref).await? else {
                    return Ok(ReconcileOutcome::Skipped);
                };
                if is_settled(&customer, Some(subscription_ref.as_str())) {
                    tracing::info!(event_id, customer_ref = %customer_ref, "subscription already cancelled");
                    return Ok(ReconcileOutcome::Skipped);
                }
                let status = if provider_status == "active" {
                    HostingStatus::Active
                } else {
                    HostingStatus::Suspended
                };
                let update = BillingUpdate {
                    external_subscription_ref: Some(subscription_ref.clone()),
                    ..BillingUpdate::status(status)
                };
                self.customers
                    .apply_billing_update(customer.id, &update, now)
                    .await?;
                Ok(ReconcileOutcome::Applied)
            }

            BillingEvent::SubscriptionDeleted { customer_ref, .. } => {
                let Some(customer) = self.linked(event_id, customer_ref).await? else {
                    return Ok(ReconcileOutcome::Skipped);
                };
                if customer.status == HostingStatus::Cancelled {
                    return Ok(ReconcileOutcome::Skipped);
                }
                self.customers
                    .apply_billing_update(
                        customer.id,
                        &BillingUpdate::status(HostingStatus::Cancelled),
                        now,
                    )
                    .await?;
                Ok(ReconcileOutcome::Applied)
            }

            BillingEvent::InvoicePaymentSucceeded {
                customer_ref,
                subscription_ref,
            } => {
                let Some(subscription_ref) = subscription_ref else {
                    tracing::info!(event_id, "invoice without subscription");
                    return Ok(ReconcileOutcome::Skipped);
                };
                let Some(customer) = self.linked(event_id, customer_ref).await? else {
                    return Ok(ReconcileOutcome::Skipped);
                };
                if is_settled(&customer, Some(subscription_ref.as_str())) {
                    tracing::info!(event_id, customer_ref = %customer_ref, "subscription already cancelled");
                    return Ok(ReconcileOutcome::Skipped);
                }

                let subscription = self
                    .provider
                    .retrieve_subscription(subscription_ref)
                    .await
                    .map_err(|e| e.context("retrieve subscription"))?;
                let period_end = DateTime::from_timestamp(subscription.current_period_end, 0)
                    .ok_or_else(|| anyhow::anyhow!("current_period_end out of range"))?;

                let update = BillingUpdate {
                    renewal_date: Some(period_end.date_naive()),
                    ..BillingUpdate::status(HostingStatus::Active)
                };
                self.customers
                    .apply_billing_update(customer.id, &update, now)
                    .await?;
                Ok(ReconcileOutcome::Applied)
            }

            BillingEvent::InvoicePaymentFailed {
                customer_ref,
                subscription_ref,
            } => {
                let Some(customer) = self.linked(event_id, customer_ref).await? else {
                    return Ok(ReconcileOutcome::Skipped);
                };
                if is_settled(&customer, subscription_ref.as_deref()) {
                    tracing::info!(event_id, customer_ref = %customer_ref, "subscription already cancelled");
                    return Ok(ReconcileOutcome::Skipped);
                }
                self.customers
                    .apply_billing_update(
                        customer.id,
                        &BillingUpdate::status(HostingStatus::Suspended),
                        now,
                    )
                    .await?;

                let email = payment_failed_email(
                    &customer.customer_email,
                    &customer.customer_name,
                    &customer.domain,
                    customer.plan.as_str(),
                );
                if let Err(e) = self.mailer.send(&email).await {
                    // Status change is already committed.
                    tracing::warn!(event_id, hosting_customer_id = %customer.id, error = ?e, "payment failure notification not sent");
                }
                Ok(ReconcileOutcome::Applied)
            }

            BillingEvent::Ignored => {
                tracing::debug!(event_id, event_type = %event.event_type, "unhandled webhook event");
                Ok(ReconcileOutcome::Skipped)
            }
        }
    }

    async fn linked(
        &self,
        event_id: &str,
        customer_ref: &str,
    ) -> Result<Option<HostingCustomer>, AdminServiceError> {
        let found = self.customers.find_by_external_customer(customer_ref).await?;
        if found.is_none() {
            tracing::warn!(event_id, customer_ref, "no hosting customer for provider customer");
        }
        Ok(found)
    }
}
