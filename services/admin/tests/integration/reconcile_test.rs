use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;

use backoffice_admin::error::AdminServiceError;
use backoffice_admin::usecase::reconcile::{
    ReconcileInput, ReconcileOutcome, ReconcileWebhookUseCase,
};
use backoffice_domain::hosting::HostingStatus;
use backoffice_testing::stripe::{
    TEST_WEBHOOK_SECRET, checkout_completed, event, invoice_payment_failed,
    invoice_payment_succeeded, signature_header, subscription_deleted, subscription_updated,
};

use crate::helpers::{
    MockEventLedger, MockHostingRepo, MockMailer, MockProvider, linked_customer, test_customer,
};

/// 2027-01-01T12:00:00Z
const PERIOD_END: i64 = 1_798_804_800;

struct Harness {
    customers: MockHostingRepo,
    ledger: MockEventLedger,
    provider: MockProvider,
    mailer: MockMailer,
}

impl Harness {
    fn new(customers: MockHostingRepo) -> Self {
        Self {
            customers,
            ledger: MockEventLedger::default(),
            provider: MockProvider::with_subscription("sub_1", PERIOD_END),
            mailer: MockMailer::default(),
        }
    }

    fn usecase(
        &self,
    ) -> ReconcileWebhookUseCase<MockHostingRepo, MockEventLedger, MockProvider, MockMailer> {
        ReconcileWebhookUseCase {
            customers: self.customers.clone(),
            events: self.ledger.clone(),
            provider: self.provider.clone(),
            mailer: self.mailer.clone(),
            signing_secret: TEST_WEBHOOK_SECRET.to_owned(),
        }
    }

    async fn deliver(&self, payload: &[u8]) -> Result<ReconcileOutcome, AdminServiceError> {
        let now = Utc::now();
        let header = signature_header(payload, TEST_WEBHOOK_SECRET, now.timestamp());
        self.usecase()
            .execute(ReconcileInput {
                payload,
                signature: Some(header.as_str()),
                received_at: now,
            })
            .await
    }

    fn sent(&self) -> usize {
        self.mailer.sent_handle().lock().unwrap().len()
    }

    fn processed(&self) -> Vec<String> {
        self.ledger.processed_handle().lock().unwrap().clone()
    }
}

// ── Authenticity ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_bad_signature_without_mutation() {
    let customer = linked_customer("Dave", "cus_1", "sub_1");
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));
    let payload = subscription_deleted("evt_1", "cus_1", "sub_1");
    let header = signature_header(&payload, "whsec_wrong", Utc::now().timestamp());

    let result = h
        .usecase()
        .execute(ReconcileInput {
            payload: &payload,
            signature: Some(header.as_str()),
            received_at: Utc::now(),
        })
        .await;

    assert!(
        matches!(result, Err(AdminServiceError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
    assert_eq!(h.customers.get(id).status, HostingStatus::Active);
    assert!(h.processed().is_empty());
}

#[tokio::test]
async fn should_reject_missing_signature() {
    let h = Harness::new(MockHostingRepo::default());
    let payload = subscription_deleted("evt_1", "cus_1", "sub_1");

    let result = h
        .usecase()
        .execute(ReconcileInput {
            payload: &payload,
            signature: None,
            received_at: Utc::now(),
        })
        .await;

    assert!(
        matches!(result, Err(AdminServiceError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_replayed_stale_signature() {
    let h = Harness::new(MockHostingRepo::default());
    let payload = subscription_deleted("evt_1", "cus_1", "sub_1");
    let signed_at = Utc::now() - Duration::minutes(10);
    let header = signature_header(&payload, TEST_WEBHOOK_SECRET, signed_at.timestamp());

    let result = h
        .usecase()
        .execute(ReconcileInput {
            payload: &payload,
            signature: Some(header.as_str()),
            received_at: Utc::now(),
        })
        .await;

    assert!(
        matches!(result, Err(AdminServiceError::InvalidSignature)),
        "expected InvalidSignature, got {result:?}"
    );
}

#[tokio::test]
async fn should_reject_signed_but_malformed_payload() {
    let h = Harness::new(MockHostingRepo::default());

    let result = h.deliver(b"{\"id\":\"evt_1\"").await;
    assert!(
        matches!(result, Err(AdminServiceError::MalformedPayload)),
        "expected MalformedPayload, got {result:?}"
    );

    let missing_customer = event(
        "evt_2",
        "customer.subscription.updated",
        json!({ "id": "sub_1", "status": "active" }),
    );
    let result = h.deliver(&missing_customer).await;
    assert!(
        matches!(result, Err(AdminServiceError::MalformedPayload)),
        "expected MalformedPayload, got {result:?}"
    );
    assert!(h.processed().is_empty());
}

// ── Checkout ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_link_customer_on_checkout_completed() {
    let customer = test_customer("Erin", None);
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));

    let outcome = h
        .deliver(&checkout_completed("evt_1", &id.to_string(), "cus_9", "sub_9"))
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied);
    let stored = h.customers.get(id);
    assert_eq!(stored.status, HostingStatus::Active);
    assert_eq!(stored.external_customer_ref.as_deref(), Some("cus_9"));
    assert_eq!(stored.external_subscription_ref.as_deref(), Some("sub_9"));
    assert_eq!(h.processed(), vec!["evt_1".to_owned()]);
}

#[tokio::test]
async fn should_apply_replayed_checkout_once() {
    let customer = test_customer("Erin", None);
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));
    let payload = checkout_completed("evt_1", &id.to_string(), "cus_9", "sub_9");

    assert_eq!(h.deliver(&payload).await.unwrap(), ReconcileOutcome::Applied);
    let after_first = h.customers.get(id);

    assert_eq!(
        h.deliver(&payload).await.unwrap(),
        ReconcileOutcome::Duplicate
    );
    let after_second = h.customers.get(id);
    assert_eq!(after_second.updated_at, after_first.updated_at);
    assert_eq!(after_second.status, after_first.status);
    assert_eq!(h.processed().len(), 1);
}

#[tokio::test]
async fn should_reactivate_cancelled_customer_on_checkout() {
    let mut customer = linked_customer("Erin", "cus_old", "sub_old");
    customer.status = HostingStatus::Cancelled;
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));

    h.deliver(&checkout_completed("evt_1", &id.to_string(), "cus_new", "sub_new"))
        .await
        .unwrap();

    let stored = h.customers.get(id);
    assert_eq!(stored.status, HostingStatus::Active);
    assert_eq!(stored.external_subscription_ref.as_deref(), Some("sub_new"));
}

#[tokio::test]
async fn should_skip_checkout_for_unknown_or_missing_link() {
    let h = Harness::new(MockHostingRepo::default());

    let unknown = checkout_completed("evt_1", &uuid::Uuid::now_v7().to_string(), "cus_1", "sub_1");
    assert_eq!(h.deliver(&unknown).await.unwrap(), ReconcileOutcome::Skipped);

    let unlinked = event(
        "evt_2",
        "checkout.session.completed",
        json!({ "id": "cs_1", "customer": "cus_1", "subscription": "sub_1" }),
    );
    assert_eq!(h.deliver(&unlinked).await.unwrap(), ReconcileOutcome::Skipped);

    assert!(h.customers.customers_handle().lock().unwrap().is_empty());
    assert_eq!(h.processed().len(), 2, "skipped events are still acknowledged");
}

#[tokio::test]
async fn should_skip_checkout_without_provider_customer() {
    let mut customer = test_customer("Erin", None);
    customer.status = HostingStatus::Suspended;
    let id = customer.id;
    let before = customer.updated_at;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));

    let payload = event(
        "evt_1",
        "checkout.session.completed",
        json!({
            "id": "cs_1",
            "customer": null,
            "subscription": "sub_1",
            "metadata": { "hostingCustomerId": id.to_string() },
        }),
    );
    let outcome = h.deliver(&payload).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped);
    let stored = h.customers.get(id);
    assert_eq!(stored.status, HostingStatus::Suspended);
    assert_eq!(stored.external_customer_ref, None);
    assert_eq!(stored.external_subscription_ref, None);
    assert_eq!(stored.updated_at, before);
    assert_eq!(h.processed(), vec!["evt_1".to_owned()]);
}

// ── Subscription lifecycle ───────────────────────────────────────────────────

#[tokio::test]
async fn should_mirror_subscription_status() {
    let customer = linked_customer("Fay", "cus_1", "sub_1");
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));

    h.deliver(&subscription_updated("evt_1", "cus_1", "sub_1", "past_due"))
        .await
        .unwrap();
    assert_eq!(h.customers.get(id).status, HostingStatus::Suspended);

    h.deliver(&subscription_updated("evt_2", "cus_1", "sub_1", "active"))
        .await
        .unwrap();
    assert_eq!(h.customers.get(id).status, HostingStatus::Active);
}

#[tokio::test]
async fn should_keep_cancelled_customer_cancelled() {
    let customer = linked_customer("Fay", "cus_1", "sub_1");
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));

    let outcome = h
        .deliver(&subscription_deleted("evt_1", "cus_1", "sub_1"))
        .await
        .unwrap();
    assert_eq!(outcome, ReconcileOutcome::Applied);
    assert_eq!(h.customers.get(id).status, HostingStatus::Cancelled);

    for (payload, label) in [
        (subscription_updated("evt_2", "cus_1", "sub_1", "active"), "updated"),
        (invoice_payment_succeeded("evt_3", "cus_1", "sub_1"), "paid"),
        (invoice_payment_failed("evt_4", "cus_1", "sub_1"), "failed"),
        (subscription_deleted("evt_5", "cus_1", "sub_1"), "deleted"),
    ] {
        let outcome = h.deliver(&payload).await.unwrap();
        assert_eq!(outcome, ReconcileOutcome::Skipped, "late {label} event");
        assert_eq!(h.customers.get(id).status, HostingStatus::Cancelled);
    }
    assert_eq!(h.sent(), 0, "no payment failure email for a cancelled customer");
}

#[tokio::test]
async fn should_apply_events_for_new_subscription_after_cancellation() {
    let mut customer = linked_customer("Fay", "cus_1", "sub_old");
    customer.status = HostingStatus::Cancelled;
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));

    let outcome = h
        .deliver(&subscription_updated("evt_1", "cus_1", "sub_1", "active"))
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied);
    let stored = h.customers.get(id);
    assert_eq!(stored.status, HostingStatus::Active);
    assert_eq!(stored.external_subscription_ref.as_deref(), Some("sub_1"));
}

// ── Invoices ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_extend_renewal_date_on_paid_invoice() {
    let mut customer = linked_customer("Gus", "cus_1", "sub_1");
    customer.status = HostingStatus::Suspended;
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));

    h.deliver(&invoice_payment_succeeded("evt_1", "cus_1", "sub_1"))
        .await
        .unwrap();

    let stored = h.customers.get(id);
    assert_eq!(stored.status, HostingStatus::Active);
    assert_eq!(stored.renewal_date, NaiveDate::from_ymd_opt(2027, 1, 1));
}

#[tokio::test]
async fn should_leave_event_unacknowledged_when_provider_fails() {
    let customer = linked_customer("Gus", "cus_1", "sub_1");
    let id = customer.id;
    let before = customer.renewal_date;
    let h = Harness {
        provider: MockProvider::failing(),
        ..Harness::new(MockHostingRepo::new(vec![customer]))
    };

    let result = h
        .deliver(&invoice_payment_succeeded("evt_1", "cus_1", "sub_1"))
        .await;

    assert!(
        matches!(result, Err(AdminServiceError::Internal(_))),
        "expected Internal, got {result:?}"
    );
    assert_eq!(h.customers.get(id).renewal_date, before);
    assert!(h.processed().is_empty(), "failed event must stay retryable");
}

#[tokio::test]
async fn should_suspend_and_notify_once_on_failed_payment() {
    let customer = linked_customer("Hal", "cus_1", "sub_1");
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));
    let payload = invoice_payment_failed("evt_1", "cus_1", "sub_1");

    assert_eq!(h.deliver(&payload).await.unwrap(), ReconcileOutcome::Applied);
    assert_eq!(
        h.deliver(&payload).await.unwrap(),
        ReconcileOutcome::Duplicate
    );

    assert_eq!(h.customers.get(id).status, HostingStatus::Suspended);
    let sent = h.mailer.sent_handle();
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "exactly one payment failure email");
    assert_eq!(sent[0].to, "hal@customer.test");
    assert_eq!(sent[0].subject, "Payment Failed - hal.test");
}

#[tokio::test]
async fn should_suspend_even_when_notification_fails() {
    let customer = linked_customer("Hal", "cus_1", "sub_1");
    let id = customer.id;
    let h = Harness {
        mailer: MockMailer::failing(),
        ..Harness::new(MockHostingRepo::new(vec![customer]))
    };

    let outcome = h
        .deliver(&invoice_payment_failed("evt_1", "cus_1", "sub_1"))
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied);
    assert_eq!(h.customers.get(id).status, HostingStatus::Suspended);
    assert_eq!(h.processed().len(), 1);
}

// ── Unmatched and unknown ────────────────────────────────────────────────────

#[tokio::test]
async fn should_acknowledge_unmatched_customer_without_creating_records() {
    let h = Harness::new(MockHostingRepo::new(vec![linked_customer("Ivy", "cus_1", "sub_1")]));

    let outcome = h
        .deliver(&invoice_payment_failed("evt_1", "cus_unknown", "sub_x"))
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Skipped);
    assert_eq!(h.customers.customers_handle().lock().unwrap().len(), 1);
    assert_eq!(h.sent(), 0);
}

#[tokio::test]
async fn should_acknowledge_unhandled_event_type() {
    let h = Harness::new(MockHostingRepo::default());
    let payload = event("evt_1", "customer.created", json!({ "id": "cus_1" }));

    assert_eq!(h.deliver(&payload).await.unwrap(), ReconcileOutcome::Skipped);
    assert_eq!(h.processed(), vec!["evt_1".to_owned()]);
}

// ── End to end ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_follow_full_billing_lifecycle() {
    let customer = test_customer("Jon", None);
    let id = customer.id;
    let h = Harness::new(MockHostingRepo::new(vec![customer]));
    let status = |h: &Harness| h.customers.get(id).status;

    h.deliver(&checkout_completed("evt_1", &id.to_string(), "cus_1", "sub_1"))
        .await
        .unwrap();
    assert_eq!(status(&h), HostingStatus::Active);

    h.deliver(&invoice_payment_succeeded("evt_2", "cus_1", "sub_1"))
        .await
        .unwrap();
    assert_eq!(
        h.customers.get(id).renewal_date,
        NaiveDate::from_ymd_opt(2027, 1, 1)
    );

    h.deliver(&invoice_payment_failed("evt_3", "cus_1", "sub_1"))
        .await
        .unwrap();
    assert_eq!(status(&h), HostingStatus::Suspended);
    assert_eq!(h.sent(), 1);

    h.deliver(&invoice_payment_succeeded("evt_4", "cus_1", "sub_1"))
        .await
        .unwrap();
    assert_eq!(status(&h), HostingStatus::Active);

    h.deliver(&subscription_deleted("evt_5", "cus_1", "sub_1"))
        .await
        .unwrap();
    assert_eq!(status(&h), HostingStatus::Cancelled);

    h.deliver(&invoice_payment_failed("evt_6", "cus_1", "sub_1"))
        .await
        .unwrap();
    assert_eq!(status(&h), HostingStatus::Cancelled);
    assert_eq!(h.sent(), 1);
    assert_eq!(h.processed().len(), 6);
}
