use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use backoffice_admin::domain::types::HostingDraft;
use backoffice_admin::error::AdminServiceError;
use backoffice_admin::handlers::hosting::HostingRequest;
use backoffice_admin::usecase::reconcile::{
    ReconcileInput, ReconcileOutcome, ReconcileWebhookUseCase,
};
use backoffice_admin::usecase::hosting::{
    CreateHostingCustomerUseCase, DeleteHostingCustomerUseCase, ListHostingCustomersUseCase,
    SendRenewalReminderUseCase, UpdateHostingCustomerUseCase,
};
use backoffice_domain::email::EmailAddress;
use backoffice_domain::hosting::{BillingCycle, HostingPlan, HostingStatus};
use backoffice_testing::stripe::{TEST_WEBHOOK_SECRET, invoice_payment_failed, signature_header};

use crate::helpers::{
    MockEventLedger, MockHostingRepo, MockMailer, MockProvider, linked_customer, test_customer,
};

fn draft(name: &str) -> HostingDraft {
    HostingDraft {
        customer_name: name.to_owned(),
        customer_email: EmailAddress::parse(&format!("{}@customer.test", name.to_lowercase()))
            .unwrap(),
        domain: format!("{}.test", name.to_lowercase()),
        plan: HostingPlan::Starter,
        billing_cycle: BillingCycle::Monthly,
        amount_cents: 990,
        status: HostingStatus::Active,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        renewal_date: NaiveDate::from_ymd_opt(2026, 2, 1),
        external_customer_ref: None,
        external_subscription_ref: None,
        notes: None,
    }
}

#[tokio::test]
async fn should_create_and_list_customers_by_renewal_date() {
    let repo = MockHostingRepo::new(vec![
        test_customer("Zed", NaiveDate::from_ymd_opt(2026, 9, 1)),
        test_customer("Amy", None),
    ]);

    let created = CreateHostingCustomerUseCase {
        customers: repo.clone(),
    }
    .execute(draft("Kim"))
    .await
    .unwrap();
    assert_eq!(created.created_at, created.updated_at);

    let listed = ListHostingCustomersUseCase { customers: repo }
        .execute()
        .await
        .unwrap();
    let names: Vec<&str> = listed.iter().map(|c| c.customer_name.as_str()).collect();
    assert_eq!(names, ["Kim", "Zed", "Amy"]);
}

#[tokio::test]
async fn should_overwrite_fields_on_admin_edit() {
    let existing = test_customer("Lea", NaiveDate::from_ymd_opt(2026, 5, 1));
    let id = existing.id;
    let created_at = existing.created_at;
    let repo = MockHostingRepo::new(vec![existing]);

    let edited = UpdateHostingCustomerUseCase {
        customers: repo.clone(),
    }
    .execute(
        id,
        HostingDraft {
            status: HostingStatus::Expired,
            notes: Some("moved to annual".to_owned()),
            ..draft("Lea")
        },
    )
    .await
    .unwrap();

    assert_eq!(edited.id, id);
    assert_eq!(edited.created_at, created_at);
    let stored = repo.get(id);
    assert_eq!(stored.status, HostingStatus::Expired);
    assert_eq!(stored.plan, HostingPlan::Starter);
    assert_eq!(stored.notes.as_deref(), Some("moved to annual"));
}

/// Resubmit a record exactly as the list endpoint rendered it, with one change.
async fn edit_as_listed(
    repo: &MockHostingRepo,
    id: Uuid,
    change: impl FnOnce(&mut serde_json::Value),
) -> backoffice_admin::domain::types::HostingCustomer {
    let listed = ListHostingCustomersUseCase {
        customers: repo.clone(),
    }
    .execute()
    .await
    .unwrap();
    let record = listed.into_iter().find(|c| c.id == id).unwrap();
    let mut body = serde_json::to_value(&record).unwrap();
    change(&mut body);

    let request: HostingRequest = serde_json::from_value(body).unwrap();
    UpdateHostingCustomerUseCase {
        customers: repo.clone(),
    }
    .execute(id, request.into_draft().unwrap())
    .await
    .unwrap()
}

#[tokio::test]
async fn should_keep_billing_link_through_listed_round_trip() {
    let existing = linked_customer("Pat", "cus_1", "sub_1");
    let id = existing.id;
    let repo = MockHostingRepo::new(vec![existing]);

    let edited = edit_as_listed(&repo, id, |body| {
        body["notes"] = serde_json::json!("called about upgrade");
    })
    .await;
    assert_eq!(edited.notes.as_deref(), Some("called about upgrade"));
    assert_eq!(edited.external_customer_ref.as_deref(), Some("cus_1"));
    assert_eq!(edited.external_subscription_ref.as_deref(), Some("sub_1"));

    let mailer = MockMailer::default();
    let reconcile = ReconcileWebhookUseCase {
        customers: repo.clone(),
        events: MockEventLedger::default(),
        provider: MockProvider::default(),
        mailer: mailer.clone(),
        signing_secret: TEST_WEBHOOK_SECRET.to_owned(),
    };
    let payload = invoice_payment_failed("evt_pf", "cus_1", "sub_1");
    let now = Utc::now();
    let header = signature_header(&payload, TEST_WEBHOOK_SECRET, now.timestamp());
    let outcome = reconcile
        .execute(ReconcileInput {
            payload: &payload,
            signature: Some(header.as_str()),
            received_at: now,
        })
        .await
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied);
    assert_eq!(repo.get(id).status, HostingStatus::Suspended);
    assert_eq!(mailer.sent_handle().lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_keep_link_when_edit_omits_it_and_clear_on_null() {
    let existing = linked_customer("Ros", "cus_2", "sub_2");
    let id = existing.id;
    let repo = MockHostingRepo::new(vec![existing]);

    let edited = edit_as_listed(&repo, id, |body| {
        let fields = body.as_object_mut().unwrap();
        fields.remove("stripeCustomerId");
        fields.remove("stripeSubscriptionId");
    })
    .await;
    assert_eq!(edited.external_customer_ref.as_deref(), Some("cus_2"));
    assert_eq!(edited.external_subscription_ref.as_deref(), Some("sub_2"));

    let edited = edit_as_listed(&repo, id, |body| {
        body["stripeSubscriptionId"] = serde_json::Value::Null;
    })
    .await;
    assert_eq!(edited.external_customer_ref.as_deref(), Some("cus_2"));
    assert_eq!(edited.external_subscription_ref, None);
}

#[tokio::test]
async fn should_return_not_found_when_editing_missing_customer() {
    let result = UpdateHostingCustomerUseCase {
        customers: MockHostingRepo::default(),
    }
    .execute(Uuid::now_v7(), draft("Max"))
    .await;

    assert!(
        matches!(result, Err(AdminServiceError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}

#[tokio::test]
async fn should_delete_customer_once() {
    let existing = test_customer("Ned", None);
    let id = existing.id;
    let usecase = DeleteHostingCustomerUseCase {
        customers: MockHostingRepo::new(vec![existing]),
    };

    usecase.execute(id).await.unwrap();
    let result = usecase.execute(id).await;
    assert!(
        matches!(result, Err(AdminServiceError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}

// ── Renewal reminders ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_send_renewal_reminder_with_formatted_date() {
    let existing = test_customer("Olga", NaiveDate::from_ymd_opt(2026, 7, 1));
    let id = existing.id;
    let mailer = MockMailer::default();

    SendRenewalReminderUseCase {
        customers: MockHostingRepo::new(vec![existing]),
        mailer: mailer.clone(),
    }
    .execute(id)
    .await
    .unwrap();

    let sent = mailer.sent_handle();
    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "olga@customer.test");
    assert_eq!(sent[0].subject, "Hosting Renewal Reminder - olga.test");
    assert!(sent[0].html.contains("1 July 2026"), "html: {}", sent[0].html);
}

#[tokio::test]
async fn should_refuse_reminder_without_renewal_date() {
    let existing = test_customer("Pia", None);
    let id = existing.id;
    let mailer = MockMailer::default();

    let result = SendRenewalReminderUseCase {
        customers: MockHostingRepo::new(vec![existing]),
        mailer: mailer.clone(),
    }
    .execute(id)
    .await;

    assert!(
        matches!(result, Err(AdminServiceError::Validation(_))),
        "expected Validation, got {result:?}"
    );
    assert!(mailer.sent_handle().lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_reminder_delivery_failure() {
    let existing = test_customer("Quin", NaiveDate::from_ymd_opt(2026, 7, 1));
    let id = existing.id;

    let result = SendRenewalReminderUseCase {
        customers: MockHostingRepo::new(vec![existing]),
        mailer: MockMailer::failing(),
    }
    .execute(id)
    .await;

    assert!(
        matches!(result, Err(AdminServiceError::Delivery(_))),
        "expected Delivery, got {result:?}"
    );
}

#[tokio::test]
async fn should_return_not_found_for_reminder_to_missing_customer() {
    let result = SendRenewalReminderUseCase {
        customers: MockHostingRepo::default(),
        mailer: MockMailer::default(),
    }
    .execute(Uuid::now_v7())
    .await;

    assert!(
        matches!(result, Err(AdminServiceError::NotFound)),
        "expected NotFound, got {result:?}"
    );
}
