use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use backoffice_domain::hosting::BillingCycle;

use crate::domain::repository::PaymentProvider;
use crate::domain::types::{CheckoutRequest, PriceRequest, ProviderSubscription, RedirectSession};
use crate::webhook::payload::HOSTING_CUSTOMER_METADATA_KEY;

/// API version pinned for every request; response shapes below assume it.
pub const STRIPE_API_VERSION: &str = "2024-12-18.acacia";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Serialize)]
struct LineItem<'a> {
    price: &'a str,
    quantity: u32,
}

#[derive(Serialize)]
struct CheckoutSessionForm<'a> {
    mode: &'static str,
    customer_email: &'a str,
    line_items: Vec<LineItem<'a>>,
    success_url: &'a str,
    cancel_url: &'a str,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<&'static str, String>,
}

impl<'a> CheckoutSessionForm<'a> {
    fn new(request: &'a CheckoutRequest) -> Self {
        let mut metadata = BTreeMap::new();
        if let Some(id) = request.hosting_customer_id {
            metadata.insert(HOSTING_CUSTOMER_METADATA_KEY, id.to_string());
        }
        Self {
            mode: "subscription",
            customer_email: request.customer_email.as_str(),
            line_items: vec![LineItem {
                price: &request.price_id,
                quantity: 1,
            }],
            success_url: &request.success_url,
            cancel_url: &request.cancel_url,
            metadata,
        }
    }
}

#[derive(Serialize)]
struct PortalSessionForm<'a> {
    customer: &'a str,
    return_url: &'a str,
}

#[derive(Serialize)]
struct ProductForm<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct Recurring {
    interval: &'static str,
}

#[derive(Serialize)]
struct PriceForm<'a> {
    product: &'a str,
    unit_amount: i64,
    currency: &'a str,
    recurring: Recurring,
}

impl<'a> PriceForm<'a> {
    fn new(request: &'a PriceRequest) -> Self {
        let interval = match request.cycle {
            BillingCycle::Monthly => "month",
            BillingCycle::Yearly => "year",
        };
        Self {
            product: &request.product_id,
            unit_amount: request.unit_amount_cents,
            currency: &request.currency,
            recurring: Recurring { interval },
        }
    }
}

/// Any object the caller only needs the id of.
#[derive(Deserialize)]
struct CreatedObject {
    id: String,
}

#[derive(Deserialize)]
struct SubscriptionResponse {
    id: String,
    status: String,
    current_period_end: i64,
}

#[derive(Deserialize)]
struct SessionResponse {
    url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl StripeClient {
    pub fn new(api_base: &str, secret_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_owned(),
            secret_key: secret_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> anyhow::Result<T> {
        let resp = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.secret_key)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .send()
            .await
            .with_context(|| format!("GET {path}"))?;
        Self::decode(path, resp).await
    }

    async fn post_form<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> anyhow::Result<T> {
        let form = serde_qs::to_string(body).context("encode form body")?;
        let resp = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.secret_key)
            .header("Stripe-Version", STRIPE_API_VERSION)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form)
            .send()
            .await
            .with_context(|| format!("POST {path}"))?;
        Self::decode(path, resp).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, resp: reqwest::Response) -> anyhow::Result<T> {
        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .with_context(|| format!("decode response from {path}"));
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or(body);
        Err(anyhow!("{path} returned {status}: {message}"))
    }
}

impl PaymentProvider for StripeClient {
    async fn retrieve_subscription(
        &self,
        subscription_ref: &str,
    ) -> anyhow::Result<ProviderSubscription> {
        let sub: SubscriptionResponse = self
            .get(&format!("/v1/subscriptions/{subscription_ref}"))
            .await?;
        Ok(ProviderSubscription {
            id: sub.id,
            status: sub.status,
            current_period_end: sub.current_period_end,
        })
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> anyhow::Result<RedirectSession> {
        let session: SessionResponse = self
            .post_form("/v1/checkout/sessions", &CheckoutSessionForm::new(request))
            .await?;
        let url = session
            .url
            .ok_or_else(|| anyhow!("checkout session has no url"))?;
        Ok(RedirectSession { url })
    }

    async fn create_portal_session(
        &self,
        customer_ref: &str,
        return_url: &str,
    ) -> anyhow::Result<RedirectSession> {
        let form = PortalSessionForm {
            customer: customer_ref,
            return_url,
        };
        let session: SessionResponse = self
            .post_form("/v1/billing_portal/sessions", &form)
            .await?;
        let url = session
            .url
            .ok_or_else(|| anyhow!("portal session has no url"))?;
        Ok(RedirectSession { url })
    }

    async fn create_product(&self, name: &str, description: &str) -> anyhow::Result<String> {
        let product: CreatedObject = self
            .post_form("/v1/products", &ProductForm { name, description })
            .await?;
        Ok(product.id)
    }

    async fn create_price(&self, request: &PriceRequest) -> anyhow::Result<String> {
        let price: CreatedObject = self
            .post_form("/v1/prices", &PriceForm::new(request))
            .await?;
        Ok(price.id)
    }
}
