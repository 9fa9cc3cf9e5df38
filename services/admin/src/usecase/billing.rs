use uuid::Uuid;

use backoffice_domain::email::EmailAddress;
use backoffice_domain::hosting::BillingCycle;

use crate::domain::repository::{HostingCustomerRepository, PaymentProvider, PlanCatalogRepository};
use crate::domain::types::{CheckoutRequest, RedirectSession};
use crate::error::AdminServiceError;

/// Either `price_id` or `plan_id` names what is sold; `price_id` wins.
pub struct CreateCheckoutInput {
    pub price_id: Option<String>,
    pub plan_id: Option<Uuid>,
    pub billing_cycle: BillingCycle,
    pub customer_email: EmailAddress,
    pub hosting_customer_id: Option<Uuid>,
}

/// Starts a subscription checkout; redirects land back on the hosting admin page.
pub struct CreateCheckoutUseCase<C, R, P>
where
    C: HostingCustomerRepository,
    R: PlanCatalogRepository,
    P: PaymentProvider,
{
    pub customers: C,
    pub plans: R,
    pub provider: P,
    pub base_url: String,
}

impl<C, R, P> CreateCheckoutUseCase<C, R, P>
where
    C: HostingCustomerRepository,
    R: PlanCatalogRepository,
    P: PaymentProvider,
{
    pub async fn execute(
        &self,
        input: CreateCheckoutInput,
    ) -> Result<RedirectSession, AdminServiceError> {
        let price_id = self.resolve_price(&input).await?;
        if let Some(id) = input.hosting_customer_id {
            self.customers
                .find_by_id(id)
                .await?
                .ok_or(AdminServiceError::NotFound)?;
        }

        let request = CheckoutRequest {
            price_id,
            customer_email: input.customer_email,
            hosting_customer_id: input.hosting_customer_id,
            success_url: format!("{}/admin/hosting?checkout=success", self.base_url),
            cancel_url: format!("{}/admin/hosting?checkout=cancelled", self.base_url),
        };
        self.provider
            .create_checkout_session(&request)
            .await
            .map_err(AdminServiceError::PaymentProvider)
    }

    async fn resolve_price(&self, input: &CreateCheckoutInput) -> Result<String, AdminServiceError> {
        let explicit = input
            .price_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());
        if let Some(price_id) = explicit {
            return Ok(price_id.to_owned());
        }
        let plan_id = input
            .plan_id
            .ok_or(AdminServiceError::Validation("price id or plan id is required"))?;
        let plan = self
            .plans
            .find_by_id(plan_id)
            .await?
            .ok_or(AdminServiceError::NotFound)?;
        plan.price_for(input.billing_cycle)
            .map(str::to_owned)
            .ok_or(AdminServiceError::Validation("plan has no price for this billing cycle"))
    }
}

pub struct CreatePortalUseCase<P: PaymentProvider> {
    pub provider: P,
    pub base_url: String,
}

impl<P: PaymentProvider> CreatePortalUseCase<P> {
    pub async fn execute(&self, customer_ref: &str) -> Result<RedirectSession, AdminServiceError> {
        let customer_ref = customer_ref.trim();
        if customer_ref.is_empty() {
            return Err(AdminServiceError::Validation("customer id is required"));
        }
        let return_url = format!("{}/admin/hosting", self.base_url);
        self.provider
            .create_portal_session(customer_ref, &return_url)
            .await
            .map_err(AdminServiceError::PaymentProvider)
    }
}
