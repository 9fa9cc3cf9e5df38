use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::hosting::BillingCycle;

use crate::domain::repository::{PaymentProvider, PlanCatalogRepository};
use crate::domain::types::{CatalogPlan, PlanDraft, PriceRequest};
use crate::error::AdminServiceError;

pub struct ListPlansUseCase<R: PlanCatalogRepository> {
    pub plans: R,
}

impl<R: PlanCatalogRepository> ListPlansUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<CatalogPlan>, AdminServiceError> {
        self.plans.list().await
    }
}

/// Store a catalogue plan, registering it with the payment provider when no
/// product id was supplied.
pub struct CreatePlanUseCase<R, P>
where
    R: PlanCatalogRepository,
    P: PaymentProvider,
{
    pub plans: R,
    pub provider: P,
    pub currency: String,
}

/// Provider ids created for a new plan.
struct ProviderIds {
    product: String,
    monthly: Option<String>,
    yearly: Option<String>,
}

impl<R, P> CreatePlanUseCase<R, P>
where
    R: PlanCatalogRepository,
    P: PaymentProvider,
{
    pub async fn execute(&self, mut draft: PlanDraft) -> Result<CatalogPlan, AdminServiceError> {
        if draft.stripe_product_id.clone().flatten().is_none() {
            match self.register(&draft).await {
                Ok(ids) => {
                    draft.stripe_product_id = Some(Some(ids.product));
                    draft.stripe_price_id_monthly = Some(ids.monthly);
                    draft.stripe_price_id_yearly = Some(ids.yearly);
                }
                // The plan is still stored; ids can be added by editing it.
                Err(e) => {
                    tracing::warn!(plan = %draft.name, error = ?e, "provider product not created");
                }
            }
        }

        let plan = CatalogPlan::from_draft(draft, Utc::now());
        self.plans.create(&plan).await?;
        tracing::info!(plan_id = %plan.id, "created catalogue plan");
        Ok(plan)
    }

    async fn register(&self, draft: &PlanDraft) -> anyhow::Result<ProviderIds> {
        let product = self
            .provider
            .create_product(&draft.name, &draft.description)
            .await?;
        let monthly = self
            .price(&product, draft.monthly_price_cents, BillingCycle::Monthly)
            .await?;
        let yearly = self
            .price(&product, draft.yearly_price_cents, BillingCycle::Yearly)
            .await?;
        Ok(ProviderIds {
            product,
            monthly,
            yearly,
        })
    }

    async fn price(
        &self,
        product_id: &str,
        unit_amount_cents: i64,
        cycle: BillingCycle,
    ) -> anyhow::Result<Option<String>> {
        if unit_amount_cents == 0 {
            return Ok(None);
        }
        let request = PriceRequest {
            product_id: product_id.to_owned(),
            unit_amount_cents,
            currency: self.currency.clone(),
            cycle,
        };
        self.provider.create_price(&request).await.map(Some)
    }
}

pub struct UpdatePlanUseCase<R: PlanCatalogRepository> {
    pub plans: R,
}

impl<R: PlanCatalogRepository> UpdatePlanUseCase<R> {
    pub async fn execute(&self, id: Uuid, draft: PlanDraft) -> Result<CatalogPlan, AdminServiceError> {
        let mut plan = self
            .plans
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::NotFound)?;
        plan.apply_draft(draft, Utc::now());
        self.plans.update(&plan).await?;
        Ok(plan)
    }
}

pub struct DeletePlanUseCase<R: PlanCatalogRepository> {
    pub plans: R,
}

impl<R: PlanCatalogRepository> DeletePlanUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        if !self.plans.delete(id).await? {
            return Err(AdminServiceError::NotFound);
        }
        Ok(())
    }
}
