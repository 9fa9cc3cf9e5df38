use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{HostingCustomerRepository, Mailer};
use crate::domain::types::{HostingCustomer, HostingDraft};
use crate::error::AdminServiceError;
use crate::templates::{RenewalNotice, format_renewal_date, renewal_reminder_email};

pub struct ListHostingCustomersUseCase<C: HostingCustomerRepository> {
    pub customers: C,
}

impl<C: HostingCustomerRepository> ListHostingCustomersUseCase<C> {
    pub async fn execute(&self) -> Result<Vec<HostingCustomer>, AdminServiceError> {
        self.customers.list().await
    }
}

pub struct CreateHostingCustomerUseCase<C: HostingCustomerRepository> {
    pub customers: C,
}

impl<C: HostingCustomerRepository> CreateHostingCustomerUseCase<C> {
    pub async fn execute(&self, draft: HostingDraft) -> Result<HostingCustomer, AdminServiceError> {
        let customer = HostingCustomer::from_draft(draft, Utc::now());
        self.customers.create(&customer).await?;
        tracing::info!(hosting_customer_id = %customer.id, "created hosting customer");
        Ok(customer)
    }
}

/// Manual administrator edit. Billing events never go through here.
pub struct UpdateHostingCustomerUseCase<C: HostingCustomerRepository> {
    pub customers: C,
}

impl<C: HostingCustomerRepository> UpdateHostingCustomerUseCase<C> {
    pub async fn execute(
        &self,
        id: Uuid,
        draft: HostingDraft,
    ) -> Result<HostingCustomer, AdminServiceError> {
        let mut customer = self
            .customers
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::NotFound)?;
        customer.apply_draft(draft, Utc::now());
        self.customers.update(&customer).await?;
        Ok(customer)
    }
}

pub struct DeleteHostingCustomerUseCase<C: HostingCustomerRepository> {
    pub customers: C,
}

impl<C: HostingCustomerRepository> DeleteHostingCustomerUseCase<C> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        if !self.customers.delete(id).await? {
            return Err(AdminServiceError::NotFound);
        }
        Ok(())
    }
}

/// Email a renewal reminder to a hosting customer.
pub struct SendRenewalReminderUseCase<C, M>
where
    C: HostingCustomerRepository,
    M: Mailer,
{
    pub customers: C,
    pub mailer: M,
}

impl<C, M> SendRenewalReminderUseCase<C, M>
where
    C: HostingCustomerRepository,
    M: Mailer,
{
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        let customer = self
            .customers
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::NotFound)?;
        let renewal_date = customer
            .renewal_date
            .ok_or(AdminServiceError::Validation("customer has no renewal date"))?;

        let renewal = format_renewal_date(renewal_date);
        let email = renewal_reminder_email(
            &customer.customer_email,
            &RenewalNotice {
                customer_name: &customer.customer_name,
                domain: &customer.domain,
                plan: customer.plan.as_str(),
                renewal: &renewal,
            },
        );
        self.mailer
            .send(&email)
            .await
            .map_err(AdminServiceError::Delivery)
    }
}
