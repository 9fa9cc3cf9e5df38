use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use uuid::Uuid;

use backoffice_admin_schema::{
    admins, hosting_customers, hosting_plans, one_time_codes, orders, processed_webhook_events,
    sessions,
};
use backoffice_domain::admin::AdminRole;
use backoffice_domain::hosting::{BillingCycle, HostingPlan, HostingStatus};
use backoffice_domain::order::{FulfillmentStatus, OrderService};

use crate::domain::repository::{
    AdminRepository, HostingCustomerRepository, OneTimeCodeRepository, OrderRepository,
    PlanCatalogRepository, SessionRepository, WebhookEventRepository,
};
use crate::domain::types::{
    Admin, BillingUpdate, CatalogPlan, HostingCustomer, OneTimeCode, Order, Session,
};
use crate::error::AdminServiceError;

// ── Admin repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAdminRepository {
    pub db: DatabaseConnection,
}

impl AdminRepository for DbAdminRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AdminServiceError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find admin by email")?;
        model.map(admin_from_model).transpose()
    }

    async fn create(&self, admin: &Admin) -> Result<(), AdminServiceError> {
        let model = admins::ActiveModel {
            id: Set(admin.id),
            email: Set(admin.email.clone()),
            display_name: Set(admin.display_name.clone()),
            role: Set(admin.role.as_str().to_owned()),
            created_at: Set(admin.created_at),
        };
        // Concurrent first logins race on the unique email; the loser is a no-op.
        admins::Entity::insert(model)
            .on_conflict(
                OnConflict::column(admins::Column::Email)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create admin")?;
        Ok(())
    }
}

fn admin_from_model(model: admins::Model) -> Result<Admin, AdminServiceError> {
    let role = model
        .role
        .parse::<AdminRole>()
        .with_context(|| format!("admin {} has unknown role", model.id))?;
    Ok(Admin {
        id: model.id,
        email: model.email,
        display_name: model.display_name,
        role,
        created_at: model.created_at,
    })
}

// ── One-time code repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOneTimeCodeRepository {
    pub db: DatabaseConnection,
}

impl OneTimeCodeRepository for DbOneTimeCodeRepository {
    async fn replace_for_email(&self, code: &OneTimeCode) -> Result<(), AdminServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                Box::pin(async move {
                    one_time_codes::Entity::delete_many()
                        .filter(one_time_codes::Column::Email.eq(code.email.as_str()))
                        .exec(txn)
                        .await?;
                    one_time_codes::ActiveModel {
                        id: Set(code.id),
                        email: Set(code.email),
                        code_hash: Set(code.code_hash),
                        created_at: Set(code.created_at),
                        expires_at: Set(code.expires_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace one-time code")?;
        Ok(())
    }

    async fn find_valid_by_hash(
        &self,
        code_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, AdminServiceError> {
        let model = one_time_codes::Entity::find()
            .filter(one_time_codes::Column::CodeHash.eq(code_hash))
            .filter(one_time_codes::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find one-time code")?;
        Ok(model.map(code_from_model))
    }

    async fn delete_by_hash(&self, code_hash: &str) -> Result<u64, AdminServiceError> {
        let result = one_time_codes::Entity::delete_many()
            .filter(one_time_codes::Column::CodeHash.eq(code_hash))
            .exec(&self.db)
            .await
            .context("delete one-time code")?;
        Ok(result.rows_affected)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AdminServiceError> {
        let result = one_time_codes::Entity::delete_many()
            .filter(one_time_codes::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("purge expired one-time codes")?;
        Ok(result.rows_affected)
    }
}

fn code_from_model(model: one_time_codes::Model) -> OneTimeCode {
    OneTimeCode {
        id: model.id,
        email: model.email,
        code_hash: model.code_hash,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}

// ── Session repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AdminServiceError> {
        sessions::ActiveModel {
            id: Set(session.id),
            email: Set(session.email.clone()),
            token_hash: Set(session.token_hash.clone()),
            remember_me: Set(session.remember_me),
            created_at: Set(session.created_at),
            expires_at: Set(session.expires_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn find_valid_by_hash(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Session>, AdminServiceError> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::TokenHash.eq(token_hash))
            .filter(sessions::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find session")?;
        Ok(model.map(session_from_model))
    }

    async fn delete_by_hash(&self, token_hash: &str) -> Result<bool, AdminServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::TokenHash.eq(token_hash))
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AdminServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("purge expired sessions")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        email: model.email,
        token_hash: model.token_hash,
        remember_me: model.remember_me,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}

// ── Hosting customer repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbHostingCustomerRepository {
    pub db: DatabaseConnection,
}

impl HostingCustomerRepository for DbHostingCustomerRepository {
    async fn list(&self) -> Result<Vec<HostingCustomer>, AdminServiceError> {
        let models = hosting_customers::Entity::find()
            .order_by_asc(hosting_customers::Column::RenewalDate)
            .order_by_asc(hosting_customers::Column::CustomerName)
            .all(&self.db)
            .await
            .context("list hosting customers")?;
        models.into_iter().map(customer_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<HostingCustomer>, AdminServiceError> {
        let model = hosting_customers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find hosting customer by id")?;
        model.map(customer_from_model).transpose()
    }

    async fn find_by_external_customer(
        &self,
        customer_ref: &str,
    ) -> Result<Option<HostingCustomer>, AdminServiceError> {
        let model = hosting_customers::Entity::find()
            .filter(hosting_customers::Column::ExternalCustomerRef.eq(customer_ref))
            .order_by_desc(hosting_customers::Column::UpdatedAt)
            .one(&self.db)
            .await
            .context("find hosting customer by provider customer")?;
        model.map(customer_from_model).transpose()
    }

    async fn create(&self, customer: &HostingCustomer) -> Result<(), AdminServiceError> {
        customer_to_active_model(customer)
            .insert(&self.db)
            .await
            .context("create hosting customer")?;
        Ok(())
    }

    async fn update(&self, customer: &HostingCustomer) -> Result<(), AdminServiceError> {
        let mut model = customer_to_active_model(customer);
        model.created_at = NotSet;
        model
            .update(&self.db)
            .await
            .context("update hosting customer")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = hosting_customers::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete hosting customer")?;
        Ok(result.rows_affected > 0)
    }

    async fn apply_billing_update(
        &self,
        id: Uuid,
        update: &BillingUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), AdminServiceError> {
        let mut model = hosting_customers::ActiveModel {
            status: Set(update.status.as_str().to_owned()),
            updated_at: Set(now),
            ..Default::default()
        };
        if let Some(customer_ref) = &update.external_customer_ref {
            model.external_customer_ref = Set(Some(customer_ref.clone()));
        }
        if let Some(subscription_ref) = &update.external_subscription_ref {
            model.external_subscription_ref = Set(Some(subscription_ref.clone()));
        }
        if let Some(renewal_date) = update.renewal_date {
            model.renewal_date = Set(Some(renewal_date));
        }
        hosting_customers::Entity::update_many()
            .set(model)
            .filter(hosting_customers::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("apply billing update")?;
        Ok(())
    }
}

fn customer_to_active_model(customer: &HostingCustomer) -> hosting_customers::ActiveModel {
    hosting_customers::ActiveModel {
        id: Set(customer.id),
        customer_name: Set(customer.customer_name.clone()),
        customer_email: Set(customer.customer_email.clone()),
        domain: Set(customer.domain.clone()),
        plan: Set(customer.plan.as_str().to_owned()),
        billing_cycle: Set(customer.billing_cycle.as_str().to_owned()),
        amount_cents: Set(customer.amount_cents),
        status: Set(customer.status.as_str().to_owned()),
        start_date: Set(customer.start_date),
        renewal_date: Set(customer.renewal_date),
        external_customer_ref: Set(customer.external_customer_ref.clone()),
        external_subscription_ref: Set(customer.external_subscription_ref.clone()),
        notes: Set(customer.notes.clone()),
        created_at: Set(customer.created_at),
        updated_at: Set(customer.updated_at),
    }
}

fn customer_from_model(
    model: hosting_customers::Model,
) -> Result<HostingCustomer, AdminServiceError> {
    let id = model.id;
    Ok(HostingCustomer {
        id,
        plan: model
            .plan
            .parse::<HostingPlan>()
            .with_context(|| format!("hosting customer {id}"))?,
        billing_cycle: model
            .billing_cycle
            .parse::<BillingCycle>()
            .with_context(|| format!("hosting customer {id}"))?,
        status: model
            .status
            .parse::<HostingStatus>()
            .with_context(|| format!("hosting customer {id}"))?,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        domain: model.domain,
        amount_cents: model.amount_cents,
        start_date: model.start_date,
        renewal_date: model.renewal_date,
        external_customer_ref: model.external_customer_ref,
        external_subscription_ref: model.external_subscription_ref,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Plan catalogue repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPlanCatalogRepository {
    pub db: DatabaseConnection,
}

impl PlanCatalogRepository for DbPlanCatalogRepository {
    async fn list(&self) -> Result<Vec<CatalogPlan>, AdminServiceError> {
        let models = hosting_plans::Entity::find()
            .order_by_asc(hosting_plans::Column::MonthlyPriceCents)
            .order_by_asc(hosting_plans::Column::Name)
            .all(&self.db)
            .await
            .context("list hosting plans")?;
        models.into_iter().map(plan_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CatalogPlan>, AdminServiceError> {
        let model = hosting_plans::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find hosting plan by id")?;
        model.map(plan_from_model).transpose()
    }

    async fn create(&self, plan: &CatalogPlan) -> Result<(), AdminServiceError> {
        plan_to_active_model(plan)
            .insert(&self.db)
            .await
            .context("create hosting plan")?;
        Ok(())
    }

    async fn update(&self, plan: &CatalogPlan) -> Result<(), AdminServiceError> {
        let mut model = plan_to_active_model(plan);
        model.created_at = NotSet;
        model
            .update(&self.db)
            .await
            .context("update hosting plan")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = hosting_plans::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete hosting plan")?;
        Ok(result.rows_affected > 0)
    }
}

fn plan_to_active_model(plan: &CatalogPlan) -> hosting_plans::ActiveModel {
    hosting_plans::ActiveModel {
        id: Set(plan.id),
        name: Set(plan.name.clone()),
        description: Set(plan.description.clone()),
        monthly_price_cents: Set(plan.monthly_price_cents),
        yearly_price_cents: Set(plan.yearly_price_cents),
        features: Set(serde_json::Value::from(plan.features.clone())),
        stripe_product_id: Set(plan.stripe_product_id.clone()),
        stripe_price_id_monthly: Set(plan.stripe_price_id_monthly.clone()),
        stripe_price_id_yearly: Set(plan.stripe_price_id_yearly.clone()),
        created_at: Set(plan.created_at),
        updated_at: Set(plan.updated_at),
    }
}

fn plan_from_model(model: hosting_plans::Model) -> Result<CatalogPlan, AdminServiceError> {
    let features = serde_json::from_value::<Vec<String>>(model.features)
        .with_context(|| format!("hosting plan {} has malformed features", model.id))?;
    Ok(CatalogPlan {
        id: model.id,
        name: model.name,
        description: model.description,
        monthly_price_cents: model.monthly_price_cents,
        yearly_price_cents: model.yearly_price_cents,
        features,
        stripe_product_id: model.stripe_product_id,
        stripe_price_id_monthly: model.stripe_price_id_monthly,
        stripe_price_id_yearly: model.stripe_price_id_yearly,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, AdminServiceError> {
        let models = orders::Entity::find()
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list orders")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AdminServiceError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        model.map(order_from_model).transpose()
    }

    async fn create(&self, order: &Order) -> Result<(), AdminServiceError> {
        order_to_active_model(order)
            .insert(&self.db)
            .await
            .context("create order")?;
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<(), AdminServiceError> {
        let mut model = order_to_active_model(order);
        model.created_at = NotSet;
        model.update(&self.db).await.context("update order")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = orders::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete order")?;
        Ok(result.rows_affected > 0)
    }
}

fn order_to_active_model(order: &Order) -> orders::ActiveModel {
    orders::ActiveModel {
        id: Set(order.id),
        customer_name: Set(order.customer_name.clone()),
        customer_email: Set(order.customer_email.clone()),
        service: Set(order.service.as_str().to_owned()),
        description: Set(order.description.clone()),
        amount_cents: Set(order.amount_cents),
        fulfillment_status: Set(order.fulfillment_status.as_str().to_owned()),
        due_date: Set(order.due_date),
        notes: Set(order.notes.clone()),
        created_at: Set(order.created_at),
        updated_at: Set(order.updated_at),
    }
}

fn order_from_model(model: orders::Model) -> Result<Order, AdminServiceError> {
    let id = model.id;
    Ok(Order {
        id,
        service: model
            .service
            .parse::<OrderService>()
            .with_context(|| format!("order {id}"))?,
        fulfillment_status: model
            .fulfillment_status
            .parse::<FulfillmentStatus>()
            .with_context(|| format!("order {id}"))?,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        description: model.description,
        amount_cents: model.amount_cents,
        due_date: model.due_date,
        notes: model.notes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Webhook event ledger ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbWebhookEventRepository {
    pub db: DatabaseConnection,
}

impl WebhookEventRepository for DbWebhookEventRepository {
    async fn is_processed(&self, event_id: &str) -> Result<bool, AdminServiceError> {
        let count = processed_webhook_events::Entity::find_by_id(event_id.to_owned())
            .count(&self.db)
            .await
            .context("check processed webhook event")?;
        Ok(count > 0)
    }

    async fn mark_processed(
        &self,
        event_id: &str,
        event_type: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AdminServiceError> {
        let model = processed_webhook_events::ActiveModel {
            event_id: Set(event_id.to_owned()),
            event_type: Set(event_type.to_owned()),
            processed_at: Set(now),
        };
        processed_webhook_events::Entity::insert(model)
            .on_conflict(
                OnConflict::column(processed_webhook_events::Column::EventId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("mark webhook event processed")?;
        Ok(())
    }
}
