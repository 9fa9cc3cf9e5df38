use sea_orm::entity::prelude::*;

/// Hosting customer record.
///
/// `status`, `renewal_date` and the two `external_*_ref` columns are written
/// by the billing webhook; the rest is edited by administrators.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hosting_customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub domain: String,
    pub plan: String,
    pub billing_cycle: String,
    pub amount_cents: i64,
    pub status: String,
    pub start_date: Option<Date>,
    pub renewal_date: Option<Date>,
    /// Stripe customer id (`cus_...`).
    pub external_customer_ref: Option<String>,
    /// Stripe subscription id (`sub_...`).
    pub external_subscription_ref: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
