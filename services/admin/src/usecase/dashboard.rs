use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use backoffice_domain::hosting::HostingStatus;
use backoffice_domain::order::{FulfillmentStatus, OrderService};

use crate::domain::repository::{HostingCustomerRepository, OrderRepository};
use crate::domain::types::{HostingCustomer, Order};
use crate::error::AdminServiceError;

const REVENUE_MONTHS: i32 = 6;
const RECENT_ORDERS: usize = 5;
const UPCOMING_RENEWALS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: i64,
    pub hosting_revenue: i64,
    pub total_orders: usize,
    pub pending_orders: usize,
    pub in_progress_orders: usize,
    pub completed_orders: usize,
    pub active_hosting: usize,
    pub total_hosting: usize,
}

/// Revenue created in one calendar month, in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    /// Short month name, e.g. `Mar`.
    pub month: String,
    pub year: i32,
    pub orders: i64,
    pub hosting: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub service_breakdown: BTreeMap<OrderService, usize>,
    pub recent_orders: Vec<Order>,
    pub upcoming_renewals: Vec<HostingCustomer>,
}

/// First day of the month `back` months before `today`'s month.
fn month_start(today: NaiveDate, back: i32) -> Option<NaiveDate> {
    let index = today.year() * 12 + today.month0() as i32 - back;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

fn same_month(date: NaiveDate, month: NaiveDate) -> bool {
    date.year() == month.year() && date.month() == month.month()
}

/// Aggregate orders and hosting customers as of `today`.
pub fn summarize(
    orders: &[Order],
    customers: &[HostingCustomer],
    today: NaiveDate,
) -> DashboardSummary {
    let count_status =
        |status: FulfillmentStatus| orders.iter().filter(|o| o.fulfillment_status == status).count();
    let stats = DashboardStats {
        total_revenue: orders.iter().map(|o| o.amount_cents).sum(),
        hosting_revenue: customers.iter().map(|c| c.amount_cents).sum(),
        total_orders: orders.len(),
        pending_orders: count_status(FulfillmentStatus::Pending),
        in_progress_orders: count_status(FulfillmentStatus::InProgress),
        completed_orders: count_status(FulfillmentStatus::Completed),
        active_hosting: customers
            .iter()
            .filter(|c| c.status == HostingStatus::Active)
            .count(),
        total_hosting: customers.len(),
    };

    let monthly_revenue = (0..REVENUE_MONTHS)
        .rev()
        .filter_map(|back| month_start(today, back))
        .map(|month| MonthlyRevenue {
            month: month.format("%b").to_string(),
            year: month.year(),
            orders: orders
                .iter()
                .filter(|o| same_month(o.created_at.date_naive(), month))
                .map(|o| o.amount_cents)
                .sum(),
            hosting: customers
                .iter()
                .filter(|c| same_month(c.created_at.date_naive(), month))
                .map(|c| c.amount_cents)
                .sum(),
        })
        .collect();

    let mut service_breakdown = BTreeMap::new();
    for order in orders {
        *service_breakdown.entry(order.service).or_insert(0) += 1;
    }

    let mut recent_orders = orders.to_vec();
    recent_orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent_orders.truncate(RECENT_ORDERS);

    let mut upcoming_renewals: Vec<HostingCustomer> = customers
        .iter()
        .filter(|c| c.status == HostingStatus::Active && c.renewal_date.is_some())
        .cloned()
        .collect();
    upcoming_renewals.sort_by_key(|c| c.renewal_date);
    upcoming_renewals.truncate(UPCOMING_RENEWALS);

    DashboardSummary {
        stats,
        monthly_revenue,
        service_breakdown,
        recent_orders,
        upcoming_renewals,
    }
}

pub struct DashboardUseCase<O, C>
where
    O: OrderRepository,
    C: HostingCustomerRepository,
{
    pub orders: O,
    pub customers: C,
}

impl<O, C> DashboardUseCase<O, C>
where
    O: OrderRepository,
    C: HostingCustomerRepository,
{
    pub async fn execute(&self) -> Result<DashboardSummary, AdminServiceError> {
        let orders = self.orders.list().await?;
        let customers = self.customers.list().await?;
        Ok(summarize(&orders, &customers, Utc::now().date_naive()))
    }
}
