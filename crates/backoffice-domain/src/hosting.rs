//! Hosting customer domain types.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a hosting customer.
///
/// Payment-driven transitions: `active ⇄ suspended`, `active | suspended →
/// cancelled`, and any status → `active` on a completed checkout.
/// `expired` is only ever set by an administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostingStatus {
    #[default]
    Active,
    Suspended,
    Expired,
    Cancelled,
}

string_enum!(HostingStatus, "hosting status", {
    Active => "active",
    Suspended => "suspended",
    Expired => "expired",
    Cancelled => "cancelled",
});

impl HostingStatus {
    /// No further payment-driven transition is expected from this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Hosting plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostingPlan {
    Starter,
    Business,
    Premium,
    Enterprise,
}

string_enum!(HostingPlan, "hosting plan", {
    Starter => "starter",
    Business => "business",
    Premium => "premium",
    Enterprise => "enterprise",
});

/// How often a hosting plan is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    #[default]
    Yearly,
}

string_enum!(BillingCycle, "billing cycle", {
    Monthly => "monthly",
    Yearly => "yearly",
});
