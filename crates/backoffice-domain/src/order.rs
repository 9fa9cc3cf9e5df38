//! Client order types.

use serde::{Deserialize, Serialize};

/// Kind of work an order is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderService {
    WebDesign,
    GraphicDesign,
    Seo,
    Branding,
    SocialMedia,
    Other,
}

string_enum!(OrderService, "order service", {
    WebDesign => "web-design",
    GraphicDesign => "graphic-design",
    Seo => "seo",
    Branding => "branding",
    SocialMedia => "social-media",
    Other => "other",
});

/// Where an order stands. Set by administrators only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FulfillmentStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

string_enum!(FulfillmentStatus, "fulfillment status", {
    Pending => "pending",
    InProgress => "in-progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

impl FulfillmentStatus {
    /// Human-readable label, e.g. `In progress`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}
