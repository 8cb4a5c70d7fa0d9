//! Azure Resource Manager request and response models.
//!
//! These mirror the wire shapes owned by the provider. This crate never
//! interprets usage or recommendation rows; they are forwarded verbatim to
//! the estimator.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Pagination
// ============================================================================

/// A single page of an ARM list response.
///
/// ARM listing endpoints return a `value` array plus an optional `nextLink`
/// continuation URL pointing at the next page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next page, if any.
    pub next_link: Option<String>,
}

// ============================================================================
// Subscriptions
// ============================================================================

/// An Azure subscription visible to the authenticated identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Fully qualified resource ID (`/subscriptions/{id}`).
    pub id: String,
    /// Subscription GUID.
    pub subscription_id: String,
    /// Display name.
    pub display_name: String,
    /// Subscription state (e.g., "Enabled").
    #[serde(default)]
    pub state: Option<String>,
}

// ============================================================================
// Consumption usage details
// ============================================================================

/// A consumption usage detail row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRow {
    /// Resource ID of the usage record.
    pub id: String,
    /// Record name.
    pub name: String,
    /// Usage properties.
    pub properties: UsageProperties,
}

/// Properties of a consumption usage detail row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageProperties {
    /// Usage date.
    pub date: DateTime<Utc>,
    /// Consumed quantity in the meter's unit.
    pub quantity: f64,
    /// Cost in the billing currency.
    pub cost: f64,
    /// Unit of measure (e.g., "1 Hour").
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    /// Region the resource ran in.
    #[serde(default)]
    pub resource_location: Option<String>,
    /// Consumed service (e.g., "Microsoft.Compute").
    #[serde(default)]
    pub consumed_service: Option<String>,
    /// Display name of the owning subscription.
    #[serde(default)]
    pub subscription_name: Option<String>,
    /// Resource group name.
    #[serde(default)]
    pub resource_group: Option<String>,
    /// Meter details.
    #[serde(default)]
    pub meter_details: Option<MeterDetails>,
}

/// Meter metadata attached to a usage row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterDetails {
    /// Meter name (e.g., "D2 v3/D2s v3").
    #[serde(default)]
    pub meter_name: Option<String>,
    /// Unit of measure for the meter.
    #[serde(default)]
    pub unit_of_measure: Option<String>,
    /// Service family (e.g., "Compute", "Storage").
    #[serde(default)]
    pub service_family: Option<String>,
}

// ============================================================================
// Advisor recommendations
// ============================================================================

/// An Advisor recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Fully qualified recommendation ID.
    pub id: String,
    /// Recommendation name (GUID).
    pub name: String,
    /// Recommendation properties.
    pub properties: RecommendationProperties,
}

/// Properties of an Advisor recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationProperties {
    /// Category (e.g., "Cost").
    #[serde(default)]
    pub category: Option<String>,
    /// Business impact (e.g., "High").
    #[serde(default)]
    pub impact: Option<String>,
    /// Type of the impacted resource.
    #[serde(default)]
    pub impacted_field: Option<String>,
    /// Name of the impacted resource.
    #[serde(default)]
    pub impacted_value: Option<String>,
    /// Problem/solution summary.
    #[serde(default)]
    pub short_description: Option<ShortDescription>,
    /// Provider-specific detail bag (e.g., rightsizing targets).
    #[serde(default)]
    pub extended_properties: HashMap<String, String>,
}

/// Short problem/solution description of a recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortDescription {
    /// What is wrong.
    #[serde(default)]
    pub problem: Option<String>,
    /// What to do about it.
    #[serde(default)]
    pub solution: Option<String>,
}

// ============================================================================
// Error body
// ============================================================================

/// ARM error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error detail.
    pub error: ApiErrorDetail,
}

/// ARM error detail.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
