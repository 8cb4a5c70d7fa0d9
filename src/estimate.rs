//! Seam to the external estimation engine.
//!
//! The usage-to-emissions models (compute, storage, networking, memory,
//! embodied emissions) live in a separate library. This module defines the
//! trait this crate calls into, the pass-through inputs it forwards, and the
//! result records it collects and flattens without inspecting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::models::{Recommendation, UsageRow};

// ============================================================================
// Inputs passed through to the estimator
// ============================================================================

/// An inclusive calendar date range.
///
/// Inclusive/exclusive semantics of estimation windows belong to the
/// estimator; this layer forwards the caller's range as given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range covering `start..=end`.
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Split the range into single-day sub-ranges, one per calendar day.
    pub fn days(&self) -> impl Iterator<Item = DateRange> {
        let end = self.end;
        self.start
            .iter_days()
            .take_while(move |day| *day <= end)
            .map(|day| DateRange::new(day, day))
    }
}

/// How the estimator should aggregate returned estimates.
///
/// Opaque to this crate; forwarded verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// One estimate per day.
    #[default]
    Day,
    /// One estimate per ISO week.
    Week,
    /// One estimate per month.
    Month,
    /// One estimate per quarter.
    Quarter,
    /// One estimate per year.
    Year,
}

impl std::fmt::Display for Grouping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
            Self::Month => write!(f, "month"),
            Self::Quarter => write!(f, "quarter"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// Coefficient constants for the estimator's models.
///
/// Fixed configuration values, forwarded unchanged. Defaults carry the
/// published Azure constants; this crate never computes with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelCoefficients {
    /// Minimum server wattage at idle.
    pub min_watts: f64,
    /// Maximum server wattage at full load.
    pub max_watts: f64,
    /// Assumed average CPU utilization percentage when no metric exists.
    pub avg_cpu_utilization: f64,
    /// Data-center power usage effectiveness.
    pub power_usage_effectiveness: f64,
    /// HDD storage energy, watt-hours per terabyte-hour.
    pub hdd_coefficient: f64,
    /// SSD storage energy, watt-hours per terabyte-hour.
    pub ssd_coefficient: f64,
    /// Networking energy, kilowatt-hours per gigabyte.
    pub networking_coefficient: f64,
    /// Memory energy, kilowatt-hours per gigabyte-hour.
    pub memory_coefficient: f64,
    /// Fallback energy per billed dollar for unclassifiable usage rows.
    pub unknown_usage_coefficient: f64,
    /// Embodied emissions of an average server, kilograms of CO2e.
    pub server_embodied_emissions_kg_co2e: f64,
    /// Expected server lifespan in hours, for amortizing embodied emissions.
    pub server_expected_lifespan_hours: f64,
}

impl Default for ModelCoefficients {
    fn default() -> Self {
        Self {
            min_watts: 0.78,
            max_watts: 3.76,
            avg_cpu_utilization: 50.0,
            power_usage_effectiveness: 1.185,
            hdd_coefficient: 0.65,
            ssd_coefficient: 1.2,
            networking_coefficient: 0.001,
            memory_coefficient: 0.000_392,
            unknown_usage_coefficient: 0.0,
            server_embodied_emissions_kg_co2e: 1205.52,
            server_expected_lifespan_hours: 35_040.0,
        }
    }
}

// ============================================================================
// Estimator outputs
// ============================================================================

/// A usage row translated into an energy/carbon estimate.
///
/// Produced by the estimator; this crate only collects and flattens these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationResult {
    /// Date the estimate is aggregated to.
    pub timestamp: NaiveDate,
    /// Owning subscription GUID.
    pub subscription_id: String,
    /// Owning subscription display name.
    pub subscription_name: String,
    /// Service the usage belongs to.
    pub service_name: String,
    /// Region the usage occurred in.
    pub region: String,
    /// Estimated energy use.
    pub kilowatt_hours: f64,
    /// Estimated emissions in metric tons of CO2e.
    pub co2e_metric_tons: f64,
    /// Billed cost in USD.
    pub cost_usd: f64,
}

/// An Advisor recommendation translated into an estimated impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    /// Owning subscription GUID.
    pub subscription_id: String,
    /// Owning subscription display name.
    pub subscription_name: String,
    /// Region of the impacted resource.
    pub region: String,
    /// Recommendation category (e.g., rightsizing, shutdown).
    pub recommendation_type: String,
    /// Human-readable detail.
    pub recommendation_detail: String,
    /// Estimated energy savings if applied.
    pub kilowatt_hour_savings: f64,
    /// Estimated emissions savings in metric tons of CO2e.
    pub co2e_savings_metric_tons: f64,
    /// Estimated cost savings in USD.
    pub cost_savings_usd: f64,
}

/// The external estimation engine.
///
/// Pure functions over raw rows and coefficients. No I/O.
pub trait Estimator: Send + Sync {
    /// Map consumption usage rows to estimation results.
    fn estimate_usage(
        &self,
        rows: &[UsageRow],
        grouping: Grouping,
        coefficients: &ModelCoefficients,
    ) -> Vec<EstimationResult>;

    /// Map Advisor recommendation rows to recommendation results.
    fn estimate_recommendations(
        &self,
        rows: &[Recommendation],
        coefficients: &ModelCoefficients,
    ) -> Vec<RecommendationResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_yields_one_range_per_day_inclusive() {
        let range = DateRange::new(date(2024, 1, 30), date(2024, 2, 2));
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], DateRange::new(date(2024, 1, 30), date(2024, 1, 30)));
        assert_eq!(days[3], DateRange::new(date(2024, 2, 2), date(2024, 2, 2)));
    }

    #[test]
    fn single_day_range_is_one_chunk() {
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 1));
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn grouping_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Grouping::Quarter).unwrap(), "\"quarter\"");
        assert_eq!(Grouping::Week.to_string(), "week");
    }
}
