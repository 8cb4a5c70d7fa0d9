#![allow(clippy::doc_markdown)] // Allow brand names like Azure, Advisor without backticks

//! Azure billing and advisor orchestration for cloud carbon estimation.
//!
//! This crate is the integration layer between the Azure APIs and an
//! external estimation engine: it authenticates, enumerates subscriptions,
//! fans out consumption and Advisor queries with bounded concurrency,
//! tolerates per-subscription failures, and flattens the estimator's
//! results. It computes no emissions itself.
//!
//! - **Subscription listing** — paginated ARM enumeration; an empty result
//!   is a warning, not an error.
//! - **Consumption estimates** — per-subscription usage queries over a date
//!   range, run sequentially (day chunking), in bounded batches, or fully
//!   concurrent, per configuration.
//! - **Advisor recommendations** — per-subscription queries, unbounded
//!   fan-out.
//! - **Failure isolation** — a failing subscription is logged and
//!   contributes an empty result; it never aborts the overall call.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use carbon_azure::{AzureAccount, DateRange, Grouping};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?; // host-owned config loading
//!     let account =
//!         AzureAccount::initialize(config, &credential_provider, estimator).await?;
//!
//!     let estimates = account
//!         .estimates(
//!             DateRange::new("2024-01-01".parse()?, "2024-01-31".parse()?),
//!             Grouping::Day,
//!         )
//!         .await?;
//!
//!     for estimate in estimates {
//!         println!(
//!             "{} {}: {:.3} kWh, {:.6} t CO2e",
//!             estimate.timestamp, estimate.service_name,
//!             estimate.kilowatt_hours, estimate.co2e_metric_tons
//!         );
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod api;
pub mod config;
pub mod credentials;
pub mod estimate;
pub mod scheduler;

pub use account::{AccountError, AzureAccount};
pub use api::{ArmClient, AzureApiError, BillingApi};
pub use config::{AzureConfig, CredentialConfig};
pub use credentials::{
    CredentialError, CredentialProvider, StaticTokenCredential, TokenCredential,
};
pub use estimate::{
    DateRange, EstimationResult, Estimator, Grouping, ModelCoefficients, RecommendationResult,
};
pub use scheduler::ExecutionPlan;
