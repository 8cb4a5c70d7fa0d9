//! Billing API trait and error taxonomy.

use async_trait::async_trait;
use thiserror::Error;

use super::models::{Recommendation, Subscription, UsageRow};
use crate::credentials::CredentialError;
use crate::estimate::DateRange;

/// Errors that can occur while talking to the Azure APIs.
#[derive(Error, Debug)]
pub enum AzureApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Authentication error (rejected or missing token).
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Credential could not produce a token.
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// The upstream billing and advisory surface this crate orchestrates.
///
/// `ArmClient` is the production implementation; tests substitute
/// instrumented fakes.
#[async_trait]
pub trait BillingApi: Send + Sync {
    /// Enumerate every subscription visible to the credential, following
    /// pagination to exhaustion.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails; there is no per-page
    /// partial-failure tolerance.
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, AzureApiError>;

    /// Fetch consumption usage rows for one subscription over a date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or any continuation page fails.
    async fn usage_rows(
        &self,
        subscription_id: &str,
        range: &DateRange,
    ) -> Result<Vec<UsageRow>, AzureApiError>;

    /// Fetch Advisor recommendations for one subscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or any continuation page fails.
    async fn recommendations(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<Recommendation>, AzureApiError>;
}
