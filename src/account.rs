//! Account facade: the single entry point for callers.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::api::models::{Subscription, UsageRow};
use crate::api::{ArmClient, AzureApiError, BillingApi};
use crate::config::AzureConfig;
use crate::credentials::CredentialProvider;
use crate::estimate::{
    DateRange, EstimationResult, Estimator, Grouping, ModelCoefficients, RecommendationResult,
};
use crate::scheduler::{self, ExecutionPlan, FetchTask};

/// Errors surfaced by [`AzureAccount`] operations.
///
/// Per-subscription query failures never appear here; they are absorbed at
/// the task boundary and logged.
#[derive(Error, Debug)]
pub enum AccountError {
    /// Credential acquisition or client construction failed.
    #[error("failed to initialize Azure account: {reason}")]
    Init { reason: String },

    /// Subscription enumeration failed outright.
    #[error("failed to list subscriptions: {0}")]
    Listing(#[from] AzureApiError),
}

/// Facade over the Azure billing and advisory APIs.
///
/// Holds the credential-bound client and the external estimator; both are
/// shared read-only across all concurrently issued fetch tasks.
pub struct AzureAccount {
    api: Arc<dyn BillingApi>,
    estimator: Arc<dyn Estimator>,
    config: AzureConfig,
}

impl std::fmt::Debug for AzureAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureAccount")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AzureAccount {
    /// Construct the credential and the ARM client, exactly once.
    ///
    /// Must complete before any other operation is used.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Init`] carrying the underlying reason if the
    /// credential cannot be constructed or the client cannot be built.
    pub async fn initialize(
        config: AzureConfig,
        provider: &dyn CredentialProvider,
        estimator: Arc<dyn Estimator>,
    ) -> Result<Self, AccountError> {
        let credential = provider
            .credential(&config.credential)
            .await
            .map_err(|e| AccountError::Init {
                reason: e.to_string(),
            })?;

        let api = ArmClient::new(credential).map_err(|e| AccountError::Init {
            reason: e.to_string(),
        })?;

        Ok(Self::with_api(Arc::new(api), estimator, config))
    }

    /// Build an account over an already-constructed billing API.
    ///
    /// Used for pre-built clients (custom endpoints) and for fakes in tests.
    #[must_use]
    pub fn with_api(
        api: Arc<dyn BillingApi>,
        estimator: Arc<dyn Estimator>,
        config: AzureConfig,
    ) -> Self {
        Self {
            api,
            estimator,
            config,
        }
    }

    /// Enumerate the subscriptions visible to the credential.
    ///
    /// An empty listing is not an error; it logs a warning advising a
    /// permissions check. Subscriptions are fetched fresh on every call.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::Listing`] if the upstream listing fails.
    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>, AccountError> {
        let subscriptions = self.api.list_subscriptions().await?;

        if subscriptions.is_empty() {
            warn!(
                "no subscriptions visible to this credential; \
                 check that it has Reader access on the billing scopes"
            );
        }

        Ok(subscriptions)
    }

    /// Fetch Advisor recommendations across all subscriptions and map them
    /// through the estimator.
    ///
    /// One query per subscription, all in flight at once. A failing
    /// subscription contributes nothing and is logged; output follows
    /// subscription-list order.
    ///
    /// # Errors
    ///
    /// Returns an error only if subscription listing fails.
    pub async fn recommendations(&self) -> Result<Vec<RecommendationResult>, AccountError> {
        let subscriptions = self.list_subscriptions().await?;

        let tasks: Vec<FetchTask<RecommendationResult>> = subscriptions
            .into_iter()
            .map(|subscription| {
                let api = Arc::clone(&self.api);
                let estimator = Arc::clone(&self.estimator);
                let coefficients = self.config.coefficients.clone();
                let id = subscription.subscription_id;
                scheduler::isolate(id.clone(), async move {
                    let rows = api.recommendations(&id).await?;
                    Ok::<_, AzureApiError>(
                        estimator.estimate_recommendations(&rows, &coefficients),
                    )
                })
            })
            .collect();

        info!(subscriptions = tasks.len(), "dispatching advisor queries");

        let batches = scheduler::run(tasks, ExecutionPlan::Concurrent).await;
        Ok(batches.into_iter().flatten().collect())
    }

    /// Fetch consumption usage across all subscriptions over `range` and
    /// map it through the estimator.
    ///
    /// Execution strategy comes from configuration: day chunking forces
    /// strictly sequential per-subscription fetches (each split into
    /// per-day sub-requests); otherwise tasks run in batches of the
    /// configured size, or all at once when no size is set. Output follows
    /// subscription-list order regardless of completion order; a failing
    /// subscription contributes nothing and is logged.
    ///
    /// # Errors
    ///
    /// Returns an error only if subscription listing fails.
    pub async fn estimates(
        &self,
        range: DateRange,
        grouping: Grouping,
    ) -> Result<Vec<EstimationResult>, AccountError> {
        let subscriptions = self.list_subscriptions().await?;
        let chunk_by_day = self.config.chunk_by_day;
        let plan =
            ExecutionPlan::for_estimates(chunk_by_day, self.config.subscription_batch_size);

        let tasks: Vec<FetchTask<EstimationResult>> = subscriptions
            .into_iter()
            .map(|subscription| {
                let api = Arc::clone(&self.api);
                let estimator = Arc::clone(&self.estimator);
                let coefficients = self.config.coefficients.clone();
                let id = subscription.subscription_id;
                scheduler::isolate(id.clone(), async move {
                    let rows = if chunk_by_day {
                        usage_rows_by_day(api.as_ref(), &id, &range).await?
                    } else {
                        api.usage_rows(&id, &range).await?
                    };
                    Ok::<_, AzureApiError>(estimator.estimate_usage(&rows, grouping, &coefficients))
                })
            })
            .collect();

        info!(
            subscriptions = tasks.len(),
            batches = plan.batch_count(tasks.len()),
            "dispatching consumption queries"
        );

        let batches = scheduler::run(tasks, plan).await;
        Ok(batches.into_iter().flatten().collect())
    }

    /// Run the estimator directly over caller-supplied usage rows,
    /// bypassing the cloud APIs entirely.
    ///
    /// Pure function of its inputs; performs no I/O. Used for offline
    /// re-estimation from cached consumption data.
    #[must_use]
    pub fn estimates_from_rows(
        rows: &[UsageRow],
        grouping: Grouping,
        coefficients: &ModelCoefficients,
        estimator: &dyn Estimator,
    ) -> Vec<EstimationResult> {
        estimator.estimate_usage(rows, grouping, coefficients)
    }
}

/// Fetch a subscription's usage one calendar day at a time, concatenating
/// rows in day order.
async fn usage_rows_by_day(
    api: &dyn BillingApi,
    subscription_id: &str,
    range: &DateRange,
) -> Result<Vec<UsageRow>, AzureApiError> {
    let mut rows = Vec::new();
    for day in range.days() {
        rows.extend(api.usage_rows(subscription_id, &day).await?);
    }
    Ok(rows)
}
