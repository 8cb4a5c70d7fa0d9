//! Azure Resource Manager client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use super::models::{ApiErrorBody, Paged, Recommendation, Subscription, UsageRow};
use super::traits::{AzureApiError, BillingApi};
use crate::credentials::TokenCredential;
use crate::estimate::DateRange;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Azure Resource Manager endpoint for the public cloud.
const ARM_BASE_URL: &str = "https://management.azure.com";

/// API version for subscription listing.
const SUBSCRIPTIONS_API_VERSION: &str = "2022-12-01";

/// API version for Consumption usage details.
const CONSUMPTION_API_VERSION: &str = "2021-10-01";

/// API version for Advisor recommendations.
const ADVISOR_API_VERSION: &str = "2020-01-01";

/// Client for the ARM billing and advisory surface.
///
/// Shared read-only across concurrently issued fetch tasks; holds no
/// mutable state. Adds no retry or deadline beyond the underlying HTTP
/// client's request timeout.
#[derive(Clone)]
pub struct ArmClient {
    /// HTTP client.
    client: Client,
    /// Token source, queried per request.
    credential: Arc<dyn TokenCredential>,
    /// ARM endpoint; overridable for tests and sovereign clouds.
    base_url: String,
}

impl ArmClient {
    /// Create a client against the public ARM endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(credential: Arc<dyn TokenCredential>) -> Result<Self, AzureApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(AzureApiError::Http)?;

        Ok(Self {
            client,
            credential,
            base_url: ARM_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different ARM endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Make an authenticated GET request.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, AzureApiError> {
        debug!(url = %url, "GET request");

        let token = self.credential.bearer_token().await?;
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Follow an ARM listing to exhaustion, concatenating pages in order.
    async fn get_all_pages<T: serde::de::DeserializeOwned>(
        &self,
        first_url: String,
    ) -> Result<Vec<T>, AzureApiError> {
        let mut rows = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let page: Paged<T> = self.get_json(&url).await?;
            rows.extend(page.value);
            next = match page.next_link {
                Some(link) => {
                    Url::parse(&link).map_err(|e| {
                        AzureApiError::Config(format!("malformed continuation link: {e}"))
                    })?;
                    Some(link)
                }
                None => None,
            };
        }

        Ok(rows)
    }

    /// Map an ARM response to a parsed body or a typed error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AzureApiError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, "failed to parse API response");
                AzureApiError::Serialization(e)
            })
        } else {
            // Prefer the message from the ARM error body when it parses.
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map_or(text, |body| body.error.message);

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                Err(AzureApiError::Auth(message))
            } else if status == StatusCode::NOT_FOUND {
                Err(AzureApiError::NotFound(message))
            } else {
                Err(AzureApiError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    /// Server-side date filter for the usage details listing.
    fn usage_filter(range: &DateRange) -> String {
        format!(
            "properties/usageStart ge '{}' and properties/usageEnd le '{}'",
            range.start, range.end
        )
    }

    /// Build a listing URL under the configured endpoint.
    fn listing_url(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<String, AzureApiError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| AzureApiError::Config(format!("invalid ARM endpoint: {e}")))?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url.into())
    }
}

#[async_trait]
impl BillingApi for ArmClient {
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, AzureApiError> {
        let url = self.listing_url(
            "/subscriptions",
            &[("api-version", SUBSCRIPTIONS_API_VERSION)],
        )?;
        self.get_all_pages(url).await
    }

    async fn usage_rows(
        &self,
        subscription_id: &str,
        range: &DateRange,
    ) -> Result<Vec<UsageRow>, AzureApiError> {
        let path = format!(
            "/subscriptions/{subscription_id}/providers/Microsoft.Consumption/usageDetails"
        );
        let filter = Self::usage_filter(range);
        let url = self.listing_url(
            &path,
            &[
                ("api-version", CONSUMPTION_API_VERSION),
                ("$filter", filter.as_str()),
            ],
        )?;
        self.get_all_pages(url).await
    }

    async fn recommendations(
        &self,
        subscription_id: &str,
    ) -> Result<Vec<Recommendation>, AzureApiError> {
        let path =
            format!("/subscriptions/{subscription_id}/providers/Microsoft.Advisor/recommendations");
        let url = self
            .listing_url(&path, &[("api-version", ADVISOR_API_VERSION)])?;
        self.get_all_pages(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn usage_filter_covers_both_endpoints() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert_eq!(
            ArmClient::usage_filter(&range),
            "properties/usageStart ge '2024-01-01' and properties/usageEnd le '2024-01-31'"
        );
    }

    #[test]
    fn listing_url_percent_encodes_query() {
        let client = ArmClient::new(Arc::new(
            crate::credentials::StaticTokenCredential::new("t"),
        ))
        .unwrap();

        let url = client
            .listing_url("/subscriptions", &[("$filter", "a ge 'b'")])
            .unwrap();
        assert!(url.starts_with("https://management.azure.com/subscriptions?"));
        assert!(!url.contains(' '));
    }
}
