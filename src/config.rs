//! Configuration surface.
//!
//! Raw configuration parsing and validation belong to the host application;
//! this crate only reads and applies the values.

use std::path::PathBuf;

use serde::Deserialize;

use crate::estimate::ModelCoefficients;

/// Configuration consumed by [`crate::AzureAccount`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureConfig {
    /// Which credential variant to construct.
    pub credential: CredentialConfig,

    /// When true, each subscription's consumption query is split into
    /// per-day sub-requests and subscriptions are fetched strictly one at a
    /// time, to avoid overwhelming the Consumption API.
    #[serde(default)]
    pub chunk_by_day: bool,

    /// Consumption fan-out width when day chunking is off. Tasks run in
    /// consecutive batches of this size; unset means one all-concurrent
    /// batch.
    #[serde(default)]
    pub subscription_batch_size: Option<usize>,

    /// Coefficient constants forwarded verbatim to the estimator.
    #[serde(default)]
    pub coefficients: ModelCoefficients,
}

/// Credential variants, treated uniformly downstream as an opaque bearer.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CredentialConfig {
    /// Service principal with a client secret.
    ClientSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
    /// Workload identity federation (projected token file).
    WorkloadIdentity {
        tenant_id: String,
        client_id: String,
        token_file: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_apply() {
        let config: AzureConfig = serde_json::from_value(serde_json::json!({
            "credential": {
                "kind": "clientSecret",
                "tenantId": "t1",
                "clientId": "c1",
                "clientSecret": "s1"
            }
        }))
        .unwrap();

        assert!(!config.chunk_by_day);
        assert!(config.subscription_batch_size.is_none());
    }

    #[test]
    fn workload_identity_variant_parses() {
        let config: AzureConfig = serde_json::from_value(serde_json::json!({
            "credential": {
                "kind": "workloadIdentity",
                "tenantId": "t1",
                "clientId": "c1",
                "tokenFile": "/var/run/secrets/azure/token"
            },
            "chunkByDay": true,
            "subscriptionBatchSize": 10
        }))
        .unwrap();

        assert!(config.chunk_by_day);
        assert_eq!(config.subscription_batch_size, Some(10));
        assert!(matches!(
            config.credential,
            CredentialConfig::WorkloadIdentity { .. }
        ));
    }
}
