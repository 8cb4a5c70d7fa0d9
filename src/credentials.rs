//! Credential seams.
//!
//! Token acquisition protocols (client secret exchange, workload identity
//! federation) are owned by an external credential provider. This crate only
//! consumes the single capability both variants share: producing a bearer
//! token.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::CredentialConfig;

/// Errors raised while constructing or using a credential.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The provider could not acquire a credential or token.
    #[error("credential acquisition failed: {0}")]
    Acquisition(String),

    /// The provider does not support the requested credential kind.
    #[error("unsupported credential kind: {0}")]
    Unsupported(String),
}

/// The one capability every credential variant exposes.
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Produce a bearer token for the ARM scope.
    ///
    /// Called per request; implementations are free to cache and refresh
    /// internally.
    ///
    /// # Errors
    ///
    /// Returns an error if a token cannot be produced.
    async fn bearer_token(&self) -> Result<String, CredentialError>;
}

/// External collaborator that turns credential configuration into a live
/// credential. Implementations own the authentication protocol.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Construct a credential for the configured variant.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be constructed.
    async fn credential(
        &self,
        config: &CredentialConfig,
    ) -> Result<Arc<dyn TokenCredential>, CredentialError>;
}

/// A credential holding a pre-acquired token.
///
/// Useful when the token is obtained out of band, and as the injection
/// point for tests.
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    /// Wrap an already-acquired bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn bearer_token(&self) -> Result<String, CredentialError> {
        Ok(self.token.clone())
    }
}
