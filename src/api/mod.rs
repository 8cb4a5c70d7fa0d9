//! Azure API surface: wire models, the billing trait, and the ARM client.

pub mod models;
mod client;
mod traits;

pub use client::ArmClient;
pub use traits::{AzureApiError, BillingApi};
