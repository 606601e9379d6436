//! Traffic Manager API backends

/// Shared utilities used by provider implementations.
pub mod common;

mod azure;

pub use azure::{AZURE_PROVIDER_ID, AzureProvider, AzureProviderBuilder};
