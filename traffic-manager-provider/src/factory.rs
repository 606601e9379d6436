//! Factory functions wiring credentials to an API client and the resource.

use std::sync::Arc;

use crate::error::{ProviderError, Result};
use crate::providers::{AZURE_PROVIDER_ID, AzureProvider};
use crate::resource::TrafficManagerProfileResource;
use crate::traits::TrafficManagerApi;
use crate::types::{AzureEnvironment, ProviderCredentials};

/// Creates a [`TrafficManagerApi`] client for `environment`.
///
/// Credentials are checked locally first; no request is sent until the
/// first API call.
///
/// # Examples
///
/// ```rust,no_run
/// use traffic_manager_provider::{create_provider, AzureEnvironment, ProviderCredentials};
///
/// let credentials = ProviderCredentials::from_env().unwrap();
/// let api = create_provider(credentials, AzureEnvironment::Public).unwrap();
/// ```
pub fn create_provider(
    credentials: ProviderCredentials,
    environment: AzureEnvironment,
) -> Result<Arc<dyn TrafficManagerApi>> {
    credentials
        .validate()
        .map_err(|e| ProviderError::InvalidCredentials {
            provider: AZURE_PROVIDER_ID.to_string(),
            raw_message: Some(e.to_string()),
        })?;

    let provider = AzureProvider::builder(credentials)
        .environment(environment)
        .build()?;
    Ok(Arc::new(provider))
}

/// Creates a profile resource handler bound to the credentials' subscription.
pub fn create_profile_resource(
    credentials: ProviderCredentials,
    environment: AzureEnvironment,
) -> Result<TrafficManagerProfileResource> {
    let subscription_id = credentials.subscription_id.clone();
    let api = create_provider(credentials, environment)?;
    Ok(TrafficManagerProfileResource::new(api, subscription_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            tenant_id: "contoso.onmicrosoft.com".to_string(),
            client_id: "00000000-0000-0000-0000-000000000001".to_string(),
            client_secret: "secret".to_string(),
            subscription_id: "12345678-1234-9876-4563-123456789012".to_string(),
        }
    }

    #[test]
    fn creates_azure_provider() {
        let api = create_provider(credentials(), AzureEnvironment::Public).unwrap();
        assert_eq!(api.id(), "azure");
    }

    #[test]
    fn rejects_malformed_subscription() {
        let mut creds = credentials();
        creds.subscription_id = "nope".to_string();
        let result = create_provider(creds, AzureEnvironment::China);
        assert!(matches!(
            result,
            Err(ProviderError::InvalidCredentials { .. })
        ));
    }

    #[test]
    fn resource_uses_default_timeouts() {
        let resource = create_profile_resource(credentials(), AzureEnvironment::Public).unwrap();
        assert_eq!(resource.timeouts().read.as_secs(), 300);
        assert_eq!(resource.timeouts().create.as_secs(), 1800);
    }
}
