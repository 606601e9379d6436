//! Azure Resource Manager backend for Traffic Manager profiles

mod auth;
mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::providers::common::create_http_client;
use crate::types::{AzureEnvironment, ProviderCredentials};

use auth::{CachedToken, TokenSource};

/// Provider identifier used in errors and log prefixes.
pub const AZURE_PROVIDER_ID: &str = "azure";
/// Traffic Manager API version the wire types follow.
pub(crate) const DEFAULT_API_VERSION: &str = "2018-08-01";

/// Azure Traffic Manager client.
///
/// Authenticates as a service principal via the OAuth2 client-credentials flow
/// and caches the access token until shortly before it expires.
///
/// # Construction
///
/// ```rust,no_run
/// use traffic_manager_provider::{AzureEnvironment, AzureProvider, ProviderCredentials};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = ProviderCredentials::from_env()?;
/// let provider = AzureProvider::builder(credentials)
///     .environment(AzureEnvironment::Public)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct AzureProvider {
    pub(crate) client: Client,
    pub(crate) management_endpoint: String,
    pub(crate) login_endpoint: String,
    pub(crate) api_version: String,
    pub(crate) subscription_id: String,
    pub(crate) token_source: TokenSource,
    pub(crate) token_cache: RwLock<Option<CachedToken>>,
}

/// Builder for [`AzureProvider`] with configurable endpoints.
pub struct AzureProviderBuilder {
    credentials: ProviderCredentials,
    environment: AzureEnvironment,
    management_endpoint: Option<String>,
    login_endpoint: Option<String>,
    api_version: String,
    access_token: Option<String>,
}

impl AzureProviderBuilder {
    fn new(credentials: ProviderCredentials) -> Self {
        Self {
            credentials,
            environment: AzureEnvironment::default(),
            management_endpoint: None,
            login_endpoint: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: None,
        }
    }

    /// Select the Azure cloud (default: public).
    pub fn environment(mut self, environment: AzureEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Override the Resource Manager endpoint of the selected environment.
    pub fn management_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.management_endpoint = Some(endpoint.into());
        self
    }

    /// Override the login endpoint of the selected environment.
    pub fn login_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.login_endpoint = Some(endpoint.into());
        self
    }

    /// Override the `api-version` query parameter (default: `2018-08-01`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Use a pre-acquired bearer token instead of the client-credentials flow.
    /// The token is never refreshed.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Build the [`AzureProvider`] instance.
    pub fn build(self) -> Result<AzureProvider> {
        let subscription_id = self.credentials.subscription_id.clone();
        let token_source = match self.access_token {
            Some(token) => TokenSource::Static(token),
            None => TokenSource::ClientSecret(self.credentials),
        };

        Ok(AzureProvider {
            client: create_http_client(AZURE_PROVIDER_ID)?,
            management_endpoint: self
                .management_endpoint
                .unwrap_or_else(|| self.environment.management_endpoint().to_string()),
            login_endpoint: self
                .login_endpoint
                .unwrap_or_else(|| self.environment.login_endpoint().to_string()),
            api_version: self.api_version,
            subscription_id,
            token_source,
            token_cache: RwLock::new(None),
        })
    }
}

impl AzureProvider {
    /// Creates a provider for the public cloud with default settings.
    pub fn new(credentials: ProviderCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the provider configuration.
    pub fn builder(credentials: ProviderCredentials) -> AzureProviderBuilder {
        AzureProviderBuilder::new(credentials)
    }
}
