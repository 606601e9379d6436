//! # traffic-manager-provider
//!
//! A declarative resource handler for Azure Traffic Manager profiles
//! (`azurerm_traffic_manager_profile`, ARM API `2018-08-01`).
//!
//! The crate translates a structured profile configuration into Traffic
//! Manager REST calls and API responses back into configuration state:
//!
//! - **schema & validation**: per-attribute rules (ranges, enums, tag limits)
//!   and cross-field rules, all checked before any request is sent;
//! - **expand / flatten**: pure converters between [`ProfileConfig`] and the
//!   wire [`Profile`];
//! - **lifecycle**: [`TrafficManagerProfileResource`] implements create, read,
//!   update (sparse `PATCH`), delete and import on top of a
//!   [`TrafficManagerApi`];
//! - **resource IDs**: [`TrafficManagerProfileId`] and [`FeatureId`]
//!   parse and format ARM identifiers.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use traffic_manager_provider::{
//!     create_profile_resource, AzureEnvironment, DnsConfigBlock, MonitorConfigBlock,
//!     ProfileConfig, ProviderCredentials,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Credentials from ARM_TENANT_ID / ARM_CLIENT_ID / ARM_CLIENT_SECRET / ARM_SUBSCRIPTION_ID
//!     let credentials = ProviderCredentials::from_env()?;
//!     let resource = create_profile_resource(credentials, AzureEnvironment::Public)?;
//!
//!     // 2. Create a profile
//!     let config = ProfileConfig {
//!         name: "example-profile".to_string(),
//!         resource_group_name: "example-rg".to_string(),
//!         traffic_routing_method: "Weighted".to_string(),
//!         dns_config: vec![DnsConfigBlock {
//!             relative_name: "example-profile".to_string(),
//!             ttl: 100,
//!         }],
//!         monitor_config: vec![MonitorConfigBlock {
//!             protocol: "HTTP".to_string(),
//!             port: 80,
//!             path: Some("/".to_string()),
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     };
//!     let state = resource.create(&config).await?;
//!     println!("{} -> {:?}", state.id, state.attributes.fqdn);
//!
//!     // 3. Tear it down
//!     resource.delete(&state.id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidParameter`]: configuration rejected locally or by the API
//! - [`ProviderError::ResourceExists`]: the profile exists and must be imported
//! - [`ProviderError::ResourceNotFound`]: the profile (or its resource group) is gone
//! - [`ProviderError::Timeout`]: the operation exceeded its [`ResourceTimeouts`] bound
//!
//! Requests are never retried; throttling surfaces as
//! [`ProviderError::RateLimited`].

mod error;
mod factory;
mod http_client;
mod providers;
mod resource;
mod resource_id;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::{create_profile_resource, create_provider};

// Re-export the API trait only (internal traits are not exported)
pub use traits::TrafficManagerApi;

// Re-export the resource handler and its configuration model
pub use resource::{
    CustomHeaderBlock, DnsConfigBlock, MonitorConfigBlock, ProfileConfig, ProfileDiff,
    ResourceState, TrafficManagerProfileResource, expand, flatten, schema, tags, validate,
};

// Re-export resource IDs
pub use resource_id::{FeatureId, ResourceIdError, ResourceIdFormatter, TrafficManagerProfileId};

// Re-export types
pub use types::{
    AzureEnvironment, CredentialValidationError, CustomHeader, DnsConfig, InvalidEnumValue,
    MonitorConfig, MonitorProtocol, Profile, ProfileProperties, ProfileStatus,
    ProviderCredentials, ResourceTimeouts, StatusCodeRange, TrafficRoutingMethod,
    TrafficViewEnrollmentStatus,
};

// Re-export the concrete Azure client
pub use providers::{AZURE_PROVIDER_ID, AzureProvider, AzureProviderBuilder};
