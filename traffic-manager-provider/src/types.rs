use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============ Traffic Manager API Types ============

/// Declares a string-valued ARM enum together with its wire names.
macro_rules! arm_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal, case_insensitive = $ci:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// All accepted wire values, in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($wire),+];

            /// The value sent to and returned by the API.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if ($ci && s.eq_ignore_ascii_case($wire)) || s == $wire {
                        return Ok(Self::$variant);
                    }
                )+
                Err(InvalidEnumValue {
                    field: $field,
                    allowed: Self::VALUES.join(" "),
                    value: s.to_string(),
                })
            }
        }
    };
}

/// A string did not name any variant of an ARM enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {field} to be one of [{allowed}], got {value}")]
pub struct InvalidEnumValue {
    /// Configuration attribute the value was read from.
    pub field: &'static str,
    /// Space-separated list of accepted values.
    pub allowed: String,
    /// The rejected input.
    pub value: String,
}

arm_string_enum! {
    /// Whether the profile is enabled.
    ProfileStatus, "profile_status", case_insensitive = true {
        Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

arm_string_enum! {
    /// How Traffic Manager picks an endpoint for a DNS query.
    TrafficRoutingMethod, "traffic_routing_method", case_insensitive = false {
        Geographic => "Geographic",
        Weighted => "Weighted",
        Performance => "Performance",
        Priority => "Priority",
        Subnet => "Subnet",
        /// Returns up to `max_return` healthy endpoints per query.
        MultiValue => "MultiValue",
    }
}

arm_string_enum! {
    /// Health probe protocol.
    MonitorProtocol, "protocol", case_insensitive = true {
        Http => "HTTP",
        Https => "HTTPS",
        Tcp => "TCP",
    }
}

arm_string_enum! {
    /// Traffic View enrollment.
    TrafficViewEnrollmentStatus, "traffic_view_enabled", case_insensitive = false {
        Enabled => "Enabled",
        Disabled => "Disabled",
    }
}

/// A Traffic Manager profile as exchanged with the ARM API.
///
/// Every field is optional so that the same shape serves full `PUT` bodies,
/// sparse `PATCH` bodies and `GET` responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Always `global` for Traffic Manager; required on create.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ProfileProperties>,
}

/// Properties of a Traffic Manager profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_status: Option<ProfileStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_routing_method: Option<TrafficRoutingMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns_config: Option<DnsConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitor_config: Option<MonitorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traffic_view_enrollment_status: Option<TrafficViewEnrollmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_return: Option<i64>,
}

/// DNS settings of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    /// Label under `trafficmanager.net`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_name: Option<String>,
    /// Read-only: `{relative_name}.trafficmanager.net`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
}

/// Endpoint health-check settings of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Read-only aggregate health.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_monitor_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<MonitorProtocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_in_seconds: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerated_number_of_failures: Option<i64>,
    /// `None` means "not configured", which the API treats differently from an empty list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_headers: Option<Vec<CustomHeader>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status_code_ranges: Option<Vec<StatusCodeRange>>,
}

/// A header sent with every health probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHeader {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// An inclusive range of HTTP status codes that count as healthy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCodeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
}

// ============ Environment & Timeouts ============

/// Azure cloud the provider talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AzureEnvironment {
    /// Azure public cloud.
    #[default]
    Public,
    /// Azure operated by 21Vianet.
    China,
    /// Azure US Government.
    UsGovernment,
}

impl AzureEnvironment {
    /// Resource Manager endpoint (no trailing slash).
    pub fn management_endpoint(self) -> &'static str {
        match self {
            Self::Public => "https://management.azure.com",
            Self::China => "https://management.chinacloudapi.cn",
            Self::UsGovernment => "https://management.usgovcloudapi.net",
        }
    }

    /// Entra ID (AAD) login endpoint (no trailing slash).
    pub fn login_endpoint(self) -> &'static str {
        match self {
            Self::Public => "https://login.microsoftonline.com",
            Self::China => "https://login.chinacloudapi.cn",
            Self::UsGovernment => "https://login.microsoftonline.us",
        }
    }

    /// Parse an environment name as accepted in `ARM_ENVIRONMENT`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "public" | "azurecloud" => Some(Self::Public),
            "china" | "azurechinacloud" => Some(Self::China),
            "usgovernment" | "azureusgovernmentcloud" => Some(Self::UsGovernment),
            _ => None,
        }
    }
}

/// Upper bounds for each lifecycle operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTimeouts {
    pub create: Duration,
    pub read: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Default for ResourceTimeouts {
    fn default() -> Self {
        Self {
            create: Duration::from_secs(30 * 60),
            read: Duration::from_secs(5 * 60),
            update: Duration::from_secs(30 * 60),
            delete: Duration::from_secs(30 * 60),
        }
    }
}

// ============ Credential Types ============

/// Validation error for provider credentials.
///
/// Returned when credential fields are missing, empty, or have an invalid format.
#[derive(Debug, Clone, Serialize, Error)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    #[error("Missing required field: {label}")]
    MissingField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    #[error("Field must not be empty: {label}")]
    EmptyField {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field has an invalid format.
    #[error("{label}: {reason}")]
    InvalidFormat {
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
        /// Description of what's wrong with the format.
        reason: String,
    },
}

/// Service principal credentials for Azure Resource Manager.
///
/// # Serialization
///
/// ```json
/// { "tenant_id": "...", "client_id": "...", "client_secret": "...", "subscription_id": "..." }
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderCredentials {
    /// Entra ID tenant (GUID or verified domain).
    pub tenant_id: String,
    /// Application (client) ID of the service principal.
    pub client_id: String,
    /// Client secret of the service principal.
    pub client_secret: String,
    /// Subscription that owns the managed profiles.
    pub subscription_id: String,
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

/// (map key, environment variable, label)
const CREDENTIAL_FIELDS: [(&str, &str, &str); 4] = [
    ("tenantId", "ARM_TENANT_ID", "Tenant ID"),
    ("clientId", "ARM_CLIENT_ID", "Client ID"),
    ("clientSecret", "ARM_CLIENT_SECRET", "Client Secret"),
    ("subscriptionId", "ARM_SUBSCRIPTION_ID", "Subscription ID"),
];

impl ProviderCredentials {
    /// Construct credentials from a `HashMap`, validating required fields.
    ///
    /// Useful for deserializing credentials stored in a flat key-value format.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if a required field is missing, empty,
    /// or (for the client and subscription IDs) not a GUID.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CredentialValidationError> {
        let [tenant, client, secret, subscription] = CREDENTIAL_FIELDS;
        let credentials = Self {
            tenant_id: Self::get_required_field(map.get(tenant.0), tenant.0, tenant.2)?,
            client_id: Self::get_required_field(map.get(client.0), client.0, client.2)?,
            client_secret: Self::get_required_field(map.get(secret.0), secret.0, secret.2)?,
            subscription_id: Self::get_required_field(
                map.get(subscription.0),
                subscription.0,
                subscription.2,
            )?,
        };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Read credentials from the `ARM_*` environment variables.
    pub fn from_env() -> Result<Self, CredentialValidationError> {
        let map: HashMap<String, String> = CREDENTIAL_FIELDS
            .iter()
            .filter_map(|(key, var, _)| {
                std::env::var(var)
                    .ok()
                    .map(|value| ((*key).to_string(), value))
            })
            .collect();
        Self::from_map(&map).map_err(|e| match e {
            CredentialValidationError::MissingField { field, label } => {
                let var = CREDENTIAL_FIELDS
                    .iter()
                    .find(|(key, _, _)| *key == field)
                    .map_or(field, |(_, var, _)| (*var).to_string());
                CredentialValidationError::MissingField { field: var, label }
            }
            other => other,
        })
    }

    /// Convert credentials to a `HashMap` for flat key-value storage.
    pub fn to_map(&self) -> HashMap<String, String> {
        [
            ("tenantId".to_string(), self.tenant_id.clone()),
            ("clientId".to_string(), self.client_id.clone()),
            ("clientSecret".to_string(), self.client_secret.clone()),
            ("subscriptionId".to_string(), self.subscription_id.clone()),
        ]
        .into()
    }

    /// Check that the GUID-shaped fields are GUIDs.
    pub fn validate(&self) -> Result<(), CredentialValidationError> {
        for (value, key, label) in [
            (&self.client_id, "clientId", "Client ID"),
            (&self.subscription_id, "subscriptionId", "Subscription ID"),
        ] {
            if uuid::Uuid::parse_str(value).is_err() {
                return Err(CredentialValidationError::InvalidFormat {
                    field: key.to_string(),
                    label: label.to_string(),
                    reason: format!("expected a GUID, got {value:?}"),
                });
            }
        }
        Ok(())
    }

    /// Obtain a required field and verify that it is not empty
    fn get_required_field(
        value: Option<&String>,
        key: &str,
        label: &str,
    ) -> Result<String, CredentialValidationError> {
        match value {
            None => Err(CredentialValidationError::MissingField {
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                field: key.to_string(),
                label: label.to_string(),
            }),
            Some(v) => Ok(v.clone()),
        }
    }
}
