use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::schema::{
    DEFAULT_INTERVAL_IN_SECONDS, DEFAULT_TIMEOUT_IN_SECONDS, DEFAULT_TOLERATED_NUMBER_OF_FAILURES,
};

/// User-facing configuration (and state) of a Traffic Manager profile.
///
/// Nested blocks are lists so that "no block" and "one block" are both
/// representable; validation requires exactly one `dns_config` and one
/// `monitor_config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    pub resource_group_name: String,
    /// Optional; when unset the remote value is kept.
    #[serde(default)]
    pub profile_status: Option<String>,
    pub traffic_routing_method: String,
    #[serde(default)]
    pub dns_config: Vec<DnsConfigBlock>,
    #[serde(default)]
    pub monitor_config: Vec<MonitorConfigBlock>,
    /// Computed: `{relative_name}.trafficmanager.net`.
    #[serde(default)]
    pub fqdn: Option<String>,
    #[serde(default)]
    pub max_return: Option<i64>,
    #[serde(default)]
    pub traffic_view_enabled: Option<bool>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsConfigBlock {
    pub relative_name: String,
    pub ttl: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfigBlock {
    /// `"min-max"` strings, e.g. `"200-299"`.
    #[serde(default)]
    pub expected_status_code_ranges: Vec<String>,
    #[serde(default)]
    pub custom_header: Vec<CustomHeaderBlock>,
    pub protocol: String,
    pub port: i64,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_interval_in_seconds")]
    pub interval_in_seconds: i64,
    #[serde(default = "default_timeout_in_seconds")]
    pub timeout_in_seconds: i64,
    #[serde(default = "default_tolerated_number_of_failures")]
    pub tolerated_number_of_failures: i64,
}

impl Default for MonitorConfigBlock {
    fn default() -> Self {
        Self {
            expected_status_code_ranges: Vec::new(),
            custom_header: Vec::new(),
            protocol: String::new(),
            port: 0,
            path: None,
            interval_in_seconds: DEFAULT_INTERVAL_IN_SECONDS,
            timeout_in_seconds: DEFAULT_TIMEOUT_IN_SECONDS,
            tolerated_number_of_failures: DEFAULT_TOLERATED_NUMBER_OF_FAILURES,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomHeaderBlock {
    pub name: String,
    pub value: String,
}

fn default_interval_in_seconds() -> i64 {
    DEFAULT_INTERVAL_IN_SECONDS
}

fn default_timeout_in_seconds() -> i64 {
    DEFAULT_TIMEOUT_IN_SECONDS
}

fn default_tolerated_number_of_failures() -> i64 {
    DEFAULT_TOLERATED_NUMBER_OF_FAILURES
}

/// A managed profile: its ID plus the attributes read back from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    pub id: String,
    pub attributes: ProfileConfig,
}
