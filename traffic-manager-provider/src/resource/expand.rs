//! Configuration → ARM request conversion.

use std::str::FromStr;

use crate::error::{ProviderError, Result};
use crate::providers::AZURE_PROVIDER_ID;
use crate::types::{
    CustomHeader, DnsConfig, MonitorConfig, MonitorProtocol, Profile, ProfileProperties,
    ProfileStatus, StatusCodeRange, TrafficRoutingMethod, TrafficViewEnrollmentStatus,
};

use super::model::{CustomHeaderBlock, DnsConfigBlock, MonitorConfigBlock, ProfileConfig};
use super::tags::expand_tags;

/// Traffic Manager profiles are global resources.
pub const PROFILE_LOCATION: &str = "global";

fn invalid(param: &str, detail: impl ToString) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: AZURE_PROVIDER_ID.to_string(),
        param: param.to_string(),
        detail: detail.to_string(),
    }
}

/// Full request body for `PUT` on create.
pub fn expand_profile(config: &ProfileConfig) -> Result<Profile> {
    let properties = ProfileProperties {
        profile_status: config
            .profile_status
            .as_deref()
            .map(expand_profile_status)
            .transpose()?,
        traffic_routing_method: Some(expand_routing_method(&config.traffic_routing_method)?),
        dns_config: Some(expand_dns_config(&config.dns_config)),
        monitor_config: Some(expand_monitor_config(&config.monitor_config)?),
        traffic_view_enrollment_status: config.traffic_view_enabled.map(expand_traffic_view),
        max_return: config.max_return,
    };

    Ok(Profile {
        name: Some(config.name.clone()),
        location: Some(PROFILE_LOCATION.to_string()),
        tags: expand_tags(&config.tags),
        properties: Some(properties),
        ..Default::default()
    })
}

pub fn expand_profile_status(value: &str) -> Result<ProfileStatus> {
    ProfileStatus::from_str(value).map_err(|e| invalid("profile_status", e))
}

pub fn expand_routing_method(value: &str) -> Result<TrafficRoutingMethod> {
    TrafficRoutingMethod::from_str(value).map_err(|e| invalid("traffic_routing_method", e))
}

/// Uses the first (only) block.
pub fn expand_dns_config(blocks: &[DnsConfigBlock]) -> DnsConfig {
    let Some(block) = blocks.first() else {
        return DnsConfig::default();
    };
    DnsConfig {
        relative_name: Some(block.relative_name.clone()),
        fqdn: None,
        ttl: Some(block.ttl),
    }
}

/// Uses the first (only) block.
pub fn expand_monitor_config(blocks: &[MonitorConfigBlock]) -> Result<MonitorConfig> {
    let Some(block) = blocks.first() else {
        return Ok(MonitorConfig::default());
    };

    Ok(MonitorConfig {
        profile_monitor_status: None,
        protocol: Some(
            MonitorProtocol::from_str(&block.protocol)
                .map_err(|e| invalid("monitor_config.0.protocol", e))?,
        ),
        port: Some(block.port),
        path: Some(block.path.clone().unwrap_or_default()),
        interval_in_seconds: Some(block.interval_in_seconds),
        timeout_in_seconds: Some(block.timeout_in_seconds),
        tolerated_number_of_failures: Some(block.tolerated_number_of_failures),
        custom_headers: expand_custom_headers(&block.custom_header),
        expected_status_code_ranges: Some(expand_status_code_ranges(
            &block.expected_status_code_ranges,
        )?),
    })
}

/// `None` for an empty list, so "not configured" reaches the API as absent.
pub fn expand_custom_headers(headers: &[CustomHeaderBlock]) -> Option<Vec<CustomHeader>> {
    if headers.is_empty() {
        return None;
    }
    Some(
        headers
            .iter()
            .map(|h| CustomHeader {
                name: Some(h.name.clone()),
                value: Some(h.value.clone()),
            })
            .collect(),
    )
}

pub fn expand_status_code_ranges(ranges: &[String]) -> Result<Vec<StatusCodeRange>> {
    ranges
        .iter()
        .enumerate()
        .map(|(i, r)| {
            expand_status_code_range(
                &format!("monitor_config.0.expected_status_code_ranges.{i}"),
                r,
            )
        })
        .collect()
}

/// Parses `"min-max"`.
fn expand_status_code_range(param: &str, value: &str) -> Result<StatusCodeRange> {
    let Some((min, max)) = value.split_once('-') else {
        return Err(invalid(param, format!("expected \"min-max\", got {value:?}")));
    };
    let min = min
        .parse::<i32>()
        .map_err(|e| invalid(param, format!("invalid lower bound in {value:?}: {e}")))?;
    let max = max
        .parse::<i32>()
        .map_err(|e| invalid(param, format!("invalid upper bound in {value:?}: {e}")))?;
    Ok(StatusCodeRange {
        min: Some(min),
        max: Some(max),
    })
}

pub fn expand_traffic_view(enabled: bool) -> TrafficViewEnrollmentStatus {
    if enabled {
        TrafficViewEnrollmentStatus::Enabled
    } else {
        TrafficViewEnrollmentStatus::Disabled
    }
}
