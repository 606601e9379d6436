//! ARM response → configuration state conversion.

use crate::resource_id::TrafficManagerProfileId;
use crate::types::{
    CustomHeader, DnsConfig, MonitorConfig, Profile, StatusCodeRange, TrafficViewEnrollmentStatus,
};

use super::model::{CustomHeaderBlock, DnsConfigBlock, MonitorConfigBlock, ProfileConfig};
use super::schema::{
    DEFAULT_INTERVAL_IN_SECONDS, DEFAULT_TIMEOUT_IN_SECONDS, DEFAULT_TOLERATED_NUMBER_OF_FAILURES,
};
use super::tags::flatten_tags;

/// Builds state from a `GET` response. Name and resource group come from the ID.
pub fn flatten_profile(id: &TrafficManagerProfileId, profile: &Profile) -> ProfileConfig {
    let mut config = ProfileConfig {
        name: id.name.clone(),
        resource_group_name: id.resource_group.clone(),
        tags: flatten_tags(profile.tags.as_ref()),
        ..Default::default()
    };

    if let Some(props) = &profile.properties {
        config.profile_status = props.profile_status.map(|s| s.as_str().to_string());
        config.traffic_routing_method = props
            .traffic_routing_method
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        config.max_return = props.max_return;
        config.dns_config = flatten_dns_config(props.dns_config.as_ref());
        config.monitor_config = flatten_monitor_config(props.monitor_config.as_ref());
        config.traffic_view_enabled = Some(matches!(
            props.traffic_view_enrollment_status,
            Some(TrafficViewEnrollmentStatus::Enabled)
        ));
        config.fqdn = props.dns_config.as_ref().and_then(|dns| dns.fqdn.clone());
    }

    config
}

pub fn flatten_dns_config(dns: Option<&DnsConfig>) -> Vec<DnsConfigBlock> {
    let Some(dns) = dns else {
        return Vec::new();
    };
    vec![DnsConfigBlock {
        relative_name: dns.relative_name.clone().unwrap_or_default(),
        ttl: dns.ttl.unwrap_or_default(),
    }]
}

pub fn flatten_monitor_config(monitor: Option<&MonitorConfig>) -> Vec<MonitorConfigBlock> {
    let Some(monitor) = monitor else {
        return Vec::new();
    };
    vec![MonitorConfigBlock {
        expected_status_code_ranges: flatten_status_code_ranges(
            monitor.expected_status_code_ranges.as_deref(),
        ),
        custom_header: flatten_custom_headers(monitor.custom_headers.as_deref()),
        protocol: monitor
            .protocol
            .map(|p| p.as_str().to_string())
            .unwrap_or_default(),
        port: monitor.port.unwrap_or_default(),
        path: monitor.path.clone(),
        interval_in_seconds: monitor
            .interval_in_seconds
            .unwrap_or(DEFAULT_INTERVAL_IN_SECONDS),
        timeout_in_seconds: monitor
            .timeout_in_seconds
            .unwrap_or(DEFAULT_TIMEOUT_IN_SECONDS),
        tolerated_number_of_failures: monitor
            .tolerated_number_of_failures
            .unwrap_or(DEFAULT_TOLERATED_NUMBER_OF_FAILURES),
    }]
}

/// Never absent: a missing list flattens to an empty one.
pub fn flatten_custom_headers(headers: Option<&[CustomHeader]>) -> Vec<CustomHeaderBlock> {
    headers
        .unwrap_or_default()
        .iter()
        .map(|h| CustomHeaderBlock {
            name: h.name.clone().unwrap_or_default(),
            value: h.value.clone().unwrap_or_default(),
        })
        .collect()
}

/// `"min-max"`; ranges missing either bound are dropped.
pub fn flatten_status_code_ranges(ranges: Option<&[StatusCodeRange]>) -> Vec<String> {
    ranges
        .unwrap_or_default()
        .iter()
        .filter_map(|r| match (r.min, r.max) {
            (Some(min), Some(max)) => Some(format!("{min}-{max}")),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::{MonitorProtocol, ProfileProperties, ProfileStatus, TrafficRoutingMethod};

    fn id() -> TrafficManagerProfileId {
        TrafficManagerProfileId::new("sub", "rg1", "profile1")
    }

    #[test]
    fn ranges_skip_missing_bounds() {
        let ranges = [
            StatusCodeRange {
                min: Some(200),
                max: Some(299),
            },
            StatusCodeRange {
                min: Some(301),
                max: None,
            },
            StatusCodeRange {
                min: None,
                max: Some(404),
            },
        ];
        assert_eq!(flatten_status_code_ranges(Some(&ranges)), vec!["200-299"]);
        assert!(flatten_status_code_ranges(None).is_empty());
    }

    #[test]
    fn custom_headers_never_absent() {
        assert!(flatten_custom_headers(None).is_empty());
        assert!(flatten_custom_headers(Some(&[])).is_empty());
        let headers = flatten_custom_headers(Some(&[CustomHeader {
            name: Some("host".into()),
            value: Some("example.com".into()),
        }]));
        assert_eq!(
            headers,
            vec![CustomHeaderBlock {
                name: "host".into(),
                value: "example.com".into()
            }]
        );
    }

    #[test]
    fn missing_blocks_flatten_to_empty_lists() {
        assert!(flatten_dns_config(None).is_empty());
        assert!(flatten_monitor_config(None).is_empty());
    }

    #[test]
    fn profile_from_response() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "/subscriptions/sub/resourceGroups/RG1/providers/Microsoft.Network/trafficManagerProfiles/profile1",
            "name": "profile1",
            "type": "Microsoft.Network/trafficManagerProfiles",
            "location": "global",
            "tags": { "env": "prod" },
            "properties": {
                "profileStatus": "Enabled",
                "trafficRoutingMethod": "Performance",
                "dnsConfig": { "relativeName": "profile1", "fqdn": "profile1.trafficmanager.net", "ttl": 30 },
                "monitorConfig": {
                    "profileMonitorStatus": "Inactive",
                    "protocol": "HTTP",
                    "port": 80,
                    "path": "/",
                    "intervalInSeconds": 30,
                    "timeoutInSeconds": 10,
                    "toleratedNumberOfFailures": 3,
                    "expectedStatusCodeRanges": [{ "min": 200, "max": 202 }]
                },
                "trafficViewEnrollmentStatus": "Disabled"
            }
        }))
        .unwrap();

        let config = flatten_profile(&id(), &profile);
        assert_eq!(config.name, "profile1");
        assert_eq!(config.resource_group_name, "rg1");
        assert_eq!(config.profile_status.as_deref(), Some("Enabled"));
        assert_eq!(config.traffic_routing_method, "Performance");
        assert_eq!(config.fqdn.as_deref(), Some("profile1.trafficmanager.net"));
        assert_eq!(config.traffic_view_enabled, Some(false));
        assert_eq!(config.dns_config[0].ttl, 30);
        let monitor = &config.monitor_config[0];
        assert_eq!(monitor.protocol, "HTTP");
        assert_eq!(monitor.expected_status_code_ranges, vec!["200-202"]);
        assert!(monitor.custom_header.is_empty());
        assert_eq!(config.tags, HashMap::from([("env".into(), "prod".into())]));
    }

    #[test]
    fn traffic_view_enabled_only_when_status_enabled() {
        let mut profile = Profile {
            properties: Some(ProfileProperties {
                profile_status: Some(ProfileStatus::Enabled),
                traffic_routing_method: Some(TrafficRoutingMethod::Weighted),
                traffic_view_enrollment_status: Some(TrafficViewEnrollmentStatus::Enabled),
                monitor_config: Some(MonitorConfig {
                    protocol: Some(MonitorProtocol::Tcp),
                    port: Some(22),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            flatten_profile(&id(), &profile).traffic_view_enabled,
            Some(true)
        );

        if let Some(props) = profile.properties.as_mut() {
            props.traffic_view_enrollment_status = None;
        }
        assert_eq!(
            flatten_profile(&id(), &profile).traffic_view_enabled,
            Some(false)
        );
    }

    #[test]
    fn profile_without_properties_keeps_identity() {
        let config = flatten_profile(&id(), &Profile::default());
        assert_eq!(config.name, "profile1");
        assert!(config.dns_config.is_empty());
        assert!(config.traffic_view_enabled.is_none());
    }
}
