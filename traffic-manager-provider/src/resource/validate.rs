//! Configuration checks run before any request is sent.

use std::str::FromStr;

use crate::error::{ProviderError, Result};
use crate::providers::AZURE_PROVIDER_ID;
use crate::types::{InvalidEnumValue, MonitorProtocol, ProfileStatus, TrafficRoutingMethod};

use super::model::{DnsConfigBlock, MonitorConfigBlock, ProfileConfig};
use super::schema::{
    INTERVAL_IN_SECONDS_VALUES, MAX_RETURN_MAX, MAX_RETURN_MIN, PORT_MAX, PORT_MIN,
    TIMEOUT_IN_SECONDS_MAX, TIMEOUT_IN_SECONDS_MIN, TOLERATED_FAILURES_MAX,
    TOLERATED_FAILURES_MIN, TTL_MAX, TTL_MIN, profile_schema,
};
use super::tags::validate_tags;

const RESOURCE_GROUP_NAME_MAX_LENGTH: usize = 90;

fn invalid(param: impl Into<String>, detail: impl Into<String>) -> ProviderError {
    ProviderError::InvalidParameter {
        provider: AZURE_PROVIDER_ID.to_string(),
        param: param.into(),
        detail: detail.into(),
    }
}

fn enum_error(param: &str, e: &InvalidEnumValue) -> ProviderError {
    invalid(
        param,
        format!("expected {param} to be one of [{}], got {}", e.allowed, e.value),
    )
}

/// Validates every attribute, then the cross-field rules.
pub fn validate_profile(config: &ProfileConfig) -> Result<()> {
    string_is_not_empty("name", &config.name)?;
    resource_group_name("resource_group_name", &config.resource_group_name)?;

    if let Some(status) = &config.profile_status {
        ProfileStatus::from_str(status).map_err(|e| enum_error("profile_status", &e))?;
    }
    let routing_method = TrafficRoutingMethod::from_str(&config.traffic_routing_method)
        .map_err(|e| enum_error("traffic_routing_method", &e))?;

    block_count("dns_config", config.dns_config.len())?;
    for (i, block) in config.dns_config.iter().enumerate() {
        dns_config(&format!("dns_config.{i}"), block)?;
    }

    block_count("monitor_config", config.monitor_config.len())?;
    for (i, block) in config.monitor_config.iter().enumerate() {
        monitor_config(&format!("monitor_config.{i}"), block)?;
    }

    if let Some(max_return) = config.max_return {
        int_between("max_return", max_return, MAX_RETURN_MIN, MAX_RETURN_MAX)?;
    }

    validate_tags(&config.tags)?;

    validate_cross_fields(config, routing_method)
}

/// Rules spanning several attributes.
pub fn validate_cross_fields(
    config: &ProfileConfig,
    routing_method: TrafficRoutingMethod,
) -> Result<()> {
    if routing_method == TrafficRoutingMethod::MultiValue && config.max_return.is_none() {
        return Err(invalid(
            "max_return",
            "`max_return` must be specified when `traffic_routing_method` is set to `MultiValue`",
        ));
    }

    if let Some(monitor) = config.monitor_config.first()
        && monitor.interval_in_seconds == 10
        && monitor.timeout_in_seconds == 10
    {
        return Err(invalid(
            "monitor_config.0.timeout_in_seconds",
            "`timeout_in_seconds` must be between `5` and `9` when `interval_in_seconds` is set to `10`",
        ));
    }

    Ok(())
}

fn dns_config(prefix: &str, block: &DnsConfigBlock) -> Result<()> {
    string_is_not_empty(&format!("{prefix}.relative_name"), &block.relative_name)?;
    int_between(&format!("{prefix}.ttl"), block.ttl, TTL_MIN, TTL_MAX)
}

fn monitor_config(prefix: &str, block: &MonitorConfigBlock) -> Result<()> {
    for (i, range) in block.expected_status_code_ranges.iter().enumerate() {
        status_code_range(&format!("{prefix}.expected_status_code_ranges.{i}"), range)?;
    }
    for (i, header) in block.custom_header.iter().enumerate() {
        string_is_not_empty(&format!("{prefix}.custom_header.{i}.name"), &header.name)?;
    }

    let protocol_param = format!("{prefix}.protocol");
    MonitorProtocol::from_str(&block.protocol).map_err(|e| enum_error(&protocol_param, &e))?;

    int_between(&format!("{prefix}.port"), block.port, PORT_MIN, PORT_MAX)?;
    int_in_slice(
        &format!("{prefix}.interval_in_seconds"),
        block.interval_in_seconds,
        INTERVAL_IN_SECONDS_VALUES,
    )?;
    int_between(
        &format!("{prefix}.timeout_in_seconds"),
        block.timeout_in_seconds,
        TIMEOUT_IN_SECONDS_MIN,
        TIMEOUT_IN_SECONDS_MAX,
    )?;
    int_between(
        &format!("{prefix}.tolerated_number_of_failures"),
        block.tolerated_number_of_failures,
        TOLERATED_FAILURES_MIN,
        TOLERATED_FAILURES_MAX,
    )
}

/// Block list length against the schema's `required` / `max_items`.
fn block_count(param: &'static str, count: usize) -> Result<()> {
    let Some(attr) = profile_schema().attribute_named(param) else {
        return Ok(());
    };
    if attr.required && count == 0 {
        return Err(invalid(param, format!("{param} is required")));
    }
    match attr.max_items {
        Some(max) if count > max => Err(invalid(
            param,
            format!("attribute supports {max} item maximum, config has {count} declared"),
        )),
        _ => Ok(()),
    }
}

// ============ Primitive Validators ============

pub fn string_is_not_empty(param: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(
            param,
            format!("expected {param:?} to not be an empty string"),
        ));
    }
    Ok(())
}

pub fn int_between(param: &str, value: i64, min: i64, max: i64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(invalid(
            param,
            format!("expected {param} to be in the range ({min} - {max}), got {value}"),
        ));
    }
    Ok(())
}

pub fn int_in_slice(param: &str, value: i64, allowed: &[i64]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            param,
            format!("expected {param} to be one of {allowed:?}, got {value}"),
        ));
    }
    Ok(())
}

/// `"min-max"`: exactly one `-`, integers on both sides.
pub fn status_code_range(param: &str, value: &str) -> Result<()> {
    let parts: Vec<&str> = value.split('-').collect();
    let [min, max] = parts.as_slice() else {
        return Err(invalid(
            param,
            format!("expected {param} to contain a single '-', got {value:?}"),
        ));
    };
    if min.parse::<i32>().is_err() {
        return Err(invalid(
            param,
            format!("expected {param} on the left of '-' to be an integer, got {min:?}"),
        ));
    }
    if max.parse::<i32>().is_err() {
        return Err(invalid(
            param,
            format!("expected {param} on the right of '-' to be an integer, got {max:?}"),
        ));
    }
    Ok(())
}

/// ARM resource group naming rules.
pub fn resource_group_name(param: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid(param, format!("{param} cannot be blank")));
    }
    if value.chars().count() > RESOURCE_GROUP_NAME_MAX_LENGTH {
        return Err(invalid(
            param,
            format!("{param} may not exceed {RESOURCE_GROUP_NAME_MAX_LENGTH} characters in length"),
        ));
    }
    if value.ends_with('.') {
        return Err(invalid(param, format!("{param} may not end with a period")));
    }
    if !value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')'))
    {
        return Err(invalid(
            param,
            format!(
                "{param} may only contain alphanumeric characters, dash, underscores, parentheses and periods"
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::model::CustomHeaderBlock;

    fn config() -> ProfileConfig {
        ProfileConfig {
            name: "profile1".into(),
            resource_group_name: "rg1".into(),
            traffic_routing_method: "Weighted".into(),
            dns_config: vec![DnsConfigBlock {
                relative_name: "profile1".into(),
                ttl: 30,
            }],
            monitor_config: vec![MonitorConfigBlock {
                protocol: "HTTP".into(),
                port: 80,
                path: Some("/".into()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn param_of(result: Result<()>) -> String {
        match result {
            Err(ProviderError::InvalidParameter { param, .. }) => param,
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(validate_profile(&config()).is_ok());
    }

    #[test]
    fn multivalue_requires_max_return() {
        let mut c = config();
        c.traffic_routing_method = "MultiValue".into();
        let err = validate_profile(&c).unwrap_err();
        assert!(
            err.to_string().contains(
                "`max_return` must be specified when `traffic_routing_method` is set to `MultiValue`"
            ),
            "unexpected error: {err}"
        );

        c.max_return = Some(4);
        assert!(validate_profile(&c).is_ok());
    }

    #[test]
    fn interval_ten_forbids_timeout_ten() {
        let mut c = config();
        c.monitor_config[0].interval_in_seconds = 10;
        c.monitor_config[0].timeout_in_seconds = 10;
        let err = validate_profile(&c).unwrap_err();
        assert!(err.to_string().contains(
            "`timeout_in_seconds` must be between `5` and `9` when `interval_in_seconds` is set to `10`"
        ));

        c.monitor_config[0].timeout_in_seconds = 9;
        assert!(validate_profile(&c).is_ok());
    }

    #[test]
    fn routing_method_is_case_sensitive() {
        let mut c = config();
        c.traffic_routing_method = "weighted".into();
        assert_eq!(param_of(validate_profile(&c)), "traffic_routing_method");
    }

    #[test]
    fn profile_status_and_protocol_ignore_case() {
        let mut c = config();
        c.profile_status = Some("disabled".into());
        c.monitor_config[0].protocol = "https".into();
        assert!(validate_profile(&c).is_ok());

        c.profile_status = Some("Paused".into());
        assert_eq!(param_of(validate_profile(&c)), "profile_status");
    }

    #[test]
    fn dns_and_monitor_blocks_are_required_once() {
        let mut c = config();
        c.dns_config.clear();
        assert_eq!(param_of(validate_profile(&c)), "dns_config");

        let mut c = config();
        let extra = c.monitor_config[0].clone();
        c.monitor_config.push(extra);
        assert_eq!(param_of(validate_profile(&c)), "monitor_config");
    }

    #[test]
    fn block_limits_come_from_schema() {
        for name in ["dns_config", "monitor_config"] {
            let attr = profile_schema().attribute_named(name).unwrap();
            let max = attr.max_items.unwrap();
            assert!(block_count(name, max).is_ok());

            let err = block_count(name, max + 1).unwrap_err();
            assert!(
                matches!(&err, ProviderError::InvalidParameter { detail, .. }
                    if detail == &format!("attribute supports {max} item maximum, config has {} declared", max + 1)),
                "unexpected error: {err:?}"
            );
            assert!(block_count(name, 0).is_err());
        }
    }

    #[test]
    fn numeric_ranges() {
        let mut c = config();
        c.max_return = Some(9);
        assert_eq!(param_of(validate_profile(&c)), "max_return");

        let mut c = config();
        c.dns_config[0].ttl = -1;
        assert_eq!(param_of(validate_profile(&c)), "dns_config.0.ttl");

        let mut c = config();
        c.monitor_config[0].port = 0;
        assert_eq!(param_of(validate_profile(&c)), "monitor_config.0.port");

        let mut c = config();
        c.monitor_config[0].interval_in_seconds = 20;
        assert_eq!(
            param_of(validate_profile(&c)),
            "monitor_config.0.interval_in_seconds"
        );

        let mut c = config();
        c.monitor_config[0].timeout_in_seconds = 4;
        assert_eq!(
            param_of(validate_profile(&c)),
            "monitor_config.0.timeout_in_seconds"
        );

        let mut c = config();
        c.monitor_config[0].tolerated_number_of_failures = 10;
        assert_eq!(
            param_of(validate_profile(&c)),
            "monitor_config.0.tolerated_number_of_failures"
        );
    }

    #[test]
    fn custom_header_name_required() {
        let mut c = config();
        c.monitor_config[0].custom_header = vec![CustomHeaderBlock {
            name: String::new(),
            value: "v".into(),
        }];
        assert_eq!(
            param_of(validate_profile(&c)),
            "monitor_config.0.custom_header.0.name"
        );
    }

    #[test]
    fn status_code_ranges() {
        assert!(status_code_range("r", "200-299").is_ok());
        assert!(status_code_range("r", "200").is_err());
        assert!(status_code_range("r", "200-299-300").is_err());
        assert!(status_code_range("r", "abc-299").is_err());
        assert!(status_code_range("r", "200-").is_err());
    }

    #[test]
    fn resource_group_names() {
        assert!(resource_group_name("rg", "my-rg_1.(prod)").is_ok());
        assert!(resource_group_name("rg", "").is_err());
        assert!(resource_group_name("rg", "rg.").is_err());
        assert!(resource_group_name("rg", "rg/1").is_err());
        assert!(resource_group_name("rg", &"a".repeat(91)).is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let mut c = config();
        c.name.clear();
        assert_eq!(param_of(validate_profile(&c)), "name");
    }
}
