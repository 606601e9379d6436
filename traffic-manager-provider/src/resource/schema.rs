//! Attribute schema of the Traffic Manager profile resource.
//!
//! The schema is the single description of which attributes exist, which are
//! computed, which force replacement and which compare case-insensitively.
//! Change detection ([`ProfileDiff`](super::ProfileDiff)) is driven from it.

use std::sync::LazyLock;

use serde_json::{Value, json};

/// Resource type name as exposed to configuration.
pub const RESOURCE_TYPE: &str = "azurerm_traffic_manager_profile";

pub const MAX_RETURN_MIN: i64 = 1;
pub const MAX_RETURN_MAX: i64 = 8;
pub const TTL_MIN: i64 = 0;
pub const TTL_MAX: i64 = 2_147_483_647;
pub const PORT_MIN: i64 = 1;
pub const PORT_MAX: i64 = 65_535;
pub const INTERVAL_IN_SECONDS_VALUES: &[i64] = &[10, 30];
pub const TIMEOUT_IN_SECONDS_MIN: i64 = 5;
pub const TIMEOUT_IN_SECONDS_MAX: i64 = 10;
pub const TOLERATED_FAILURES_MIN: i64 = 0;
pub const TOLERATED_FAILURES_MAX: i64 = 9;

pub const DEFAULT_INTERVAL_IN_SECONDS: i64 = 30;
pub const DEFAULT_TIMEOUT_IN_SECONDS: i64 = 10;
pub const DEFAULT_TOLERATED_NUMBER_OF_FAILURES: i64 = 3;

/// Value type of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Int,
    Bool,
    /// List of scalars.
    List(Box<AttributeType>),
    /// String-keyed map of scalars.
    Map(Box<AttributeType>),
    /// List of nested blocks.
    Block(Vec<AttributeSchema>),
}

/// One attribute of a resource or nested block.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub attr_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub force_new: bool,
    /// Values differing only in ASCII case are not a change.
    pub case_insensitive: bool,
    pub default: Option<Value>,
    pub max_items: Option<usize>,
    pub description: Option<&'static str>,
}

impl AttributeSchema {
    pub fn new(name: &'static str, attr_type: AttributeType) -> Self {
        Self {
            name,
            attr_type,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            case_insensitive: false,
            default: None,
            max_items: None,
            description: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    #[must_use]
    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    #[must_use]
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Only the remote side sets this attribute.
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    /// Nested attributes when this is a block list.
    pub fn nested(&self) -> &[AttributeSchema] {
        match &self.attr_type {
            AttributeType::Block(attrs) => attrs,
            _ => &[],
        }
    }
}

/// Schema of a whole resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub description: Option<&'static str>,
    pub attributes: Vec<AttributeSchema>,
}

impl ResourceSchema {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            description: None,
            attributes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn attribute(mut self, attribute: AttributeSchema) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute_named(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Dotted paths (`dns_config.relative_name`) of every force-new attribute.
    pub fn force_new_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for attr in &self.attributes {
            if attr.force_new {
                paths.push(attr.name.to_string());
            }
            for nested in attr.nested() {
                if nested.force_new {
                    paths.push(format!("{}.{}", attr.name, nested.name));
                }
            }
        }
        paths
    }
}

static PROFILE_SCHEMA: LazyLock<ResourceSchema> = LazyLock::new(build_profile_schema);

/// Schema of `azurerm_traffic_manager_profile`.
pub fn profile_schema() -> &'static ResourceSchema {
    &PROFILE_SCHEMA
}

fn build_profile_schema() -> ResourceSchema {
    ResourceSchema::new(RESOURCE_TYPE)
        .with_description("Manages a Traffic Manager Profile to which multiple endpoints can be attached.")
        .attribute(
            AttributeSchema::new("name", AttributeType::String)
                .required()
                .force_new()
                .with_description("Name of the profile."),
        )
        .attribute(
            AttributeSchema::new("resource_group_name", AttributeType::String)
                .required()
                .force_new()
                .case_insensitive(),
        )
        .attribute(
            AttributeSchema::new("profile_status", AttributeType::String)
                .optional()
                .computed()
                .case_insensitive()
                .with_description("`Enabled` or `Disabled`."),
        )
        .attribute(
            AttributeSchema::new("traffic_routing_method", AttributeType::String)
                .required()
                .with_description(
                    "One of `Geographic`, `Weighted`, `Performance`, `Priority`, `Subnet`, `MultiValue`.",
                ),
        )
        .attribute(
            AttributeSchema::new("dns_config", AttributeType::Block(dns_config_attributes()))
                .required()
                .with_max_items(1),
        )
        .attribute(
            AttributeSchema::new(
                "monitor_config",
                AttributeType::Block(monitor_config_attributes()),
            )
            .required()
            .with_max_items(1),
        )
        .attribute(
            AttributeSchema::new("fqdn", AttributeType::String)
                .computed()
                .with_description("FQDN of the profile, `{relative_name}.trafficmanager.net`."),
        )
        .attribute(
            AttributeSchema::new("max_return", AttributeType::Int)
                .optional()
                .with_description("Endpoints returned per query; required for `MultiValue`."),
        )
        .attribute(AttributeSchema::new("traffic_view_enabled", AttributeType::Bool).optional())
        .attribute(
            AttributeSchema::new("tags", AttributeType::Map(Box::new(AttributeType::String)))
                .optional(),
        )
}

fn dns_config_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new("relative_name", AttributeType::String)
            .required()
            .force_new(),
        AttributeSchema::new("ttl", AttributeType::Int).required(),
    ]
}

fn monitor_config_attributes() -> Vec<AttributeSchema> {
    vec![
        AttributeSchema::new(
            "expected_status_code_ranges",
            AttributeType::List(Box::new(AttributeType::String)),
        )
        .optional()
        .with_description("Ranges such as `200-299`."),
        AttributeSchema::new(
            "custom_header",
            AttributeType::Block(vec![
                AttributeSchema::new("name", AttributeType::String).required(),
                AttributeSchema::new("value", AttributeType::String).required(),
            ]),
        )
        .optional(),
        AttributeSchema::new("protocol", AttributeType::String)
            .required()
            .case_insensitive(),
        AttributeSchema::new("port", AttributeType::Int).required(),
        AttributeSchema::new("path", AttributeType::String).optional(),
        AttributeSchema::new("interval_in_seconds", AttributeType::Int)
            .optional()
            .with_default(json!(DEFAULT_INTERVAL_IN_SECONDS)),
        AttributeSchema::new("timeout_in_seconds", AttributeType::Int)
            .optional()
            .with_default(json!(DEFAULT_TIMEOUT_IN_SECONDS)),
        AttributeSchema::new("tolerated_number_of_failures", AttributeType::Int)
            .optional()
            .with_default(json!(DEFAULT_TOLERATED_NUMBER_OF_FAILURES)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_new_paths() {
        assert_eq!(
            profile_schema().force_new_paths(),
            vec!["name", "resource_group_name", "dns_config.relative_name"]
        );
    }

    #[test]
    fn fqdn_is_read_only() {
        let schema = profile_schema();
        assert!(schema.attribute_named("fqdn").unwrap().is_read_only());
        assert!(!schema.attribute_named("profile_status").unwrap().is_read_only());
    }

    #[test]
    fn monitor_defaults() {
        let monitor = profile_schema().attribute_named("monitor_config").unwrap();
        let interval = monitor
            .nested()
            .iter()
            .find(|a| a.name == "interval_in_seconds")
            .unwrap();
        assert_eq!(interval.default, Some(json!(30)));
        assert_eq!(monitor.max_items, Some(1));
    }

    #[test]
    fn case_insensitive_attributes() {
        let schema = profile_schema();
        let names: Vec<_> = schema
            .attributes
            .iter()
            .filter(|a| a.case_insensitive)
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["resource_group_name", "profile_status"]);
    }
}
