//! Change detection between two configurations of the same profile.

use std::collections::BTreeSet;

use serde_json::Value;

use super::model::ProfileConfig;
use super::schema::{AttributeSchema, AttributeType, ResourceSchema, profile_schema};

/// Attributes that differ between the prior state and the new configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDiff {
    changed: BTreeSet<&'static str>,
    replacement: Vec<String>,
}

impl ProfileDiff {
    /// Compares `old` and `new` attribute by attribute.
    ///
    /// Read-only attributes are ignored. An optional+computed attribute left
    /// unset in `new` keeps its remote value and is not a change.
    pub fn between(old: &ProfileConfig, new: &ProfileConfig) -> Self {
        Self::with_schema(profile_schema(), old, new)
    }

    fn with_schema(schema: &ResourceSchema, old: &ProfileConfig, new: &ProfileConfig) -> Self {
        let old = serde_json::to_value(old).unwrap_or_default();
        let new = serde_json::to_value(new).unwrap_or_default();
        let mut diff = Self::default();

        for attr in &schema.attributes {
            if attr.is_read_only() {
                continue;
            }
            let old_value = old.get(attr.name).unwrap_or(&Value::Null);
            let new_value = new.get(attr.name).unwrap_or(&Value::Null);
            if attr.optional && attr.computed && new_value.is_null() {
                continue;
            }

            if normalize(attr, old_value) != normalize(attr, new_value) {
                diff.changed.insert(attr.name);
                if attr.force_new {
                    diff.replacement.push(attr.name.to_string());
                }
            }

            for nested in attr.nested().iter().filter(|n| n.force_new) {
                let old_nested = old_value.pointer(&format!("/0/{}", nested.name));
                let new_nested = new_value.pointer(&format!("/0/{}", nested.name));
                let old_nested = normalize(nested, old_nested.unwrap_or(&Value::Null));
                let new_nested = normalize(nested, new_nested.unwrap_or(&Value::Null));
                if old_nested != new_nested {
                    diff.replacement
                        .push(format!("{}.0.{}", attr.name, nested.name));
                }
            }
        }

        diff
    }

    pub fn has_change(&self, attribute: &str) -> bool {
        self.changed.contains(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    /// Changed top-level attributes, sorted.
    pub fn changed(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changed.iter().copied()
    }

    /// Whether applying the change needs a new profile.
    pub fn requires_replacement(&self) -> bool {
        !self.replacement.is_empty()
    }

    /// Paths of the changed force-new attributes (e.g. `dns_config.0.relative_name`).
    pub fn replacement_paths(&self) -> &[String] {
        &self.replacement
    }
}

/// Canonical form for comparison: case-folds case-insensitive strings and
/// fills nested defaults. An unset optional attribute equals its zero value.
fn normalize(attr: &AttributeSchema, value: &Value) -> Value {
    match (&attr.attr_type, value) {
        (_, Value::Null) => attr.default.clone().unwrap_or_else(|| unset_value(attr)),
        (AttributeType::String, Value::String(s)) if attr.case_insensitive => {
            Value::String(s.to_ascii_lowercase())
        }
        (AttributeType::Block(nested), Value::Array(blocks)) => Value::Array(
            blocks
                .iter()
                .map(|block| {
                    let fields = nested
                        .iter()
                        .map(|n| {
                            let v = block.get(n.name).unwrap_or(&Value::Null);
                            (n.name.to_string(), normalize(n, v))
                        })
                        .collect();
                    Value::Object(fields)
                })
                .collect(),
        ),
        _ => value.clone(),
    }
}

fn unset_value(attr: &AttributeSchema) -> Value {
    if !attr.optional || attr.computed {
        return Value::Null;
    }
    match attr.attr_type {
        AttributeType::String => Value::String(String::new()),
        AttributeType::Int => Value::from(0),
        AttributeType::Bool => Value::Bool(false),
        AttributeType::List(_) | AttributeType::Block(_) => Value::Array(Vec::new()),
        AttributeType::Map(_) => Value::Object(serde_json::Map::new()),
    }
}
