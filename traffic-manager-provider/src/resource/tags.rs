//! ARM resource tags.

use std::collections::HashMap;

use crate::error::{ProviderError, Result};
use crate::providers::AZURE_PROVIDER_ID;

pub const MAX_TAGS: usize = 50;
pub const MAX_TAG_KEY_LENGTH: usize = 512;
pub const MAX_TAG_VALUE_LENGTH: usize = 256;

/// Checks ARM's per-resource tag limits.
pub fn validate_tags(tags: &HashMap<String, String>) -> Result<()> {
    let invalid = |detail: String| ProviderError::InvalidParameter {
        provider: AZURE_PROVIDER_ID.to_string(),
        param: "tags".to_string(),
        detail,
    };

    if tags.len() > MAX_TAGS {
        return Err(invalid(format!(
            "a maximum of {MAX_TAGS} tags can be applied to each ARM resource"
        )));
    }

    // 按 key 排序，错误信息稳定
    let mut keys: Vec<_> = tags.keys().collect();
    keys.sort();
    for key in keys {
        let key_len = key.chars().count();
        if key_len > MAX_TAG_KEY_LENGTH {
            return Err(invalid(format!(
                "the maximum length for a tag key is {MAX_TAG_KEY_LENGTH} characters: {key:?} is {key_len} characters"
            )));
        }
        let value_len = tags[key].chars().count();
        if value_len > MAX_TAG_VALUE_LENGTH {
            return Err(invalid(format!(
                "the maximum length for a tag value is {MAX_TAG_VALUE_LENGTH} characters: the value for {key:?} is {value_len} characters"
            )));
        }
    }

    Ok(())
}

/// Tags are always sent, an empty map clears them.
pub fn expand_tags(tags: &HashMap<String, String>) -> Option<HashMap<String, String>> {
    Some(tags.clone())
}

pub fn flatten_tags(tags: Option<&HashMap<String, String>>) -> HashMap<String, String> {
    tags.cloned().unwrap_or_default()
}
