//! Resource identifier parsing and formatting.
//!
//! ARM IDs are path-style strings made of literal segments (`subscriptions`,
//! `providers`, ...) interleaved with user values. Each ID type declares its
//! shape as a [`Segment`] pattern and the shared parser walks the input
//! position by position:
//!
//! - literal segments must match exactly, including case;
//! - value segments must be present and non-empty;
//! - nothing may follow the last segment.

mod feature;
mod profile;

use thiserror::Error;

use crate::error::ProviderError;
use crate::providers::AZURE_PROVIDER_ID;

pub use feature::FeatureId;
pub use profile::TrafficManagerProfileId;

/// Types that render themselves as a canonical resource ID string.
pub trait ResourceIdFormatter {
    /// The canonical ID string.
    fn id(&self) -> String;
}

/// Reasons a resource ID string can be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceIdError {
    /// The input was an empty string.
    #[error("ID was empty")]
    Empty,

    /// The input did not start with `/`.
    #[error("ID must start with '/'")]
    MissingLeadingSlash,

    /// A segment required by the pattern was absent.
    #[error("missing segment '{0}'")]
    MissingSegment(&'static str),

    /// A literal segment did not match (wrong name or wrong casing).
    #[error("expected segment '{expected}' but got '{actual}'")]
    UnexpectedSegment {
        /// The literal the pattern requires.
        expected: &'static str,
        /// What the input contained.
        actual: String,
    },

    /// A value segment was present but empty.
    #[error("value for segment '{0}' was empty")]
    EmptyValue(&'static str),

    /// The input continued past the last segment of the pattern.
    #[error("unexpected trailing segments '{0}'")]
    TrailingSegments(String),
}

impl ResourceIdError {
    pub(crate) fn into_provider_error(self, input: &str) -> ProviderError {
        ProviderError::InvalidResourceId {
            provider: AZURE_PROVIDER_ID.to_string(),
            input: input.to_string(),
            detail: self.to_string(),
        }
    }
}

/// One position in an ID pattern.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Segment {
    /// A literal that must appear verbatim.
    Static(&'static str),
    /// A literal with accepted spellings; the first is canonical.
    OneOf(&'static [&'static str]),
    /// A named, non-empty user value.
    Value(&'static str),
}

/// Values captured by [`parse_segments`], keyed by segment name.
#[derive(Debug)]
pub(crate) struct ParsedSegments {
    values: Vec<(&'static str, String)>,
}

impl ParsedSegments {
    /// Remove and return the value captured for `key`.
    pub fn take(&mut self, key: &'static str) -> Result<String, ResourceIdError> {
        let index = self
            .values
            .iter()
            .position(|(k, _)| *k == key)
            .ok_or(ResourceIdError::MissingSegment(key))?;
        Ok(self.values.swap_remove(index).1)
    }
}

/// Match `input` against `pattern`.
pub(crate) fn parse_segments(
    input: &str,
    pattern: &[Segment],
) -> Result<ParsedSegments, ResourceIdError> {
    if input.is_empty() {
        return Err(ResourceIdError::Empty);
    }
    let rest = input
        .strip_prefix('/')
        .ok_or(ResourceIdError::MissingLeadingSlash)?;

    let parts: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').collect()
    };

    let mut values = Vec::new();
    for (i, segment) in pattern.iter().enumerate() {
        let part = parts.get(i).copied().unwrap_or_default();
        match *segment {
            Segment::Static(expected) => {
                if part.is_empty() {
                    return Err(ResourceIdError::MissingSegment(expected));
                }
                if part != expected {
                    return Err(ResourceIdError::UnexpectedSegment {
                        expected,
                        actual: part.to_string(),
                    });
                }
            }
            Segment::OneOf(accepted) => {
                let expected = accepted.first().copied().unwrap_or_default();
                if part.is_empty() {
                    return Err(ResourceIdError::MissingSegment(expected));
                }
                if !accepted.iter().any(|a| *a == part) {
                    return Err(ResourceIdError::UnexpectedSegment {
                        expected,
                        actual: part.to_string(),
                    });
                }
            }
            Segment::Value(name) => {
                if i >= parts.len() {
                    return Err(ResourceIdError::MissingSegment(name));
                }
                if part.is_empty() {
                    return Err(ResourceIdError::EmptyValue(name));
                }
                values.push((name, part.to_string()));
            }
        }
    }

    if parts.len() > pattern.len() {
        return Err(ResourceIdError::TrailingSegments(
            parts[pattern.len()..].join("/"),
        ));
    }

    Ok(ParsedSegments { values })
}
