use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ResourceIdError, ResourceIdFormatter, Segment, parse_segments};

const FEATURE_ID_PATTERN: &[Segment] = &[
    Segment::Static("subscriptions"),
    Segment::Value("subscriptionId"),
    Segment::Static("providers"),
    Segment::Static("Microsoft.Features"),
    Segment::Static("providers"),
    Segment::Value("providerNamespace"),
    Segment::Static("features"),
    Segment::Value("name"),
];

/// ID of a subscription feature registration:
/// `/subscriptions/{sub}/providers/Microsoft.Features/providers/{namespace}/features/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId {
    /// Subscription the feature is registered in.
    pub subscription_id: String,
    /// Resource provider namespace owning the feature (e.g. `Microsoft.Network`).
    pub provider_namespace: String,
    /// Feature name.
    pub name: String,
}

impl FeatureId {
    pub fn new(
        subscription_id: impl Into<String>,
        provider_namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            provider_namespace: provider_namespace.into(),
            name: name.into(),
        }
    }

    /// Parse a feature ID. Literal segments are matched case-sensitively.
    pub fn parse(input: &str) -> Result<Self, ResourceIdError> {
        let mut parsed = parse_segments(input, FEATURE_ID_PATTERN)?;
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            provider_namespace: parsed.take("providerNamespace")?,
            name: parsed.take("name")?,
        })
    }
}

impl ResourceIdFormatter for FeatureId {
    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/providers/Microsoft.Features/providers/{}/features/{}",
            self.subscription_id, self.provider_namespace, self.name
        )
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for FeatureId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUBSCRIPTION: &str = "12345678-1234-9876-4563-123456789012";

    #[test]
    fn formatter() {
        let actual = FeatureId::new(SUBSCRIPTION, "Microsoft.Test", "Feature1").id();
        assert_eq!(
            actual,
            "/subscriptions/12345678-1234-9876-4563-123456789012/providers/Microsoft.Features/providers/Microsoft.Test/features/Feature1"
        );
    }

    #[test]
    fn parse_table() {
        struct Case {
            input: &'static str,
            expected: Option<FeatureId>,
        }

        let cases = [
            // empty
            Case {
                input: "",
                expected: None,
            },
            // missing subscription
            Case {
                input: "/",
                expected: None,
            },
            // missing value for subscription
            Case {
                input: "/subscriptions/",
                expected: None,
            },
            // missing name
            Case {
                input: "/subscriptions/12345678-1234-9876-4563-123456789012/providers/Microsoft.Features/providers/provider1/",
                expected: None,
            },
            // missing value for name
            Case {
                input: "/subscriptions/12345678-1234-9876-4563-123456789012/providers/Microsoft.Features/providers/provider1/features/",
                expected: None,
            },
            // valid
            Case {
                input: "/subscriptions/12345678-1234-9876-4563-123456789012/providers/Microsoft.Features/providers/provider1/features/Feature1",
                expected: Some(FeatureId::new(SUBSCRIPTION, "provider1", "Feature1")),
            },
            // upper-cased
            Case {
                input: "/SUBSCRIPTIONS/12345678-1234-9876-4563-123456789012/PROVIDERS/MICROSOFT.FEATURES/PROVIDERS/PROVIDER1/FEATURES/FEATURE1",
                expected: None,
            },
        ];

        for case in cases {
            let actual = FeatureId::parse(case.input);
            match (&actual, &case.expected) {
                (Ok(got), Some(want)) => assert_eq!(got, want, "input {:?}", case.input),
                (Err(_), None) => {}
                (Ok(got), None) => panic!("expected an error for {:?}, got {got:?}", case.input),
                (Err(e), Some(_)) => panic!("expected a value for {:?}, got {e}", case.input),
            }
        }
    }

    #[test]
    fn lower_cased_provider_literal_is_rejected() {
        let input = "/subscriptions/sub/providers/microsoft.features/providers/ns/features/f";
        assert_eq!(
            FeatureId::parse(input),
            Err(ResourceIdError::UnexpectedSegment {
                expected: "Microsoft.Features",
                actual: "microsoft.features".to_string(),
            })
        );
    }

    #[test]
    fn round_trip() {
        let ids = [
            FeatureId::new(SUBSCRIPTION, "Microsoft.Network", "AllowTrafficManagerSubnetRouting"),
            FeatureId::new("sub", "Microsoft.Compute", "f.with.dots"),
        ];
        for id in ids {
            let parsed: FeatureId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }
}
