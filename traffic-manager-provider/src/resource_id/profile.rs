use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ResourceIdError, ResourceIdFormatter, Segment, parse_segments};

const PROFILE_ID_PATTERN: &[Segment] = &[
    Segment::Static("subscriptions"),
    Segment::Value("subscriptionId"),
    Segment::OneOf(&["resourceGroups", "resourcegroups"]),
    Segment::Value("resourceGroup"),
    Segment::Static("providers"),
    Segment::Static("Microsoft.Network"),
    Segment::Static("trafficManagerProfiles"),
    Segment::Value("name"),
];

/// ID of a Traffic Manager profile; this is the state ID of the managed resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrafficManagerProfileId {
    pub subscription_id: String,
    pub resource_group: String,
    pub name: String,
}

impl TrafficManagerProfileId {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            name: name.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ResourceIdError> {
        let mut parsed = parse_segments(input, PROFILE_ID_PATTERN)?;
        Ok(Self {
            subscription_id: parsed.take("subscriptionId")?,
            resource_group: parsed.take("resourceGroup")?,
            name: parsed.take("name")?,
        })
    }
}

impl ResourceIdFormatter for TrafficManagerProfileId {
    fn id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/trafficManagerProfiles/{}",
            self.subscription_id, self.resource_group, self.name
        )
    }
}

impl fmt::Display for TrafficManagerProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for TrafficManagerProfileId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
