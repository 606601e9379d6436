//! Lifecycle handlers for the `azurerm_traffic_manager_profile` resource.
//!
//! [`TrafficManagerProfileResource`] turns configuration ([`ProfileConfig`]) into
//! Traffic Manager API calls and API responses back into state
//! ([`ResourceState`]). Every operation validates locally first, issues
//! single-shot requests through a [`TrafficManagerApi`], and is bounded by the
//! matching [`ResourceTimeouts`] entry.

mod diff;
pub mod expand;
pub mod flatten;
mod model;
pub mod schema;
pub mod tags;
pub mod validate;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub use diff::ProfileDiff;
pub use model::{
    CustomHeaderBlock, DnsConfigBlock, MonitorConfigBlock, ProfileConfig, ResourceState,
};

use crate::error::{ProviderError, Result};
use crate::resource_id::TrafficManagerProfileId;
use crate::traits::TrafficManagerApi;
use crate::types::{Profile, ProfileProperties, ResourceTimeouts};

use expand::{
    expand_dns_config, expand_monitor_config, expand_profile, expand_profile_status,
    expand_routing_method, expand_traffic_view,
};
use flatten::flatten_profile;
use tags::expand_tags;
use validate::validate_profile;

/// Manages Traffic Manager profiles in one subscription.
pub struct TrafficManagerProfileResource {
    api: Arc<dyn TrafficManagerApi>,
    subscription_id: String,
    timeouts: ResourceTimeouts,
}

impl TrafficManagerProfileResource {
    pub fn new(api: Arc<dyn TrafficManagerApi>, subscription_id: impl Into<String>) -> Self {
        Self {
            api,
            subscription_id: subscription_id.into(),
            timeouts: ResourceTimeouts::default(),
        }
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: ResourceTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn timeouts(&self) -> &ResourceTimeouts {
        &self.timeouts
    }

    fn provider(&self) -> &'static str {
        self.api.id()
    }

    // ============ Lifecycle ============

    /// Creates a profile; fails if one with the same ID already exists.
    pub async fn create(&self, config: &ProfileConfig) -> Result<ResourceState> {
        self.bounded("create", self.timeouts.create, self.create_inner(config))
            .await
    }

    /// Reads a profile by ID. `Ok(None)` means it no longer exists.
    pub async fn read(&self, id: &str) -> Result<Option<ResourceState>> {
        self.bounded("read", self.timeouts.read, async {
            let id = self.parse_id(id)?;
            self.read_inner(&id).await
        })
        .await
    }

    /// Applies the changes between `old` and `new` with a sparse `PATCH`.
    pub async fn update(
        &self,
        id: &str,
        old: &ProfileConfig,
        new: &ProfileConfig,
    ) -> Result<ResourceState> {
        self.bounded("update", self.timeouts.update, self.update_inner(id, old, new))
            .await
    }

    /// Deletes a profile. Deleting a missing profile succeeds.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.bounded("delete", self.timeouts.delete, self.delete_inner(id))
            .await
    }

    /// Brings an existing profile under management.
    pub async fn import(&self, id: &str) -> Result<ResourceState> {
        self.bounded("import", self.timeouts.read, async {
            let parsed = self.parse_id(id)?;
            self.read_inner(&parsed)
                .await?
                .ok_or_else(|| self.not_found(&parsed))
        })
        .await
    }

    // ============ Handlers ============

    async fn create_inner(&self, config: &ProfileConfig) -> Result<ResourceState> {
        log::info!(
            "[{}] preparing arguments for Traffic Manager Profile creation",
            self.provider()
        );
        validate_profile(config)?;

        let id = TrafficManagerProfileId::new(
            self.subscription_id.clone(),
            config.resource_group_name.clone(),
            config.name.clone(),
        );

        match self.api.get(&id).await {
            Ok(_) => {
                return Err(ProviderError::ResourceExists {
                    provider: self.provider().to_string(),
                    resource_id: id.to_string(),
                    raw_message: None,
                });
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => {
                return Err(ProviderError::Unknown {
                    provider: self.provider().to_string(),
                    raw_code: None,
                    raw_message: format!(
                        "checking for presence of existing Traffic Manager Profile {:?} (Resource Group {:?}): {e}",
                        id.name, id.resource_group
                    ),
                });
            }
        }

        let profile = expand_profile(config)?;
        self.api.create_or_update(&id, &profile).await?;

        self.read_inner(&id)
            .await?
            .ok_or_else(|| self.not_found(&id))
    }

    async fn read_inner(&self, id: &TrafficManagerProfileId) -> Result<Option<ResourceState>> {
        match self.api.get(id).await {
            Ok(profile) => Ok(Some(ResourceState {
                id: id.to_string(),
                attributes: flatten_profile(id, &profile),
            })),
            Err(e) if e.is_not_found() => {
                log::info!(
                    "[{}] Traffic Manager Profile {id} was not found, removing from state",
                    self.provider()
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn update_inner(
        &self,
        id: &str,
        old: &ProfileConfig,
        new: &ProfileConfig,
    ) -> Result<ResourceState> {
        let id = self.parse_id(id)?;
        validate_profile(new)?;

        let diff = ProfileDiff::between(old, new);
        if let Some(path) = diff.replacement_paths().first() {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider().to_string(),
                param: path.clone(),
                detail: format!("changing `{path}` requires the profile to be replaced"),
            });
        }

        let patch = build_patch(&diff, new)?;
        log::debug!(
            "[{}] updating {id}, changed: {:?}",
            self.provider(),
            diff.changed().collect::<Vec<_>>()
        );
        self.api.update(&id, &patch).await?;

        self.read_inner(&id)
            .await?
            .ok_or_else(|| self.not_found(&id))
    }

    async fn delete_inner(&self, id: &str) -> Result<()> {
        let id = self.parse_id(id)?;
        match self.api.delete(&id).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    // ============ Helpers ============

    fn parse_id(&self, id: &str) -> Result<TrafficManagerProfileId> {
        TrafficManagerProfileId::parse(id).map_err(|e| e.into_provider_error(id))
    }

    fn not_found(&self, id: &TrafficManagerProfileId) -> ProviderError {
        ProviderError::ResourceNotFound {
            provider: self.provider().to_string(),
            resource_id: id.to_string(),
            raw_message: None,
        }
    }

    /// Runs `fut` under `limit` and logs the failure at a level matching its kind.
    async fn bounded<T>(
        &self,
        operation: &'static str,
        limit: Duration,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let result = match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: self.provider().to_string(),
                detail: format!(
                    "{operation} did not complete within {}",
                    format_duration(limit)
                ),
            }),
        };

        if let Err(e) = &result {
            if e.is_expected() {
                log::warn!("[{}] {operation} failed: {e}", self.provider());
            } else {
                log::error!("[{}] {operation} failed: {e}", self.provider());
            }
        }
        result
    }
}

/// Sparse `PATCH` body holding only the changed attributes.
fn build_patch(diff: &ProfileDiff, new: &ProfileConfig) -> Result<Profile> {
    let mut properties = ProfileProperties::default();
    let mut patch = Profile::default();

    if diff.has_change("tags") {
        patch.tags = expand_tags(&new.tags);
    }
    if diff.has_change("profile_status")
        && let Some(status) = &new.profile_status
    {
        properties.profile_status = Some(expand_profile_status(status)?);
    }
    if diff.has_change("traffic_routing_method") {
        properties.traffic_routing_method =
            Some(expand_routing_method(&new.traffic_routing_method)?);
    }
    if diff.has_change("max_return") {
        properties.max_return = new.max_return;
    }
    if diff.has_change("dns_config") {
        properties.dns_config = Some(expand_dns_config(&new.dns_config));
    }
    if diff.has_change("monitor_config") {
        properties.monitor_config = Some(expand_monitor_config(&new.monitor_config)?);
    }
    if diff.has_change("traffic_view_enabled") {
        properties.traffic_view_enrollment_status =
            Some(expand_traffic_view(new.traffic_view_enabled.unwrap_or(false)));
    }

    patch.properties = Some(properties);
    Ok(patch)
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrafficViewEnrollmentStatus;

    fn config() -> ProfileConfig {
        ProfileConfig {
            name: "p".into(),
            resource_group_name: "rg".into(),
            traffic_routing_method: "Weighted".into(),
            dns_config: vec![DnsConfigBlock {
                relative_name: "p".into(),
                ttl: 30,
            }],
            monitor_config: vec![MonitorConfigBlock {
                protocol: "HTTP".into(),
                port: 80,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn patch_contains_only_changes() {
        let old = config();
        let mut new = config();
        new.dns_config[0].ttl = 120;
        let patch = build_patch(&ProfileDiff::between(&old, &new), &new).unwrap();
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "properties": { "dnsConfig": { "relativeName": "p", "ttl": 120 } } })
        );
    }

    #[test]
    fn patch_disables_traffic_view_when_removed() {
        let mut old = config();
        old.traffic_view_enabled = Some(true);
        let new = config();
        let patch = build_patch(&ProfileDiff::between(&old, &new), &new).unwrap();
        assert_eq!(
            patch.properties.unwrap().traffic_view_enrollment_status,
            Some(TrafficViewEnrollmentStatus::Disabled)
        );
    }

    #[test]
    fn patch_sends_empty_tags_to_clear() {
        let mut old = config();
        old.tags.insert("env".into(), "test".into());
        let new = config();
        let patch = build_patch(&ProfileDiff::between(&old, &new), &new).unwrap();
        assert_eq!(patch.tags, Some(Default::default()));
    }

    #[test]
    fn durations_format_as_minutes() {
        assert_eq!(format_duration(Duration::from_secs(30 * 60)), "30m");
        assert_eq!(format_duration(Duration::from_secs(90)), "90s");
        assert_eq!(format_duration(Duration::from_millis(50)), "0s");
    }
}
