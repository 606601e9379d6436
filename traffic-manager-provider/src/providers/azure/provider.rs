//! Azure `TrafficManagerApi` trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::resource_id::TrafficManagerProfileId;
use crate::traits::{ErrorContext, ProviderErrorMapper, TrafficManagerApi};
use crate::types::Profile;

use super::{AZURE_PROVIDER_ID, AzureProvider};

impl AzureProvider {
    /// profile 的 ARM 路径，各段均做 URL 编码
    pub(crate) fn profile_path(id: &TrafficManagerProfileId) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Network/trafficManagerProfiles/{}",
            urlencoding::encode(&id.subscription_id),
            urlencoding::encode(&id.resource_group),
            urlencoding::encode(&id.name)
        )
    }
}

#[async_trait]
impl TrafficManagerApi for AzureProvider {
    fn id(&self) -> &'static str {
        AZURE_PROVIDER_ID
    }

    async fn validate_credentials(&self) -> Result<bool> {
        let path = format!(
            "/subscriptions/{}",
            urlencoding::encode(&self.subscription_id)
        );
        match self
            .arm_get::<serde_json::Value>(&path, ErrorContext::default())
            .await
        {
            Ok(_) => Ok(true),
            Err(ProviderError::InvalidCredentials { .. }) => Ok(false),
            Err(e) => {
                log::warn!("[{}] Credential validation failed: {e}", self.provider_name());
                Ok(false)
            }
        }
    }

    async fn get(&self, id: &TrafficManagerProfileId) -> Result<Profile> {
        self.arm_get(&Self::profile_path(id), ErrorContext::for_profile(id))
            .await
    }

    async fn create_or_update(
        &self,
        id: &TrafficManagerProfileId,
        profile: &Profile,
    ) -> Result<Profile> {
        log::info!("[{}] Creating/updating profile {id}", self.provider_name());
        self.arm_put(&Self::profile_path(id), profile, ErrorContext::for_profile(id))
            .await
    }

    async fn update(&self, id: &TrafficManagerProfileId, profile: &Profile) -> Result<Profile> {
        log::info!("[{}] Patching profile {id}", self.provider_name());
        self.arm_patch(&Self::profile_path(id), profile, ErrorContext::for_profile(id))
            .await
    }

    async fn delete(&self, id: &TrafficManagerProfileId) -> Result<()> {
        log::info!("[{}] Deleting profile {id}", self.provider_name());
        self.arm_delete(&Self::profile_path(id), ErrorContext::for_profile(id))
            .await
    }
}
