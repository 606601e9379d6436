//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use traffic_manager_provider::{
    AzureEnvironment, DnsConfigBlock, MonitorConfigBlock, Profile, ProfileConfig,
    ProviderCredentials, ProviderError, Result, TrafficManagerApi, TrafficManagerProfileId,
    TrafficManagerProfileResource, create_profile_resource,
};

pub const SUBSCRIPTION_ID: &str = "12345678-1234-9876-4563-123456789012";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {:?}", res.as_ref().err());
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {:?}",
            format_args!($($msg)+),
            res.as_ref().err()
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 生成唯一的测试 profile 名称
pub fn generate_test_profile_name() -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("test-tm-{}", &uuid.to_string()[..8])
}

/// 最小可用的 profile 配置
pub fn sample_config(name: &str, resource_group: &str) -> ProfileConfig {
    ProfileConfig {
        name: name.to_string(),
        resource_group_name: resource_group.to_string(),
        traffic_routing_method: "Weighted".to_string(),
        dns_config: vec![DnsConfigBlock {
            relative_name: name.to_string(),
            ttl: 30,
        }],
        monitor_config: vec![MonitorConfigBlock {
            protocol: "HTTP".to_string(),
            port: 80,
            path: Some("/".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

// ============ Mock API ============

/// 记录的 API 调用
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Get(String),
    CreateOrUpdate(String, Profile),
    Update(String, Profile),
    Delete(String),
}

/// 内存中的 Traffic Manager API
#[derive(Default)]
pub struct MockTrafficManagerApi {
    profiles: Mutex<HashMap<String, Profile>>,
    calls: Mutex<Vec<ApiCall>>,
    get_error: Mutex<Option<ProviderError>>,
    delete_error: Mutex<Option<ProviderError>>,
    delay: Mutex<Option<Duration>>,
}

impl MockTrafficManagerApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    pub async fn insert(&self, id: &TrafficManagerProfileId, profile: Profile) {
        self.profiles
            .lock()
            .await
            .insert(id.to_string(), with_computed(id, profile));
    }

    pub async fn stored(&self, id: &TrafficManagerProfileId) -> Option<Profile> {
        self.profiles.lock().await.get(&id.to_string()).cloned()
    }

    pub async fn set_get_error(&self, error: Option<ProviderError>) {
        *self.get_error.lock().await = error;
    }

    pub async fn set_delete_error(&self, error: Option<ProviderError>) {
        *self.delete_error.lock().await = error;
    }

    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().await = delay;
    }

    async fn wait(&self) {
        let delay = *self.delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn not_found(id: &TrafficManagerProfileId) -> ProviderError {
        ProviderError::ResourceNotFound {
            provider: "mock".to_string(),
            resource_id: id.to_string(),
            raw_message: Some("The Resource was not found.".to_string()),
        }
    }
}

/// 补齐服务端计算字段（id、type、fqdn）
fn with_computed(id: &TrafficManagerProfileId, mut profile: Profile) -> Profile {
    profile.id = Some(id.to_string());
    profile.name = Some(id.name.clone());
    profile.resource_type = Some("Microsoft.Network/trafficManagerProfiles".to_string());
    if let Some(dns) = profile
        .properties
        .as_mut()
        .and_then(|p| p.dns_config.as_mut())
    {
        dns.fqdn = dns
            .relative_name
            .as_ref()
            .map(|name| format!("{name}.trafficmanager.net"));
    }
    profile
}

/// PATCH 语义：只覆盖请求中出现的字段
fn merge(existing: &mut Profile, patch: &Profile) {
    if patch.tags.is_some() {
        existing.tags.clone_from(&patch.tags);
    }
    let Some(changes) = &patch.properties else {
        return;
    };
    let props = existing.properties.get_or_insert_with(Default::default);
    if changes.profile_status.is_some() {
        props.profile_status = changes.profile_status;
    }
    if changes.traffic_routing_method.is_some() {
        props.traffic_routing_method = changes.traffic_routing_method;
    }
    if changes.dns_config.is_some() {
        props.dns_config.clone_from(&changes.dns_config);
    }
    if changes.monitor_config.is_some() {
        props.monitor_config.clone_from(&changes.monitor_config);
    }
    if changes.traffic_view_enrollment_status.is_some() {
        props.traffic_view_enrollment_status = changes.traffic_view_enrollment_status;
    }
    if changes.max_return.is_some() {
        props.max_return = changes.max_return;
    }
}

#[async_trait]
impl TrafficManagerApi for MockTrafficManagerApi {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn validate_credentials(&self) -> Result<bool> {
        Ok(true)
    }

    async fn get(&self, id: &TrafficManagerProfileId) -> Result<Profile> {
        self.calls.lock().await.push(ApiCall::Get(id.to_string()));
        self.wait().await;
        if let Some(error) = self.get_error.lock().await.clone() {
            return Err(error);
        }
        self.profiles
            .lock()
            .await
            .get(&id.to_string())
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn create_or_update(
        &self,
        id: &TrafficManagerProfileId,
        profile: &Profile,
    ) -> Result<Profile> {
        self.calls
            .lock()
            .await
            .push(ApiCall::CreateOrUpdate(id.to_string(), profile.clone()));
        self.wait().await;
        let stored = with_computed(id, profile.clone());
        self.profiles
            .lock()
            .await
            .insert(id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &TrafficManagerProfileId, profile: &Profile) -> Result<Profile> {
        self.calls
            .lock()
            .await
            .push(ApiCall::Update(id.to_string(), profile.clone()));
        self.wait().await;
        let mut profiles = self.profiles.lock().await;
        let existing = profiles
            .get_mut(&id.to_string())
            .ok_or_else(|| Self::not_found(id))?;
        merge(existing, profile);
        *existing = with_computed(id, existing.clone());
        Ok(existing.clone())
    }

    async fn delete(&self, id: &TrafficManagerProfileId) -> Result<()> {
        self.calls.lock().await.push(ApiCall::Delete(id.to_string()));
        self.wait().await;
        if let Some(error) = self.delete_error.lock().await.clone() {
            return Err(error);
        }
        self.profiles
            .lock()
            .await
            .remove(&id.to_string())
            .map(|_| ())
            .ok_or_else(|| Self::not_found(id))
    }
}

/// 基于 mock 的 resource
pub fn mock_resource(api: &Arc<MockTrafficManagerApi>) -> TrafficManagerProfileResource {
    let api: Arc<dyn TrafficManagerApi> = api.clone();
    TrafficManagerProfileResource::new(api, SUBSCRIPTION_ID)
}

// ============ Live Azure ============

/// 测试上下文 - 封装 resource 和测试资源组
pub struct TestContext {
    pub resource: TrafficManagerProfileResource,
    pub resource_group: String,
}

impl TestContext {
    /// 创建 Azure 测试上下文
    pub fn azure() -> Option<Self> {
        let credentials = ProviderCredentials::from_env().ok()?;
        let resource_group = env::var("TEST_RESOURCE_GROUP").ok()?;
        let environment = env::var("ARM_ENVIRONMENT")
            .ok()
            .and_then(|name| AzureEnvironment::from_name(&name))
            .unwrap_or_default();
        let resource = create_profile_resource(credentials, environment).ok()?;

        Some(Self {
            resource,
            resource_group,
        })
    }

    /// 清理测试 profile
    pub async fn cleanup_profile(&self, id: &str) {
        let _ = self.resource.delete(id).await;
    }
}
