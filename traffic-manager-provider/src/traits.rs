use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::resource_id::TrafficManagerProfileId;
use crate::types::Profile;

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// ARM 错误码，例如 `ResourceNotFound`
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
    /// HTTP 状态码（错误码无法识别时用于兜底）
    pub http_status: Option<u16>,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            http_status: None,
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            http_status: None,
        }
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 资源 ID（用于 `ResourceNotFound` / `ResourceExists` 等错误）
    pub resource_id: Option<String>,
    /// 资源组（用于 `ResourceGroupNotFound`）
    pub resource_group: Option<String>,
}

impl ErrorContext {
    pub fn for_profile(id: &TrafficManagerProfileId) -> Self {
        Self {
            resource_id: Some(id.to_string()),
            resource_group: Some(id.resource_group.clone()),
        }
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Traffic Manager profile API.
///
/// The lifecycle handlers in [`TrafficManagerProfileResource`](crate::TrafficManagerProfileResource)
/// only talk to this trait, so any backend (the ARM client, or an in-memory fake in tests)
/// can drive them. Every method is a single request; implementations must not retry.
#[async_trait]
pub trait TrafficManagerApi: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 验证凭证是否有效
    async fn validate_credentials(&self) -> Result<bool>;

    /// Fetch a profile. A missing profile is reported as
    /// [`ProviderError::ResourceNotFound`].
    async fn get(&self, id: &TrafficManagerProfileId) -> Result<Profile>;

    /// Create or fully replace a profile (`PUT`).
    async fn create_or_update(
        &self,
        id: &TrafficManagerProfileId,
        profile: &Profile,
    ) -> Result<Profile>;

    /// Apply a sparse update to an existing profile (`PATCH`).
    async fn update(&self, id: &TrafficManagerProfileId, profile: &Profile) -> Result<Profile>;

    /// Delete a profile. A missing profile is reported as
    /// [`ProviderError::ResourceNotFound`].
    async fn delete(&self, id: &TrafficManagerProfileId) -> Result<()>;
}
