//! Azure Resource Manager error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::{AZURE_PROVIDER_ID, AzureProvider};

const UNKNOWN: &str = "<unknown>";

/// ARM error code mapping
/// Reference: <https://learn.microsoft.com/azure/azure-resource-manager/troubleshooting/common-deployment-errors>
impl ProviderErrorMapper for AzureProvider {
    fn provider_name(&self) -> &'static str {
        AZURE_PROVIDER_ID
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let resource_id = || context.resource_id.clone().unwrap_or_else(|| UNKNOWN.to_string());

        match raw.code.as_deref() {
            // 资源不存在
            Some("ResourceNotFound" | "NotFound" | "ParentResourceNotFound") => {
                ProviderError::ResourceNotFound {
                    provider,
                    resource_id: resource_id(),
                    raw_message: Some(raw.message),
                }
            }

            // 资源组不存在
            Some("ResourceGroupNotFound") => ProviderError::ResourceGroupNotFound {
                provider,
                resource_group: context
                    .resource_group
                    .clone()
                    .unwrap_or_else(|| UNKNOWN.to_string()),
                raw_message: Some(raw.message),
            },

            // 认证失败
            Some(
                "AuthenticationFailed"
                | "InvalidAuthenticationToken"
                | "InvalidAuthenticationTokenAudience"
                | "InvalidAuthenticationTokenTenant"
                | "ExpiredAuthenticationToken",
            ) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },

            // 权限不足
            Some("AuthorizationFailed" | "LinkedAuthorizationFailed") => {
                ProviderError::PermissionDenied {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // 订阅无效
            Some("InvalidSubscriptionId" | "SubscriptionNotFound") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: "subscription_id".to_string(),
                    detail: raw.message,
                }
            }

            // 管理锁
            Some("ScopeLocked") => ProviderError::ResourceLocked {
                provider,
                resource_id: resource_id(),
                raw_message: Some(raw.message),
            },

            Some("Conflict") => ProviderError::ResourceExists {
                provider,
                resource_id: resource_id(),
                raw_message: Some(raw.message),
            },

            Some("QuotaExceeded") => ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            },

            Some("TooManyRequests" | "SubscriptionRequestsThrottled") => {
                ProviderError::RateLimited {
                    provider,
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // 请求参数错误
            Some(
                "BadRequest"
                | "InvalidParameter"
                | "InvalidRequestContent"
                | "InvalidRequestFormat"
                | "BadRequestFormat",
            ) => ProviderError::InvalidParameter {
                provider,
                param: "request".to_string(),
                detail: raw.message,
            },

            // 未识别的错误码，按 HTTP 状态码兜底
            _ => self.map_status(raw, &context),
        }
    }
}

impl AzureProvider {
    fn map_status(&self, raw: RawApiError, context: &ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        let resource_id = || context.resource_id.clone().unwrap_or_else(|| UNKNOWN.to_string());

        match raw.http_status {
            Some(404) => ProviderError::ResourceNotFound {
                provider,
                resource_id: resource_id(),
                raw_message: Some(raw.message),
            },
            Some(401) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },
            Some(403) => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },
            Some(409) => ProviderError::ResourceExists {
                provider,
                resource_id: resource_id(),
                raw_message: Some(raw.message),
            },
            Some(400) => ProviderError::InvalidParameter {
                provider,
                param: "request".to_string(),
                detail: raw.message,
            },
            _ => self.unknown_error(raw),
        }
    }
}
