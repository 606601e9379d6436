//! Entra ID 客户端凭证授权（OAuth2 client credentials）

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::error::{ProviderError, Result};
use crate::http_client::send_once;
use crate::providers::common::join_url;
use crate::traits::{ProviderErrorMapper, RawApiError};
use crate::types::ProviderCredentials;
use crate::utils::log_sanitizer::{mask_secret, redact_token_payload};

use super::AzureProvider;
use super::types::{AadErrorResponse, TokenResponse};

/// 提前刷新令牌的时间余量（秒）
const TOKEN_REFRESH_MARGIN_SECS: i64 = 300;

/// 令牌来源
pub(crate) enum TokenSource {
    /// 服务主体 + 客户端密钥
    ClientSecret(ProviderCredentials),
    /// 调用方提供的固定令牌
    Static(String),
}

/// 缓存的访问令牌
#[derive(Debug, Clone)]
pub(crate) struct CachedToken {
    pub access_token: String,
    /// `None` 表示永不过期（固定令牌）
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// 距离过期还有足够余量时视为可用
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|expires_at| {
            now + TimeDelta::seconds(TOKEN_REFRESH_MARGIN_SECS) < expires_at
        })
    }
}

/// 读锁命中则直接返回；否则持写锁再检查一次，只有一个调用方会去刷新
async fn cached_or_refresh<F, Fut>(
    cache: &RwLock<Option<CachedToken>>,
    refresh: F,
) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<CachedToken>>,
{
    {
        let cached = cache.read().await;
        if let Some(token) = cached.as_ref()
            && token.is_fresh(Utc::now())
        {
            return Ok(token.access_token.clone());
        }
    }

    let mut guard = cache.write().await;
    if let Some(token) = guard.as_ref()
        && token.is_fresh(Utc::now())
    {
        return Ok(token.access_token.clone());
    }

    let token = refresh().await?;
    let access_token = token.access_token.clone();
    *guard = Some(token);
    Ok(access_token)
}

impl AzureProvider {
    /// 获取可用的访问令牌（优先使用缓存）
    pub(crate) async fn access_token(&self) -> Result<String> {
        cached_or_refresh(&self.token_cache, || async {
            match &self.token_source {
                TokenSource::Static(token) => Ok(CachedToken {
                    access_token: token.clone(),
                    expires_at: None,
                }),
                TokenSource::ClientSecret(credentials) => self.request_token(credentials).await,
            }
        })
        .await
    }

    /// 向 Entra ID 申请新令牌
    async fn request_token(&self, credentials: &ProviderCredentials) -> Result<CachedToken> {
        let url = join_url(
            &self.login_endpoint,
            &format!(
                "/{}/oauth2/v2.0/token",
                urlencoding::encode(&credentials.tenant_id)
            ),
        );
        let scope = format!("{}/.default", self.management_endpoint.trim_end_matches('/'));

        log::info!(
            "[{}] Requesting access token for client {} (tenant {})",
            self.provider_name(),
            credentials.client_id,
            credentials.tenant_id
        );
        log::debug!(
            "[{}] Client secret: {}",
            self.provider_name(),
            mask_secret(&credentials.client_secret)
        );

        let request = self.client.post(&url).form(&[
            ("grant_type", "client_credentials"),
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("scope", scope.as_str()),
        ]);

        let response = send_once(request, self.provider_name(), "POST", &url).await?;
        if !response.is_success() {
            return Err(self.token_error(response.status, &response.body));
        }

        let token: TokenResponse = serde_json::from_str(&response.body).map_err(|e| {
            log::error!(
                "[{}] Token response parse failed: {e}; body: {}",
                self.provider_name(),
                redact_token_payload(&response.body)
            );
            self.parse_error(e)
        })?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Some(Utc::now() + TimeDelta::seconds(token.expires_in)),
        })
    }

    /// 将令牌端点的错误映射为统一错误
    fn token_error(&self, status: u16, response_text: &str) -> ProviderError {
        let Ok(error) = serde_json::from_str::<AadErrorResponse>(response_text) else {
            return self.unknown_error(
                RawApiError::new(format!(
                    "token request failed with HTTP {status}: {}",
                    redact_token_payload(response_text)
                ))
                .status(status),
            );
        };

        let message = error
            .error_description
            .unwrap_or_else(|| error.error.clone());
        match (status, error.error.as_str()) {
            (
                400 | 401,
                "invalid_client" | "unauthorized_client" | "invalid_request" | "invalid_grant",
            ) => {
                log::warn!("[{}] Token request rejected: {message}", self.provider_name());
                ProviderError::InvalidCredentials {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(message),
                }
            }
            _ => self.unknown_error(RawApiError::with_code(error.error, message).status(status)),
        }
    }
}
