//! ARM HTTP 请求方法

use reqwest::{Method, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, Result};
use crate::http_client::{HttpResponse, decode_json, send_once};
use crate::providers::common::join_url;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::AzureProvider;
use super::types::ArmErrorResponse;

impl AzureProvider {
    // ==================== 辅助方法 ====================

    /// 统一处理 ARM 响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        // 尝试解析结构化错误
        if let Ok(ArmErrorResponse {
            error: Some(detail),
        }) = serde_json::from_str::<ArmErrorResponse>(response_text)
        {
            let message = detail
                .message
                .unwrap_or_else(|| format!("HTTP {status}"));
            let raw = match detail.code {
                Some(code) => RawApiError::with_code(code, message),
                None => RawApiError::new(message),
            };
            return Err(self.map_error(raw.status(status), ctx));
        }

        // 回退到状态码映射（例如 404 且响应体为空）
        Err(self.map_error(
            RawApiError::new(format!("HTTP {status}: {response_text}")).status(status),
            ctx,
        ))
    }

    /// 构建带认证头的请求
    async fn authorized(&self, method: Method, path: &str) -> Result<(RequestBuilder, String)> {
        let token = self.access_token().await?;
        let url = format!(
            "{}?api-version={}",
            join_url(&self.management_endpoint, path),
            urlencoding::encode(&self.api_version)
        );
        let request = self
            .client
            .request(method, &url)
            .bearer_auth(token)
            .header("x-ms-client-request-id", uuid::Uuid::new_v4().to_string());
        Ok((request, url))
    }

    /// 发送请求并处理错误
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        ctx: ErrorContext,
    ) -> Result<HttpResponse> {
        let (mut request, url) = self.authorized(method.clone(), path).await?;
        if let Some(payload) = body {
            log::debug!("[{}] Request Body: {payload}", self.provider_name());
            request = request
                .header("Content-Type", "application/json")
                .body(payload);
        }

        let response = send_once(request, self.provider_name(), method.as_str(), &url).await?;
        if let Err(e) = self.handle_response_error(response.status, &response.body, ctx) {
            log::debug!(
                "[{}] {method} {path} failed (request id: {})",
                self.provider_name(),
                response.request_id.as_deref().unwrap_or("-")
            );
            return Err(e);
        }
        Ok(response)
    }

    fn serialize_body<B: Serialize>(&self, body: &B) -> Result<String> {
        serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
            provider: self.provider_name().to_string(),
            detail: e.to_string(),
        })
    }

    // ==================== HTTP 方法 ====================

    /// 执行 GET 请求
    pub(crate) async fn arm_get<T>(&self, path: &str, ctx: ErrorContext) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.send(Method::GET, path, None, ctx).await?;
        decode_json(&response.body, self.provider_name())
    }

    /// 执行 PUT 请求（创建或整体替换）
    pub(crate) async fn arm_put<T, B>(&self, path: &str, body: &B, ctx: ErrorContext) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        let payload = self.serialize_body(body)?;
        let response = self.send(Method::PUT, path, Some(payload), ctx).await?;
        decode_json(&response.body, self.provider_name())
    }

    /// 执行 PATCH 请求（部分更新）
    pub(crate) async fn arm_patch<T, B>(
        &self,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
        B: Serialize,
    {
        let payload = self.serialize_body(body)?;
        let response = self.send(Method::PATCH, path, Some(payload), ctx).await?;
        decode_json(&response.body, self.provider_name())
    }

    /// 执行 DELETE 请求（200/202/204 均视为成功）
    pub(crate) async fn arm_delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        let status = self.send(Method::DELETE, path, None, ctx).await?.status;
        if matches!(status, 200 | 202 | 204) {
            Ok(())
        } else {
            Err(self.unknown_error(
                RawApiError::new(format!("unexpected status {status} for DELETE {path}"))
                    .status(status),
            ))
        }
    }
}
