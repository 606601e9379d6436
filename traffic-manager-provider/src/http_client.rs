//! Single-shot HTTP transport
//!
//! Shared by the ARM client and the token exchange. Callers build the
//! `RequestBuilder` (URL, auth, body); this module sends it once, logs the
//! exchange and turns transport failures into [`ProviderError`]s.
//!
//! Throttling (429) and gateway failures (502-504) are surfaced as
//! [`ProviderError::RateLimited`] / [`ProviderError::NetworkError`]. Nothing is
//! retried here or anywhere else in the crate.

use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// ARM correlation header echoed on every response
const REQUEST_ID_HEADER: &str = "x-ms-request-id";

/// A response that made it past the transport layer.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// `x-ms-request-id`, when the service sent one
    pub request_id: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send `request` once.
///
/// `method` and `url` are only used for logging.
pub async fn send_once(
    request: RequestBuilder,
    provider: &str,
    method: &str,
    url: &str,
) -> Result<HttpResponse, ProviderError> {
    log::debug!("[{provider}] {method} {url}");

    let response = request
        .send()
        .await
        .map_err(|e| transport_error(provider, &e))?;

    let status = response.status().as_u16();
    let request_id = header_str(response.headers(), REQUEST_ID_HEADER);
    log::debug!(
        "[{provider}] {method} {url} -> {status} (request id: {})",
        request_id.as_deref().unwrap_or("-")
    );

    if status == 429 || matches!(status, 502..=504) {
        return Err(throttled_or_gateway(provider, status, response).await);
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;
    log::debug!("[{provider}] Response Body: {}", truncate_for_log(&body));

    Ok(HttpResponse {
        status,
        body,
        request_id,
    })
}

/// Decode a JSON body into `T`.
pub fn decode_json<T>(body: &str, provider: &str) -> Result<T, ProviderError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!(
            "[{provider}] JSON parse failed: {e}; body: {}",
            truncate_for_log(body)
        );
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    })
}

fn transport_error(provider: &str, e: &reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn throttled_or_gateway(provider: &str, status: u16, response: Response) -> ProviderError {
    // 必须在读取 body 之前取出
    let retry_after = header_str(response.headers(), "retry-after").and_then(|v| v.parse().ok());
    let body = response.text().await.unwrap_or_default();

    if status == 429 {
        log::warn!("[{provider}] Throttled (HTTP 429), retry_after={retry_after:?}");
        ProviderError::RateLimited {
            provider: provider.to_string(),
            retry_after,
            raw_message: Some(body),
        }
    } else {
        log::warn!("[{provider}] Gateway failure (HTTP {status})");
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct Named {
        name: String,
    }

    #[test]
    fn decode_json_valid() {
        let result: Result<Named, ProviderError> = decode_json(r#"{"name":"tm"}"#, "test");
        assert!(
            matches!(&result, Ok(Named { name }) if name == "tm"),
            "unexpected decode result: {result:?}"
        );
    }

    #[test]
    fn decode_json_invalid() {
        let result: Result<Named, ProviderError> = decode_json("<html>", "test");
        assert!(
            matches!(&result, Err(ProviderError::ParseError { .. })),
            "unexpected decode result: {result:?}"
        );
    }

    #[test]
    fn success_range() {
        let response = |status| HttpResponse {
            status,
            body: String::new(),
            request_id: None,
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(404).is_success());
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let client = reqwest::Client::new();
        // 端口 9 (discard) 在测试环境中不会有监听者
        let url = "http://127.0.0.1:9/";
        let result = send_once(client.get(url), "test", "GET", url).await;
        assert!(
            matches!(
                &result,
                Err(ProviderError::NetworkError { .. } | ProviderError::Timeout { .. })
            ),
            "unexpected result: {result:?}"
        );
    }
}
