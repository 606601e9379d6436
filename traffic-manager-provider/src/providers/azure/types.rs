//! ARM / Entra ID 接口私有类型

use serde::{Deserialize, Deserializer};

/// ARM 错误响应体：`{"error": {"code": "...", "message": "..."}}`
#[derive(Debug, Deserialize)]
pub struct ArmErrorResponse {
    pub error: Option<ArmErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ArmErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Entra ID 令牌响应
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// 有效期（秒）。v1 端点返回字符串，v2 端点返回数字
    #[serde(deserialize_with = "deserialize_seconds")]
    pub expires_in: i64,
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

/// Entra ID 错误响应
#[derive(Debug, Deserialize)]
pub struct AadErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .parse()
            .map_err(|e| Error::custom(format!("Invalid expires_in value {s:?}: {e}"))),
    }
}
