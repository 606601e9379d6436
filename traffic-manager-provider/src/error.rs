use serde::{Deserialize, Serialize};

/// Unified error type for all Traffic Manager resource operations.
///
/// Each variant includes a `provider` field identifying which backend produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Not Found
///
/// [`ResourceNotFound`](Self::ResourceNotFound) and
/// [`ResourceGroupNotFound`](Self::ResourceGroupNotFound) are the only API outcomes the
/// lifecycle handlers treat specially (see [`is_not_found`](Self::is_not_found)).
/// Every other failure is surfaced to the caller as-is; requests are never retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, etc.).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The service principal credentials are invalid or the token was rejected.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The resource already exists and must be imported before it can be managed.
    ResourceExists {
        /// Provider that produced the error.
        provider: String,
        /// ID of the conflicting resource.
        resource_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified resource was not found.
    ResourceNotFound {
        /// Provider that produced the error.
        provider: String,
        /// ID of the resource that was not found.
        resource_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The resource group containing the resource was not found.
    ResourceGroupNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Name of the missing resource group.
        resource_group: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A configuration value or request parameter is invalid.
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid attribute (e.g. `monitor_config.port`).
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// A resource ID string could not be parsed.
    InvalidResourceId {
        /// Provider that produced the error.
        provider: String,
        /// The offending input.
        input: String,
        /// Why parsing failed.
        detail: String,
    },

    /// The resource or its scope carries a management lock.
    ResourceLocked {
        /// Provider that produced the error.
        provider: String,
        /// ID of the locked resource.
        resource_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The subscription's resource quota has been exceeded.
    ///
    /// Unlike [`RateLimited`](Self::RateLimited), this is not a transient condition.
    QuotaExceeded {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request or the lifecycle operation timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The authenticated principal lacks permission for the requested operation.
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific variant.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::ResourceExists { .. }
                | Self::ResourceNotFound { .. }
                | Self::ResourceGroupNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::InvalidResourceId { .. }
                | Self::ResourceLocked { .. }
                | Self::QuotaExceeded { .. }
                | Self::PermissionDenied { .. }
        )
    }

    /// Whether the API reported that the resource (or its resource group) does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ResourceNotFound { .. } | Self::ResourceGroupNotFound { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Invalid credentials: {msg}")
                } else {
                    write!(f, "[{provider}] Invalid credentials")
                }
            }
            Self::ResourceExists {
                provider,
                resource_id,
                ..
            } => {
                write!(
                    f,
                    "[{provider}] A resource with the ID '{resource_id}' already exists - it must be imported into the state to be managed"
                )
            }
            Self::ResourceNotFound {
                provider,
                resource_id,
                ..
            } => {
                write!(f, "[{provider}] Resource '{resource_id}' not found")
            }
            Self::ResourceGroupNotFound {
                provider,
                resource_group,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(
                        f,
                        "[{provider}] Resource group '{resource_group}' not found: {msg}"
                    )
                } else {
                    write!(f, "[{provider}] Resource group '{resource_group}' not found")
                }
            }
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::InvalidResourceId {
                provider,
                input,
                detail,
            } => {
                write!(f, "[{provider}] Invalid resource ID '{input}': {detail}")
            }
            Self::ResourceLocked {
                provider,
                resource_id,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Resource '{resource_id}' is locked: {msg}")
                } else {
                    write!(f, "[{provider}] Resource '{resource_id}' is locked")
                }
            }
            Self::QuotaExceeded { provider, .. } => {
                write!(f, "[{provider}] Quota exceeded")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::PermissionDenied {
                provider,
                raw_message,
            } => {
                if let Some(msg) = raw_message {
                    write!(f, "[{provider}] Permission denied: {msg}")
                } else {
                    write!(f, "[{provider}] Permission denied")
                }
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
