//! Log sanitization utilities
//!
//! Keeps bearer tokens and client secrets out of debug/error logs and bounds
//! the size of logged response bodies.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 512;

/// Number of leading characters of a secret that stay visible.
const VISIBLE_PREFIX: usize = 4;

/// MSRV-compatible replacement for `str::floor_char_boundary` (stable since 1.91.0).
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit,
/// otherwise returns the first `TRUNCATE_LIMIT` characters with a suffix
/// indicating the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a secret, keeping only a short prefix: `"eyJ0eXAi..."` -> `"eyJ0***"`.
pub fn mask_secret(secret: &str) -> String {
    if secret.len() <= VISIBLE_PREFIX * 2 {
        return "***".to_string();
    }
    format!("{}***", &secret[..floor_char_boundary(secret, VISIBLE_PREFIX)])
}

/// Redact `access_token` / `client_secret` values from a form- or JSON-encoded
/// token exchange before it is logged.
pub fn redact_token_payload(s: &str) -> String {
    let mut out = s.to_string();
    for key in ["access_token", "client_secret", "refresh_token"] {
        out = redact_after_key(&out, key);
    }
    truncate_for_log(&out)
}

fn redact_after_key(s: &str, key: &str) -> String {
    let Some(start) = s.find(key) else {
        return s.to_string();
    };
    let after_key = start + key.len();
    let rest = &s[after_key..];
    // 跳过分隔符：`=`（表单）或 `":"`（JSON）
    let value_offset = rest
        .find(|c: char| !matches!(c, '=' | '"' | ':' | ' '))
        .unwrap_or(rest.len());
    let value_start = after_key + value_offset;
    let value_len = s[value_start..]
        .find(['&', '"', ',', '}'])
        .unwrap_or(s.len() - value_start);
    let value_end = value_start + value_len;
    format!(
        "{}{}{}",
        &s[..value_start],
        mask_secret(&s[value_start..value_end]),
        &s[value_end..]
    )
}
