//! Text helpers for mirror settings and mirror responses.

const ERROR_EXCERPT_CHARS: usize = 180;

/// Trim a setting and treat a blank value as unset.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Canonical mirror base URL: trimmed, without trailing slashes.
///
/// `None` unless the value is an `http://` or `https://` URL with a host.
pub fn mirror_base_url(raw: &str) -> Option<String> {
    let url = raw.trim().trim_end_matches('/');
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    if rest.is_empty() || rest.starts_with('/') {
        return None;
    }
    Some(url.to_string())
}

/// One-line excerpt of a mirror error body, capped for log output.
pub fn error_excerpt(body: &str) -> String {
    body.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(ERROR_EXCERPT_CHARS)
        .collect()
}
