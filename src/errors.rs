use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

/// The one error kind the booking client surfaces. Transport failures, timeouts,
/// non-2xx responses and undecodable bodies all collapse into it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ApiError {
    pub status: Option<u16>,
    pub detail: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.detail),
            None => f.write_str(&self.detail),
        }
    }
}

impl ApiError {
    pub fn new(status: Option<u16>, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(None, format!("request timed out after {}s", after.as_secs_f64()))
    }

    pub fn transport(err: impl fmt::Display) -> Self {
        Self::new(None, format!("unable to reach booking service: {err}"))
    }

    pub fn malformed(status: StatusCode, err: impl fmt::Display) -> Self {
        Self::new(
            Some(status.as_u16()),
            format!("malformed response body: {err}"),
        )
    }

    /// Builds the error for a non-2xx response. The `detail` field of a JSON body
    /// wins; otherwise the raw body, otherwise the reason phrase.
    pub fn from_response_body(status: StatusCode, body: &str) -> Self {
        let detail = extract_detail(body)
            .or_else(|| {
                let raw = body.trim();
                (!raw.is_empty()).then(|| raw.to_string())
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
        Self::new(Some(status.as_u16()), detail)
    }

    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::timeout(timeout)
        } else {
            Self::transport(err)
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        // Validation failures arrive as [{"loc": [...], "msg": "...", "type": "..."}]
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        serde_json::Value::Null => None,
        serde_json::Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
