use std::env;

/// Used when `RUST_LOG` is unset: per-request logs from this crate, warnings elsewhere.
pub const DEFAULT_LOG_FILTER: &str = "warn,booking_console=info";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub token_store_path: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("BOOKING_API_URL")
                .ok()
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            token_store_path: env::var("TOKEN_STORE_PATH")
                .unwrap_or_else(|_| "booking-console.db".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_default_filter_enables_request_logs() {
        let filter = EnvFilter::try_new(DEFAULT_LOG_FILTER).unwrap();
        let rendered = filter.to_string();
        assert!(rendered.contains("booking_console=info"), "{rendered}");
    }
}
