use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use super::BookingApi;
use crate::errors::ApiError;
use crate::models::{Booking, CommandRequest, CommandResult, NewBooking};
use crate::services::token_store::TokenStore;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
    tokens: TokenStore,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: TokenStore) -> anyhow::Result<Self> {
        Self::with_timeout(base_url, tokens, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        tokens: TokenStore,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("invalid booking API url: {base_url}"))?;
        anyhow::ensure!(
            !base_url.cannot_be_a_base(),
            "booking API url cannot be used as a base: {base_url}"
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url,
            client,
            tokens,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `cannot_be_a_base` is rejected in the constructor.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Starts a request with the stored bearer token attached, if any.
    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.client.request(method, self.endpoint(segments));
        match self.tokens.token() {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read auth token, sending without it");
                builder
            }
        }
    }

    /// Dispatches the request and returns the body of a 2xx response. Every other
    /// outcome is normalized into an `ApiError`.
    async fn execute(&self, builder: RequestBuilder) -> Result<(StatusCode, String), ApiError> {
        let request = builder.build().map_err(ApiError::transport)?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        tracing::info!(%method, %path, "dispatching request");
        let started = Instant::now();

        let result = async {
            let resp = self.client.execute(request).await?;
            let status = resp.status();
            let body = resp.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        }
        .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let (status, body) = match result {
            Ok(ok) => ok,
            Err(e) => {
                let err = ApiError::from_reqwest(e, self.timeout);
                tracing::warn!(%method, %path, elapsed_ms, error = %err, "request failed");
                return Err(err);
            }
        };

        if !status.is_success() {
            let err = ApiError::from_response_body(status, &body);
            tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, error = %err, "request rejected");
            return Err(err);
        }

        tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "request completed");
        Ok((status, body))
    }

    async fn execute_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let (status, body) = self.execute(builder).await?;
        decode_payload(status, &body)
    }
}

/// A booking id must name exactly one path segment. `url` drops `.` and `..`
/// segments, which would retarget the request at the collection.
fn booking_segment(id: &str) -> Result<&str, ApiError> {
    match id.trim() {
        "" | "." | ".." => Err(ApiError::new(None, format!("invalid booking id: {id:?}"))),
        _ => Ok(id),
    }
}

/// Accepts both the bare payload and `{"data": <payload>}`.
fn decode_payload<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::malformed(status, e))?;

    let payload = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| ApiError::malformed(status, e))
}

#[async_trait]
impl BookingApi for ApiClient {
    async fn list_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.execute_json(self.request(Method::GET, &["bookings"]))
            .await
    }

    async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.execute_json(self.request(Method::POST, &["bookings"]).json(booking))
            .await
    }

    async fn get_booking(&self, id: &str) -> Result<Booking, ApiError> {
        let id = booking_segment(id)?;
        self.execute_json(self.request(Method::GET, &["bookings", id]))
            .await
    }

    async fn delete_booking(&self, id: &str) -> Result<(), ApiError> {
        let id = booking_segment(id)?;
        self.execute(self.request(Method::DELETE, &["bookings", id]))
            .await
            .map(|_| ())
    }

    async fn submit_command(&self, message: &str) -> Result<CommandResult, ApiError> {
        if message.trim().is_empty() {
            return Err(ApiError::new(None, "command message must not be empty"));
        }
        let body = CommandRequest { message };
        self.execute_json(self.request(Method::POST, &["bookings", "commands"]).json(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, TokenStore::open(":memory:").unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_under_base_path() {
        let c = client("http://localhost:8000/api/v1/");
        assert_eq!(
            c.endpoint(&["bookings"]).as_str(),
            "http://localhost:8000/api/v1/bookings"
        );
        assert_eq!(
            c.endpoint(&["bookings", "commands"]).as_str(),
            "http://localhost:8000/api/v1/bookings/commands"
        );
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let c = client("http://localhost:8000");
        assert_eq!(
            c.endpoint(&["bookings", "a b/c"]).as_str(),
            "http://localhost:8000/bookings/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn test_dot_segment_ids_are_rejected_before_dispatch() {
        // Nothing listens on port 9; a dispatched request would fail as transport.
        let c = client("http://127.0.0.1:9");
        for id in ["", "  ", ".", ".."] {
            let err = c.get_booking(id).await.unwrap_err();
            assert_eq!(err.status, None);
            assert!(err.detail.starts_with("invalid booking id"), "{id:?}: {}", err.detail);

            let err = c.delete_booking(id).await.unwrap_err();
            assert!(err.detail.starts_with("invalid booking id"), "{id:?}: {}", err.detail);
        }
        assert_eq!(booking_segment("..x").unwrap(), "..x");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let store = TokenStore::open(":memory:").unwrap();
        assert!(ApiClient::new("not a url", store.clone()).is_err());
        assert!(ApiClient::new("mailto:ops@example.com", store).is_err());
    }

    #[test]
    fn test_decode_wrapped_and_bare() {
        let bare: Vec<u32> = decode_payload(StatusCode::OK, "[1,2,3]").unwrap();
        let wrapped: Vec<u32> = decode_payload(StatusCode::OK, r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_decode_malformed_keeps_status() {
        let err = decode_payload::<Vec<u32>>(StatusCode::OK, "<html>").unwrap_err();
        assert_eq!(err.status, Some(200));
        assert!(err.detail.starts_with("malformed response body"));
    }
}
