//! The request executor shared by every operation.
//!
//! # Design
//! `execute` is `build_request` (pure: URL, headers, body) followed by
//! `send` (the only I/O) and `HttpResponse::classify` (pure). The executor
//! owns the immutable config, the pre-validated header map and a pooled
//! `reqwest::Client`; nothing in it changes after construction, so one
//! instance serves any number of concurrent calls.
//!
//! Every call that gets as far as `send` is counted in the executor's
//! `ClientMetrics`, labelled with its method and outcome.
//!
//! The deadline covers `send()` up to the arrival of the response headers.
//! `tokio::time::timeout` owns the timer, so it is released on every exit
//! path, and dropping the timed-out future aborts the connection.

use std::time::Instant;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Outcome, Query};
use crate::metrics::{outcome_label, ClientMetrics};

#[derive(Debug)]
pub struct Executor {
    http: reqwest::Client,
    config: ClientConfig,
    headers: HeaderMap,
    metrics: ClientMetrics,
}

impl Executor {
    /// Validates the base URL and every configured header up front.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Url::parse(config.base_url())?;
        let headers = config.header_map()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(ApiError::ClientInit)?;
        Ok(Self {
            http,
            config,
            headers,
            metrics: ClientMetrics::new()?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ClientMetrics {
        &self.metrics
    }

    /// Resolve one request attempt without touching the network.
    ///
    /// `path` must already have its path parameters substituted.
    pub fn build_request<B>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let mut url = Url::parse(&format!("{}{}", self.config.base_url(), path))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query.present() {
                pairs.append_pair(key, value);
            }
        }

        let body = match body {
            Some(_) if !method.allows_body() => {
                warn!(%method, path, "dropping request body for body-less method");
                None
            }
            Some(body) => Some(serde_json::to_string(body).map_err(ApiError::Serialization)?),
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: self.headers.clone(),
            body,
        })
    }

    /// Perform the round-trip for a built request.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let timeout = self.config.request_timeout();
        let started = Instant::now();
        debug!(method = %request.method, url = %request.url, "sending request");

        let mut builder = self
            .http
            .request(request.method.into(), &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = match tokio::time::timeout(timeout, builder.send()).await {
            Ok(response) => response?,
            Err(_) => {
                warn!(method = %request.method, url = %request.url, ?timeout, "request timed out");
                return Err(ApiError::Timeout(timeout));
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        debug!(
            method = %request.method,
            url = %request.url,
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "received response"
        );

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Build, send and classify one call.
    pub async fn execute<B, T>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: Option<&B>,
    ) -> Result<Outcome<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.build_request(method, path, query, body)?;
        let started = Instant::now();
        let result = self.send(request).await.and_then(HttpResponse::classify);
        self.metrics.record(
            method,
            outcome_label(&result),
            started.elapsed().as_secs_f64(),
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::json;

    const NO_BODY: Option<&()> = None;

    fn executor(base_url: &str) -> Executor {
        Executor::new(ClientConfig::new(base_url)).unwrap()
    }

    #[test]
    fn omitted_query_params_reserve_no_slot() {
        let query = Query::new().param("tag", None::<&str>).param("limit", Some(5));
        let req = executor("https://api.example.com")
            .build_request(HttpMethod::Get, "/pets", &query, NO_BODY)
            .unwrap();
        assert_eq!(req.url, "https://api.example.com/pets?limit=5");
    }

    #[test]
    fn no_question_mark_without_params() {
        let query = Query::new().param("tag", None::<&str>);
        let req = executor("https://api.example.com")
            .build_request(HttpMethod::Get, "/pets", &query, NO_BODY)
            .unwrap();
        assert_eq!(req.url, "https://api.example.com/pets");
    }

    #[test]
    fn query_params_keep_insertion_order_and_are_encoded() {
        let query = Query::new()
            .param("tag", Some("good dog"))
            .param("limit", Some(10));
        let req = executor("https://api.example.com")
            .build_request(HttpMethod::Get, "/pets", &query, NO_BODY)
            .unwrap();
        assert_eq!(req.url, "https://api.example.com/pets?tag=good+dog&limit=10");
    }

    #[test]
    fn base_url_slashes_do_not_duplicate() {
        let req = executor("https://api.example.com///")
            .build_request(HttpMethod::Get, "/pets", &Query::new(), NO_BODY)
            .unwrap();
        assert_eq!(req.url, "https://api.example.com/pets");
    }

    #[test]
    fn body_is_serialized_for_post() {
        let body = json!({"name": "Rex", "tag": "dog"});
        let req = executor("http://localhost:3000")
            .build_request(HttpMethod::Post, "/pets", &Query::new(), Some(&body))
            .unwrap();
        let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn body_is_never_attached_to_get_or_delete() {
        let exec = executor("http://localhost:3000");
        let body = json!({"unexpected": true});
        for method in [HttpMethod::Get, HttpMethod::Delete, HttpMethod::Head] {
            let req = exec
                .build_request(method, "/pets/1", &Query::new(), Some(&body))
                .unwrap();
            assert!(req.body.is_none(), "{method}");
        }
    }

    #[test]
    fn merged_headers_are_attached() {
        let exec = Executor::new(
            ClientConfig::new("http://localhost:3000")
                .bearer_token("abc")
                .header("Content-Type", "application/merge-patch+json"),
        )
        .unwrap();
        let req = exec
            .build_request(HttpMethod::Get, "/pets", &Query::new(), NO_BODY)
            .unwrap();
        assert_eq!(req.headers[CONTENT_TYPE], "application/merge-patch+json");
        assert_eq!(req.headers[AUTHORIZATION], "Bearer abc");
    }

    #[test]
    fn invalid_base_url_is_rejected_at_construction() {
        let err = Executor::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn invalid_header_is_rejected_at_construction() {
        let err = Executor::new(ClientConfig::new("http://x").header("X-Bad", "line\nbreak"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidHeader { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Bind then drop to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let exec = executor(&format!("http://127.0.0.1:{port}"));
        let err = exec
            .execute::<_, serde_json::Value>(HttpMethod::Get, "/pets", &Query::new(), NO_BODY)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "{err:?}");

        let metrics = exec.metrics();
        assert_eq!(metrics.request_count(HttpMethod::Get, "network_error"), 1);
        assert_eq!(metrics.duration_count(HttpMethod::Get), 1);
    }

    #[tokio::test]
    async fn preflight_failures_are_not_counted() {
        // JSON object keys must be strings, so this body cannot serialize.
        let body = std::collections::BTreeMap::from([((1, 2), 3)]);
        let exec = executor("http://127.0.0.1:9");
        let err = exec
            .execute::<_, serde_json::Value>(HttpMethod::Post, "/pets", &Query::new(), Some(&body))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)), "{err:?}");
        assert_eq!(exec.metrics().duration_count(HttpMethod::Post), 0);
    }
}
