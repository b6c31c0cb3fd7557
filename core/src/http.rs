//! HTTP request/response values and response classification.
//!
//! # Design
//! A request attempt and the response it produced are described as plain
//! data. The executor builds an `HttpRequest`, hands it to the transport and
//! turns whatever came back into an `HttpResponse`; `HttpResponse::classify`
//! is then a pure function, so the negotiation rules (status, content type,
//! JSON parsing) are testable without a socket.

use std::fmt;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// HTTP method of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Whether a request body may be attached for this method.
    pub fn allows_body(self) -> bool {
        !matches!(self, HttpMethod::Get | HttpMethod::Head | HttpMethod::Delete)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
        }
    }
}

/// Ordered query parameters. `None` values are skipped when the URL is
/// built and do not reserve a position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, Option<String>)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.pairs.push((key.to_string(), value.map(|v| v.to_string())));
        self
    }

    /// Pairs that carry a value, in insertion order.
    pub fn present(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// One outgoing request attempt.
///
/// Built by `Executor::build_request`; `url` is fully resolved (base URL,
/// path and query string) and `headers` is the merged default/override map.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// A response reduced to what classification needs.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Successful result of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The response declared JSON and the body parsed into `T`.
    Content(T),
    /// 2xx response without a JSON content type. Distinct from JSON `null`.
    NoContent,
}

impl<T> Outcome<T> {
    pub fn is_no_content(&self) -> bool {
        matches!(self, Outcome::NoContent)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Content(value) => Some(value),
            Outcome::NoContent => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Content(value) => Outcome::Content(f(value)),
            Outcome::NoContent => Outcome::NoContent,
        }
    }
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }

    /// Map the response onto an `Outcome` or an `ApiError`.
    ///
    /// Error bodies are returned verbatim and never parsed, even when they
    /// look like JSON.
    pub fn classify<T: DeserializeOwned>(self) -> Result<Outcome<T>, ApiError> {
        if !self.is_success() {
            return Err(ApiError::Http {
                status: self.status,
                body: self.body,
            });
        }
        if !self.is_json() {
            return Ok(Outcome::NoContent);
        }
        serde_json::from_str(&self.body)
            .map(Outcome::Content)
            .map_err(ApiError::Parse)
    }
}
