//! Typed client for the pet-store REST API and the user-service RPC API.
//!
//! # Overview
//! Every remote operation goes through one executor that resolves the URL,
//! merges headers, serializes the body, enforces the timeout and classifies
//! the response. The typed methods on `ApiClient` are thin wrappers around
//! a descriptor table of operations.
//!
//! # Design
//! - `ClientConfig` is built once and never mutated; `ApiClient` clones share it.
//! - Request building and response classification are pure functions over
//!   `HttpRequest` / `HttpResponse`; only `Executor::send` does I/O.
//! - A successful call yields `Outcome::Content(T)` or `Outcome::NoContent`
//!   (2xx without a JSON content type). Failures are `ApiError`.
//! - RPC paths such as `/userservice.v1.UserService/LoginUser` are plain
//!   JSON-over-HTTP POSTs; no protobuf framing is involved.
//!
//! ```no_run
//! use client_sdk::{ApiClient, ClientConfig, NewPet};
//!
//! # async fn run() -> Result<(), client_sdk::ApiError> {
//! let client = ApiClient::new(ClientConfig::new("http://localhost:3000").timeout_ms(5_000))?;
//! let created = client.create_pet(&NewPet::new("Rex").with_tag("dog")).await?;
//! let pets = client.list_pets(Some(10), None).await?;
//! # let _ = (created, pets);
//! # Ok(())
//! # }
//! ```

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod metrics;
pub mod models;
pub mod operations;

pub use blocking::BlockingApiClient;
pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use executor::Executor;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Outcome, Query};
pub use metrics::ClientMetrics;
pub use models::{Category, ErrorBody, Model, NewPet, Pet, SampleRequest, SampleResponse};
pub use operations::Operation;
