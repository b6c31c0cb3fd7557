//! Typed facade over the executor.
//!
//! # Design
//! `ApiClient` is a cheap `Clone` around an `Arc<Executor>`. Every typed
//! method is a single call to `invoke`, which substitutes path parameters
//! into the operation's template and hands the rest to the executor. The
//! facade never retries, caches or reshapes a result.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::executor::Executor;
use crate::http::{Outcome, Query};
use crate::metrics::ClientMetrics;
use crate::models::{NewPet, Pet, SampleRequest, SampleResponse};
use crate::operations::{self, Operation};

/// Placeholder body for operations that send none.
pub(crate) const NO_BODY: Option<&()> = None;

/// Async client for the pet-store and user-service APIs.
#[derive(Debug, Clone)]
pub struct ApiClient {
    executor: Arc<Executor>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            executor: Arc::new(Executor::new(config)?),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.executor.config()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn metrics(&self) -> &ClientMetrics {
        self.executor.metrics()
    }

    /// Invoke any operation from the descriptor table.
    pub async fn invoke<B, T>(
        &self,
        op: &Operation,
        path_params: &[(&str, &str)],
        query: &Query,
        body: Option<&B>,
    ) -> Result<Outcome<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = op.resolve_path(path_params)?;
        self.executor.execute(op.method, &path, query, body).await
    }

    /// Returns a list of all pets in the store.
    pub async fn list_pets(
        &self,
        limit: Option<u32>,
        tag: Option<&str>,
    ) -> Result<Outcome<Vec<Pet>>, ApiError> {
        let query = Query::new().param("limit", limit).param("tag", tag);
        self.invoke(&operations::LIST_PETS, &[], &query, NO_BODY).await
    }

    /// Creates a new pet in the store.
    pub async fn create_pet(&self, pet: &NewPet) -> Result<Outcome<Pet>, ApiError> {
        self.invoke(&operations::CREATE_PET, &[], &Query::new(), Some(pet))
            .await
    }

    /// Returns a single pet by its ID.
    pub async fn get_pet(&self, pet_id: &str) -> Result<Outcome<Pet>, ApiError> {
        self.invoke(&operations::GET_PET, &[("petId", pet_id)], &Query::new(), NO_BODY)
            .await
    }

    /// Updates an existing pet.
    pub async fn update_pet(&self, pet_id: &str, pet: &NewPet) -> Result<Outcome<Pet>, ApiError> {
        self.invoke(&operations::UPDATE_PET, &[("petId", pet_id)], &Query::new(), Some(pet))
            .await
    }

    /// Deletes a pet from the store. The store normally answers 204; a JSON
    /// body, if any, is passed through untyped.
    pub async fn delete_pet(&self, pet_id: &str) -> Result<Outcome<Value>, ApiError> {
        self.invoke(&operations::DELETE_PET, &[("petId", pet_id)], &Query::new(), NO_BODY)
            .await
    }
}

macro_rules! user_service_methods {
    ($($konst:ident, $fn_name:ident, $rpc:literal, $doc:literal;)*) => {
        impl ApiClient {
            $(
                #[doc = $doc]
                pub async fn $fn_name(
                    &self,
                    request: &SampleRequest,
                ) -> Result<Outcome<SampleResponse>, ApiError> {
                    self.invoke(&operations::$konst, &[], &Query::new(), Some(request))
                        .await
                }
            )*
        }
    };
}

operations::for_each_user_service_op!(user_service_methods);
