//! Blocking pass-through over `ApiClient`.
//!
//! Same operations, same arguments, same results; each call is driven to
//! completion on a current-thread runtime owned by the client. Must not be
//! used from inside an async runtime (tokio panics on nested `block_on`).

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{Outcome, Query};
use crate::models::{NewPet, Pet, SampleRequest, SampleResponse};
use crate::operations::{self, Operation};

#[derive(Debug)]
pub struct BlockingApiClient {
    inner: ApiClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ApiError::Runtime)?;
        Ok(Self {
            inner: ApiClient::new(config)?,
            runtime,
        })
    }

    /// The async client this one drives.
    pub fn inner(&self) -> &ApiClient {
        &self.inner
    }

    pub fn invoke<B, T>(
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
        self.runtime
            .block_on(self.inner.invoke(op, path_params, query, body))
    }

    pub fn list_pets(
        &self,
        limit: Option<u32>,
        tag: Option<&str>,
    ) -> Result<Outcome<Vec<Pet>>, ApiError> {
        self.runtime.block_on(self.inner.list_pets(limit, tag))
    }

    pub fn create_pet(&self, pet: &NewPet) -> Result<Outcome<Pet>, ApiError> {
        self.runtime.block_on(self.inner.create_pet(pet))
    }

    pub fn get_pet(&self, pet_id: &str) -> Result<Outcome<Pet>, ApiError> {
        self.runtime.block_on(self.inner.get_pet(pet_id))
    }

    pub fn update_pet(&self, pet_id: &str, pet: &NewPet) -> Result<Outcome<Pet>, ApiError> {
        self.runtime.block_on(self.inner.update_pet(pet_id, pet))
    }

    pub fn delete_pet(&self, pet_id: &str) -> Result<Outcome<Value>, ApiError> {
        self.runtime.block_on(self.inner.delete_pet(pet_id))
    }
}

macro_rules! blocking_user_service_methods {
    ($($konst:ident, $fn_name:ident, $rpc:literal, $doc:literal;)*) => {
        impl BlockingApiClient {
            $(
                #[doc = $doc]
                pub fn $fn_name(
                    &self,
                    request: &SampleRequest,
                ) -> Result<Outcome<SampleResponse>, ApiError> {
                    self.runtime.block_on(self.inner.$fn_name(request))
                }
            )*
        }
    };
}

operations::for_each_user_service_op!(blocking_user_service_methods);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructs_outside_a_runtime() {
        let client = BlockingApiClient::new(ClientConfig::new("http://localhost:3000/")).unwrap();
        assert_eq!(client.inner().config().base_url(), "http://localhost:3000");
    }

    #[test]
    fn local_errors_pass_through_unchanged() {
        let client = BlockingApiClient::new(ClientConfig::new("http://localhost:3000")).unwrap();
        let err = client
            .invoke::<_, Pet>(&operations::UPDATE_PET, &[], &Query::new(), Some(&NewPet::new("x")))
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingPathParam(_)));
    }
}
