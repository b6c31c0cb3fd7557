//! Data shapes exchanged with the pet-store and user-service APIs.
//!
//! # Design
//! Models are plain serde structs. Each one implements `Model`, which adds
//! the helpers the generated SDKs shipped with: a `validate()` that lists
//! field errors and a structural type guard over untyped JSON. Nothing in
//! the request path calls either; validation is always the caller's choice.
//!
//! The user-service messages only have a JSON form. There is no protobuf
//! encoding here.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait Model: Serialize + DeserializeOwned {
    /// Wire names of the fields that must be present.
    const REQUIRED: &'static [&'static str];

    /// Human-readable field errors; empty when the value is valid.
    fn validate(&self) -> Vec<String>;

    /// Type guard: `value` is an object carrying every required field.
    fn matches_shape(value: &Value) -> bool {
        value
            .as_object()
            .is_some_and(|object| Self::REQUIRED.iter().all(|key| object.contains_key(*key)))
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn require(errors: &mut Vec<String>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{field} is required"));
    }
}

/// A pet in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Store status, e.g. `available`, `pending`, `sold`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,
}

impl Pet {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tag: None,
            status: None,
            photo_urls: Vec::new(),
        }
    }
}

impl Model for Pet {
    const REQUIRED: &'static [&'static str] = &["id", "name"];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, "id", &self.id);
        require(&mut errors, "name", &self.name);
        errors
    }
}

/// Payload for creating or replacing a pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,
}

impl NewPet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            photo_urls: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl Model for NewPet {
    const REQUIRED: &'static [&'static str] = &["name"];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Model for Category {
    const REQUIRED: &'static [&'static str] = &[];

    fn validate(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Error document returned by the pet store on failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }
}

impl Model for ErrorBody {
    const REQUIRED: &'static [&'static str] = &["code", "message"];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, "code", &self.code);
        require(&mut errors, "message", &self.message);
        errors
    }
}

/// Request message shared by the user-service methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRequest {
    #[serde(default)]
    pub message: String,
}

impl SampleRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Model for SampleRequest {
    const REQUIRED: &'static [&'static str] = &["message"];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, "message", &self.message);
        errors
    }
}

/// Response message shared by the user-service methods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleResponse {
    #[serde(default)]
    pub result: String,
}

impl SampleResponse {
    pub fn new(result: impl Into<String>) -> Self {
        Self {
            result: result.into(),
        }
    }
}

impl Model for SampleResponse {
    const REQUIRED: &'static [&'static str] = &["result"];

    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        require(&mut errors, "result", &self.result);
        errors
    }
}
