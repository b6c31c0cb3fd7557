//! In-memory stand-in for the pet-store REST API and the user-service RPC
//! API, used to exercise the client end to end.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const USER_SERVICE_METHODS: &[&str] = &[
    "RegisterUser",
    "LoginUser",
    "RefreshToken",
    "LogoutUser",
    "GetUser",
    "GetCurrentUser",
    "UpdateUser",
    "DeleteUser",
    "ListUsers",
    "ChangePassword",
    "ResetPassword",
    "SendVerificationEmail",
    "VerifyEmail",
    "ListUserSessions",
    "RevokeSession",
    "GetUserPreferences",
    "UpdateUserPreferences",
];

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photo_urls: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPet {
    pub name: String,
    pub tag: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct SampleRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SampleResponse {
    pub result: String,
}

/// Pets in insertion order, so listings are deterministic.
pub type Db = Arc<RwLock<Vec<Pet>>>;

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/pets", get(list_pets).post(create_pet))
        .route("/pets/{pet_id}", get(get_pet).put(update_pet).delete(delete_pet))
        .route("/userservice.v1.UserService/{method}", post(user_service))
        .with_state(db)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn not_found(pet_id: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            code: "not_found".to_string(),
            message: format!("pet {pet_id} does not exist"),
        }),
    )
}

async fn list_pets(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<Pet>> {
    let pets = db.read().await;
    let matching = pets
        .iter()
        .filter(|pet| match &params.tag {
            Some(tag) => pet.tag.as_deref() == Some(tag.as_str()),
            None => true,
        })
        .take(params.limit.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(matching)
}

async fn create_pet(State(db): State<Db>, Json(input): Json<NewPet>) -> (StatusCode, Json<Pet>) {
    let pet = Pet {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        tag: input.tag,
        status: Some("available".to_string()),
        photo_urls: input.photo_urls,
    };
    db.write().await.push(pet.clone());
    (StatusCode::CREATED, Json(pet))
}

async fn get_pet(State(db): State<Db>, Path(pet_id): Path<String>) -> ApiResult<Json<Pet>> {
    let pets = db.read().await;
    pets.iter()
        .find(|pet| pet.id == pet_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(&pet_id))
}

async fn update_pet(
    State(db): State<Db>,
    Path(pet_id): Path<String>,
    Json(input): Json<NewPet>,
) -> ApiResult<Json<Pet>> {
    let mut pets = db.write().await;
    let pet = pets
        .iter_mut()
        .find(|pet| pet.id == pet_id)
        .ok_or_else(|| not_found(&pet_id))?;
    pet.name = input.name;
    pet.tag = input.tag;
    pet.photo_urls = input.photo_urls;
    Ok(Json(pet.clone()))
}

async fn delete_pet(State(db): State<Db>, Path(pet_id): Path<String>) -> ApiResult<StatusCode> {
    let mut pets = db.write().await;
    let index = pets
        .iter()
        .position(|pet| pet.id == pet_id)
        .ok_or_else(|| not_found(&pet_id))?;
    pets.remove(index);
    Ok(StatusCode::NO_CONTENT)
}

/// Echoes the request message back, prefixed with the method name.
async fn user_service(
    Path(method): Path<String>,
    Json(input): Json<SampleRequest>,
) -> ApiResult<Json<SampleResponse>> {
    if !USER_SERVICE_METHODS.contains(&method.as_str()) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                code: "unimplemented".to_string(),
                message: format!("unknown method {method}"),
            }),
        ));
    }
    Ok(Json(SampleResponse {
        result: format!("{method}: {}", input.message),
    }))
}
