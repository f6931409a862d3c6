//! Request handlers. Each maps one route onto one [`UserGraph`] operation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use usergraph_core::UserGraph;
use usergraph_store::ObjectStore;
use usergraph_types::{NodeId, User};

use crate::error::{ServerError, ServerResult};

pub type AppState = UserGraph<dyn ObjectStore>;

/// Body of create and update requests: `{"name": "..."}`.
#[derive(Clone, Debug, Deserialize)]
pub struct UserInput {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

fn node_id(raw: &str) -> ServerResult<NodeId> {
    NodeId::parse(raw).map_err(|e| ServerError::BadRequest(e.to_string()))
}

fn body(input: Result<Json<UserInput>, JsonRejection>) -> ServerResult<UserInput> {
    input
        .map(|Json(input)| input)
        .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))
}

/// `GET /users/:user_id`
pub async fn find_user(
    State(graph): State<AppState>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<User>> {
    let user = graph.find_user(&node_id(&user_id)?).await?;
    Ok(Json(user))
}

/// `POST /users`
pub async fn create_user(
    State(graph): State<AppState>,
    input: Result<Json<UserInput>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<User>)> {
    let input = body(input)?;
    let user = graph.create_user(&input.name).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /users/:user_id`
pub async fn update_user(
    State(graph): State<AppState>,
    Path(user_id): Path<String>,
    input: Result<Json<UserInput>, JsonRejection>,
) -> ServerResult<Json<User>> {
    let id = node_id(&user_id)?;
    let input = body(input)?;
    let user = graph.update_user(&id, &input.name).await?;
    Ok(Json(user))
}

/// `GET /users/:user_id/connectedUsers`
pub async fn connected_users(
    State(graph): State<AppState>,
    Path(user_id): Path<String>,
) -> ServerResult<Json<Vec<User>>> {
    let users = graph.list_connected_users(&node_id(&user_id)?).await?;
    Ok(Json(users))
}

/// `PUT /users/:user_id/connectedUsers/:dest_id`
pub async fn add_connected_user(
    State(graph): State<AppState>,
    Path((user_id, dest_id)): Path<(String, String)>,
) -> ServerResult<StatusCode> {
    graph
        .connect(&node_id(&user_id)?, &node_id(&dest_id)?)
        .await?;
    Ok(StatusCode::CREATED)
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "usergraph-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
