//! Users-related HTTP API. Every route requires a bearer token.

use axum::extract::State;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::Result;
use crate::router::{Bearer, JsonBody};
use crate::user::{
    NameResponse, StatusResponse, TokenRequest, UpdateNameRequest,
    UpdatePasswordRequest,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct NameBody {
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PasswordBody {
    password: String,
}

async fn get_name(
    State(state): State<AppState>,
    Bearer(token): Bearer,
) -> Result<Json<NameResponse>> {
    Ok(Json(state.users.get_name(TokenRequest { token }).await?))
}

async fn delete(
    State(state): State<AppState>,
    Bearer(token): Bearer,
) -> Result<Json<StatusResponse>> {
    Ok(Json(state.users.delete(TokenRequest { token }).await?))
}

async fn update_name(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    JsonBody(body): JsonBody<NameBody>,
) -> Result<Json<StatusResponse>> {
    let request = UpdateNameRequest {
        token,
        name: body.name,
    };

    Ok(Json(state.users.update_name(request).await?))
}

async fn update_password(
    State(state): State<AppState>,
    Bearer(token): Bearer,
    JsonBody(body): JsonBody<PasswordBody>,
) -> Result<Json<StatusResponse>> {
    let request = UpdatePasswordRequest {
        token,
        password: body.password,
    };

    Ok(Json(state.users.update_password(request).await?))
}

pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /users/@me` goes to `get_name`, `DELETE /users/@me` to `delete`.
        .route("/@me", get(get_name).delete(delete))
        .route("/@me/name", patch(update_name))
        .route("/@me/password", patch(update_password))
}
