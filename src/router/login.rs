use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::error::Result;
use crate::router::JsonBody;
use crate::user::{LoginResponse, NamePasswordRequest};

/// Handler to log in.
pub async fn handler(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NamePasswordRequest>,
) -> Result<Json<LoginResponse>> {
    Ok(Json(state.users.login(body).await?))
}

#[cfg(test)]
mod tests {
    use crate::*;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_handler() {
        let response = make_request(
            None,
            app(state()),
            Method::POST,
            "/login",
            json!({ "name": "alice", "password": "hunter2" }).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }
}
