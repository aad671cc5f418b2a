//! HTTP port. Handlers only marshal requests into the [`UserService`](crate::user::UserService).

pub mod create;
pub mod login;
pub mod status;
pub mod users;

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, OriginalUri, Request};
use axum::http::header;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::ServerError;

const BEARER: &str = "Bearer ";

/// Token taken from the `Authorization` header.
#[derive(Debug, Clone, PartialEq)]
pub struct Bearer(pub String);

impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .map(|header| header.strip_prefix(BEARER).unwrap_or(header).trim())
            .filter(|token| !token.is_empty())
            .ok_or(ServerError::Unauthorized)?;

        Ok(Self(token.to_owned()))
    }
}

/// JSON body whose rejection renders as a [`ServerError`].
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Greeting route.
pub async fn hello(OriginalUri(uri): OriginalUri) -> String {
    tracing::info!(path = uri.path(), "greeting requested");
    format!("hello, from {}", uri.path())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    use crate::*;

    #[tokio::test]
    async fn test_hello() {
        let state = state();
        let response =
            make_request(None, app(state), Method::GET, "/", String::default())
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"hello, from /");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = make_request(
            None,
            app(state()),
            Method::GET,
            "/nowhere",
            String::default(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
