//! Tessera is a user account service skeleton around a pluggable token manager.
#![forbid(unsafe_code)]

pub mod clock;
pub mod config;
pub mod error;
mod router;
pub mod rule;
pub mod telemetry;
pub mod token;
pub mod user;
pub mod valid;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{Method, StatusCode, header};
use axum::routing::{get, post};
use axum::{Router, middleware as AxumMiddleware};
use error::ServerError;
use rule::Rule;
use token::{JwtImplementation, TokenManager};
use tower::ServiceBuilder;
use tower_http::LatencyUnit;
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveHeadersLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use user::{UserService, UserSvc};

/// Minimum signing key length, in bytes.
pub const MIN_SIGN_KEY_LENGTH: usize = 16;

/// MUST NEVER be used in production.
#[cfg(test)]
pub async fn make_request(
    state: Option<&AppState>,
    app: Router,
    method: Method,
    path: &str,
    body: String,
) -> axum::http::Response<axum::body::Body> {
    use axum::extract::Request;
    use tower::util::ServiceExt;

    let token = match state {
        Some(state) => format!(
            "Bearer {}",
            state.token.new_access_token("admin").expect("cannot create JWT")
        ),
        None => String::default(),
    };

    app.oneshot(
        Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, token)
            .body(axum::body::Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// MUST NEVER be used in production.
#[cfg(test)]
pub fn state() -> AppState {
    let config = Arc::new(config::Configuration::default());
    let token = Arc::new(
        token_manager(&config.token, "test-signing-key-0123456789".into())
            .expect("test configuration is valid"),
    );

    AppState {
        config,
        users: Arc::new(UserSvc::new(Arc::clone(&token))),
        token,
    }
}

/// State sharing between routes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Configuration>,
    pub token: Arc<TokenManager>,
    pub users: Arc<dyn UserService>,
}

/// Create router.
pub fn app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Mark sensitive headers before they reach the trace layer.
        .layer(SetSensitiveHeadersLayer::new([header::AUTHORIZATION, header::COOKIE]))
        // Add high level tracing/logging to all requests.
        .layer(
            TraceLayer::new_for_http()
                .on_body_chunk(|chunk: &Bytes, latency: Duration, _span: &tracing::Span| {
                    tracing::trace!(size_bytes = chunk.len(), latency = ?latency, "sending body chunk")
                })
                .make_span_with(DefaultMakeSpan::new().include_headers(true).level(tracing::Level::INFO))
                .on_request(DefaultOnRequest::new())
                .on_response(DefaultOnResponse::new().include_headers(true).latency_unit(LatencyUnit::Micros)),
        )
        // Set a timeout.
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(10)))
        // Add CORS preflight support.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
                .allow_headers(Any)
                .vary([header::AUTHORIZATION]),
        );

    Router::new()
        // `GET /` greets the caller.
        .route("/", get(router::hello))
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(router::status::status))
        // `POST /create` goes to `create`.
        .route("/create", post(router::create::handler))
        // `POST /login` goes to `login`.
        .route("/login", post(router::login::handler))
        .nest("/users", router::users::router())
        .with_state(state)
        .route_layer(AxumMiddleware::from_fn(telemetry::track))
        .layer(middleware)
}

/// Build a [`TokenManager`] signing JWTs with `key`.
///
/// Expiry windows must be positive and the key at least
/// [`MIN_SIGN_KEY_LENGTH`] bytes long.
pub fn token_manager(
    config: &config::Token,
    key: String,
) -> Result<TokenManager, Box<dyn std::error::Error>> {
    let mut token = TokenManager::new(
        Arc::new(JwtImplementation::new()),
        Rule::new(|minutes: &u64| *minutes > 0),
        Rule::new(|minutes: &u64| *minutes > 0),
        Rule::new(|key: &String| key.len() >= MIN_SIGN_KEY_LENGTH),
    );

    if !token.set_access_expire(config.access_expire) {
        return Err("`token.access_expire` must be greater than 0".into());
    }
    if !token.set_refresh_expire(config.refresh_expire) {
        return Err("`token.refresh_expire` must be greater than 0".into());
    }
    if !token.set_sign_key(key) {
        return Err(format!(
            "`KEY` must be at least {MIN_SIGN_KEY_LENGTH} bytes long"
        )
        .into());
    }

    Ok(token)
}

/// Initialize the application state.
pub fn initialize_state(
    config: Arc<config::Configuration>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let key = std::env::var("KEY")
        .map_err(|_| "missing `KEY` environnement variable")?;
    let token = Arc::new(token_manager(&config.token, key)?);

    tracing::info!(
        access_expire = token.access_expire(),
        refresh_expire = token.refresh_expire(),
        "token manager configured"
    );

    Ok(AppState {
        config,
        users: Arc::new(UserSvc::new(Arc::clone(&token))),
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_manager_policies() {
        let config = config::Token::default();

        assert!(token_manager(&config, "short".into()).is_err());
        assert!(
            token_manager(
                &config::Token {
                    access_expire: 0,
                    ..Default::default()
                },
                "test-signing-key-0123456789".into(),
            )
            .is_err()
        );

        let token =
            token_manager(&config, "test-signing-key-0123456789".into()).unwrap();
        assert_eq!(token.access_expire(), config.access_expire);
        assert_eq!(token.refresh_expire(), config.refresh_expire);
    }
}
