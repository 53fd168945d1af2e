use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, http::Method, BoxError, Router};
use tower::{timeout::{error::Elapsed, TimeoutLayer}, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::ApiError;

/// Wrap the todo routes in request tracing, CORS and the request deadline.
/// Requests that outlive `request_timeout` are answered with the JSON error envelope.
pub fn apply_middleware(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(todo_cors())
            .layer(HandleErrorLayer::new(middleware_error_to_api_error))
            .layer(TimeoutLayer::new(request_timeout)),
    )
}

async fn middleware_error_to_api_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(anyhow::anyhow!("middleware failure: {}", err))
    }
}

/// Browser clients may call the four todo verbs from any origin.
fn todo_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Install the JSON log subscriber. `RUST_LOG` picks the level, `info` otherwise.
pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json().with_span_list(true))
        .try_init()?;

    Ok(())
}
