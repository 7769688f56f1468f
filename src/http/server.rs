use super::app_error::AppError;
use super::dataset::{__path_analyze_dataset, __path_ine_dataset};
use super::dataset::{analyze_dataset, ine_dataset};
use super::health::{__path_liveness, liveness};
use super::state::HttpServerState;
use anyhow::Result;
use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace;
use tower_http::{ServiceBuilderExt, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{Level, error, info};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "DataProbe", description = "DataProbe API"),
        (name = "Dataset", description = "Open-data resource analysis"),
        (name = "Health", description = "Health checks"),
    ),
    paths(frontpage, liveness, analyze_dataset, ine_dataset),
)]
struct ApiDoc;

/// Application routes with the tracing, timeout and compression middleware.
pub fn build_app_routes(state: HttpServerState, timeout_seconds: u64) -> Router {
    // List of headers that shouldn't be logged
    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();

    let middleware = ServiceBuilder::new()
        .sensitive_request_headers(sensitive_headers.clone())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .sensitive_response_headers(sensitive_headers)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(timeout_seconds),
        ))
        .compression()
        .into_inner();

    Router::new()
        .route("/", get(frontpage))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .route("/health/live", get(liveness))
        .route("/api/dataset/analyze", get(analyze_dataset))
        .route("/api/dataset/ine", get(ine_dataset))
        .layer(middleware)
        .with_state(state)
}

pub async fn run_http_server(
    state: HttpServerState,
    address: SocketAddr,
    timeout_seconds: u64,
) -> Result<()> {
    let app = build_app_routes(state, timeout_seconds);

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Listening on http://{}", address);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // Wait for the CTRL+C signal
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to install the CTRL+C signal handler: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[utoipa::path(
    get,
    path = "/",
    tag = "DataProbe",
    responses(
        (status = 200, description = "DataProbe Frontpage", body = String)
    )
)]
async fn frontpage(State(state): State<HttpServerState>) -> Result<Json<String>, AppError> {
    let name: String = (*state.name).clone();
    Ok(Json(name))
}
