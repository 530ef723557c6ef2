//! Frame Solver HTTP Server

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};

use frame_solver::api::{self, ApiResponse};
use frame_solver::config::ServerConfig;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// Bodies are taken raw so parse failures get the same envelope as engine errors
async fn analyze(State(config): State<Arc<ServerConfig>>, body: Bytes) -> impl IntoResponse {
    let response =
        tokio::task::spawn_blocking(move || api::analyze_body(&body, &config.analysis)).await;
    match response {
        Ok(response) => {
            if let (Some(kind), Some(error)) = (&response.kind, &response.error) {
                log::info!("analysis rejected ({}): {}", kind, error);
            }
            respond(response)
        }
        Err(e) => internal_error(e),
    }
}

async fn assemble(body: Bytes) -> impl IntoResponse {
    match tokio::task::spawn_blocking(move || api::assemble_body(&body)).await {
        Ok(response) => respond(response),
        Err(e) => internal_error(e),
    }
}

fn respond<T: Serialize>(response: ApiResponse<T>) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(response))
}

fn internal_error<T: Serialize>(e: tokio::task::JoinError) -> (StatusCode, Json<ApiResponse<T>>) {
    log::error!("analysis task failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse {
            success: false,
            kind: Some("internal".to_string()),
            error: Some(e.to_string()),
            results: None,
        }),
    )
}

fn app(config: ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/assemble", post(assemble))
        .route("/api/v1/analyze", post(analyze))
        .layer(cors)
        .with_state(Arc::new(config))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = ServerConfig::from_env().context("invalid server configuration")?;
    let addr = config.addr();

    log::info!("Frame Solver Server listening on http://{}", addr);
    log::info!("  Health check: GET  /health");
    log::info!("  Assembly:     POST /api/v1/assemble");
    log::info!("  Analysis:     POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app(config)).await.context("server error")?;
    Ok(())
}
