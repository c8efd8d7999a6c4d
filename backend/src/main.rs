//! Utility API Backend
//!
//! A REST API serving PDF pages rasterized to PNG, images, and listings of
//! the PDF and image resource directories.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, warn, Instrument};
use utility_api::{api, config::Config, state::AppState};
use uuid::Uuid;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Serialize)]
struct HelloResponse {
    message: String,
    status: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    message: String,
}

/// Tags each request with a uuid, echoed back in `x-request-id`
async fn request_id_middleware(request: Request, next: Next) -> Response {
    let id = Uuid::new_v4();
    let span = info_span!("request", id = %id, method = %request.method(), path = request.uri().path());
    let started = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "served"
        )
    });
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "utility_api=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    info!(?config, "config");

    for root in [&config.resources.pdf_root, &config.resources.image_root] {
        if !root.is_dir() {
            warn!(root = %root.display(), "resource root missing; listings will 404 until it exists");
        }
    }

    let app_state = AppState::from_config(&config);

    // request ids wrap everything, so the trace span sees them
    let app = Router::new()
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        .merge(api::router(app_state))
        .merge(api::docs())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        %addr,
        version = env!("CARGO_PKG_VERSION"),
        docs = api::OPENAPI_JSON_PATH,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable, only Ctrl+C will stop the server");
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        let which = tokio::select! {
            _ = tokio::signal::ctrl_c() => "SIGINT",
            _ = term.recv() => "SIGTERM",
        };
        info!(signal = which, "draining connections");
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!(signal = "ctrl-c", "draining connections");
    }
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Utility API: see /swagger-ui for the routes".to_string(),
        status: "ok".to_string(),
    })
}

// Liveness only; resource roots are not checked here
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "up".to_string(),
    })
}
