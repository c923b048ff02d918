//! HTTP surface and the request-scoped conversion pipeline.
//!
//! Two routes: `GET /health` (always healthy, touches nothing) and
//! `GET /convert?url=<URL>`, which walks the pipeline
//! fetch → convert → publish inside a [`Workspace`] that is recursively
//! deleted on every path out of the handler, including panics.

use crate::config::ServiceConfig;
use crate::convert::convert_to_mesh;
use crate::error::Ply2GlbError;
use crate::fetch::download_file;
use crate::publish::{object_key, ArtifactStore};
use crate::workspace::Workspace;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application context passed to all handlers.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServiceConfig>,
    /// Shared download client; carries the configured timeout.
    pub http: reqwest::Client,
    pub store: Arc<dyn ArtifactStore>,
}

impl AppContext {
    /// Build a context, deriving the download client from the config.
    pub fn new(
        config: ServiceConfig,
        store: Arc<dyn ArtifactStore>,
    ) -> Result<Self, Ply2GlbError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.download_timeout_secs))
            .build()
            .map_err(|e| {
                Ply2GlbError::InvalidConfig(format!("cannot build download client: {e}"))
            })?;
        Ok(Self {
            config: Arc::new(config),
            http,
            store,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
pub struct ConvertParams {
    /// URL of the PLY file to convert. Absence is rejected by the `Query`
    /// extractor before this crate's logic runs.
    url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub glb_url: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Build the service router.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/convert", get(convert_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Serve the router on an already-bound listener.
pub async fn run(listener: tokio::net::TcpListener, ctx: AppContext) -> std::io::Result<()> {
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(ctx)).await
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn convert_endpoint(
    State(ctx): State<AppContext>,
    Query(params): Query<ConvertParams>,
) -> Response {
    match run_conversion(&ctx, &params.url).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!(stage = e.stage(), "conversion of '{}' failed: {e}", params.url);
            let status = if e.is_upstream_fault() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (
                status,
                Json(ErrorResponse {
                    detail: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// The conversion pipeline for one request.
///
/// The `Workspace` allocated first owns every on-disk intermediate; dropping
/// it at any return below removes the directory recursively.
async fn run_conversion(
    ctx: &AppContext,
    url: &str,
) -> Result<ConversionResponse, Ply2GlbError> {
    let start = Instant::now();
    let workspace = Workspace::create(&ctx.config)?;

    download_file(&ctx.http, url, workspace.input_path()).await?;

    convert_to_mesh(
        &ctx.config.pdal_bin,
        workspace.input_path(),
        workspace.output_path(),
    )
    .await?;

    let key = object_key(&ctx.config.key_prefix);
    ctx.store.put_public(&key, workspace.output_path()).await?;

    let glb_url = ctx.store.public_url(&key);
    info!(
        "conversion successful in {}ms: {glb_url}",
        start.elapsed().as_millis()
    );

    Ok(ConversionResponse {
        glb_url,
        message: "Conversion successful".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct NullStore;

    #[async_trait::async_trait]
    impl ArtifactStore for NullStore {
        async fn put_public(&self, _key: &str, _path: &std::path::Path) -> Result<(), Ply2GlbError> {
            Ok(())
        }
        fn public_url(&self, key: &str) -> String {
            crate::publish::gcs_public_url("test-bucket", key)
        }
    }

    fn test_router() -> Router {
        let config = ServiceConfig::builder().bucket("test-bucket").build().unwrap();
        router(AppContext::new(config, Arc::new(NullStore)).unwrap())
    }

    #[tokio::test]
    async fn health_is_always_healthy() {
        let response = test_router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, serde_json::json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn missing_url_param_is_a_client_error() {
        let response = test_router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/convert")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
