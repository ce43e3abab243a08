// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::analyze::analyze_image_handler;
use super::items::{
    create_lost_item_handler, delete_lost_item_handler, get_lost_item_handler,
    list_lost_items_handler, UPLOADS_PREFIX,
};
use super::upload::{submit_item_handler, upload_handler};
use crate::config::{ServerConfig, ServiceConfig};
use crate::intake::ItemIntake;
use crate::storage::{ImageStore, SqliteItemStore};
use crate::vision::{VisionModelInfo, VisionModelManager};

#[derive(Clone)]
pub struct AppState {
    pub intake: Arc<ItemIntake>,
    pub models: Arc<Vec<VisionModelInfo>>,
}

impl AppState {
    pub fn new(intake: ItemIntake, models: Vec<VisionModelInfo>) -> Self {
        Self {
            intake: Arc::new(intake),
            models: Arc::new(models),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub detector_loaded: bool,
    pub captioner_available: bool,
    pub item_count: Option<i64>,
    pub models: Vec<VisionModelInfo>,
}

/// Open the database, upload directory and vision models described by `config`
pub async fn build_state(config: &ServiceConfig) -> Result<AppState> {
    let store = SqliteItemStore::connect(&config.storage.database_url).await?;
    let images = ImageStore::open(&config.storage.upload_dir).await?;
    let manager = VisionModelManager::new(config.vision.model_config()).await?;

    let intake = ItemIntake::new(
        manager.detector(),
        manager.caption_service(),
        config.classifier(),
        Arc::new(store),
        images,
    );

    Ok(AppState::new(intake, manager.list_models()))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub fn create_app(state: AppState, server: &ServerConfig) -> Router {
    let uploads = ServeDir::new(state.intake.images().root());

    Router::new()
        // Health check
        .route("/health", get(health_handler))
        // Split flow: upload, analyze, create
        .route("/upload", post(upload_handler))
        .route("/analyze-image", post(analyze_image_handler))
        .route("/create-lost-item", post(create_lost_item_handler))
        // Single-request flow
        .route("/submit-item", post(submit_item_handler))
        // Queries
        .route("/lost-items", get(list_lost_items_handler))
        .route(
            "/lost-items/:id",
            get(get_lost_item_handler).delete(delete_lost_item_handler),
        )
        // Stored photos
        .nest_service(UPLOADS_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_origins))
        .with_state(state)
}

pub async fn start_server(config: ServiceConfig) -> Result<()> {
    let state = build_state(&config).await?;
    let app = create_app(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    info!("API server listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let item_count = match state.intake.count_items().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!("Health check could not count items: {}", e);
            None
        }
    };

    let status = if item_count.is_some() && state.intake.has_detector() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: crate::version::VERSION_NUMBER.to_string(),
        detector_loaded: state.intake.has_detector(),
        captioner_available: state.intake.has_captioner(),
        item_count,
        models: state.models.as_ref().clone(),
    })
}
