// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::extract::extract_text_handler;
use super::health::health_handler;
use crate::config::server::DEFAULT_MAX_UPLOAD_BYTES;
use crate::vision::{ImageStager, TextRecognizer};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    /// Engine built once at startup
    pub recognizer: Arc<dyn TextRecognizer>,
    pub stager: Arc<ImageStager>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, stager: ImageStager) -> Self {
        Self {
            recognizer,
            stager: Arc::new(stager),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health_handler))
        .route("/extract-text", post(extract_text_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let engine = state.recognizer.name().to_string();
    let languages = state.recognizer.languages().join(", ");
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        "Text Extractor API listening on {} (engine: {}, languages: {})",
        listener.local_addr()?,
        engine,
        languages
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
