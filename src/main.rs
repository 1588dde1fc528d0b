// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::{env, sync::Arc};
use text_extractor::{
    api::{start_server, AppState},
    config::ServerConfig,
    version,
    vision::{ImageStager, PaddleOcrModel, TextRecognizer},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    info!("Starting {}", version::get_version_string());
    info!("Features: {}", version::FEATURES.join(", "));

    let config = ServerConfig::parse();
    config.validate()?;
    let addr = config.socket_addr()?;

    let stager = ImageStager::new(&config.upload_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;
    info!("Staging uploads in {}", stager.dir().display());

    // Engine load failure is fatal; the service never starts without one
    let model_config = config.engine.to_model_config();
    let engine = PaddleOcrModel::load(&model_config)
        .context("Failed to initialize text recognition engine")?;
    let recognizer: Arc<dyn TextRecognizer> = Arc::new(engine);
    info!(
        "Text recognition engine ready ({}, languages: {})",
        recognizer.name(),
        recognizer.languages().join(", ")
    );

    let state = AppState::new(recognizer, stager).with_max_upload_bytes(config.max_upload_bytes);

    start_server(addr, state).await
}
