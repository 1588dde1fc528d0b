// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local extraction without the HTTP server

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::api::extract::extract_text;
use crate::config::EngineArgs;
use crate::vision::{ImageStager, PaddleOcrModel, TextRecognizer};

/// Extract text from an image file and print the JSON result
#[derive(Parser, Debug)]
#[command(name = "extract-text")]
#[command(version)]
#[command(about = "Run the text extraction pipeline on a local image", long_about = None)]
pub struct Cli {
    /// Image file to read
    pub image: PathBuf,

    /// Working directory for the staged copy
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub work_dir: PathBuf,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

/// Outcome of a CLI run, already rendered for stdout
pub enum CliOutput {
    Success(String),
    Failure(String),
}

/// Load the engine named by `cli` and run the pipeline once
pub fn execute(cli: &Cli) -> Result<CliOutput> {
    cli.engine.validate()?;
    let recognizer: Arc<dyn TextRecognizer> =
        Arc::new(PaddleOcrModel::load(&cli.engine.to_model_config())?);
    run(cli, recognizer.as_ref())
}

/// Run the pipeline with an already constructed engine
pub fn run(cli: &Cli, recognizer: &dyn TextRecognizer) -> Result<CliOutput> {
    let bytes = fs::read(&cli.image)
        .with_context(|| format!("Failed to read {}", cli.image.display()))?;
    let stager = ImageStager::new(&cli.work_dir)
        .with_context(|| format!("Failed to create {}", cli.work_dir.display()))?;

    info!("Extracting text from {}", cli.image.display());

    Ok(match extract_text(&stager, recognizer, &bytes) {
        Ok(response) => CliOutput::Success(render(&response, cli.pretty)?),
        Err(e) => CliOutput::Failure(render(&e.to_response(), cli.pretty)?),
    })
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
