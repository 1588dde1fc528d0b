// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod version;
pub mod vision;

pub use api::{build_router, start_server, AppState, ExtractError, ExtractionResponse};
pub use config::{EngineArgs, ServerConfig};
pub use vision::{Detection, ImageStager, PaddleOcrModel, TextRecognizer};
