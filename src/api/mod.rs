// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod extract;
pub mod health;
pub mod http_server;

pub use errors::{ErrorResponse, ExtractError};
pub use extract::{extract_text_handler, ExtractionResponse, UploadedImage};
pub use health::{health_handler, HealthResponse};
pub use http_server::{build_router, start_server, AppState};
