// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Liveness probe

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::version::SERVICE_NAME;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            message: format!("{} is running", SERVICE_NAME),
        }
    }
}

/// GET /health
///
/// Always healthy; does not touch the recognition engine.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
