// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::ImageError;

/// JSON error body: `{"error": "<message>"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// Every way an extraction request can fail
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No image file provided")]
    MissingFile,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Invalid multipart upload: {0}")]
    InvalidUpload(String),

    #[error("Upload exceeds the maximum request size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error(transparent)]
    Decode(#[from] ImageError),

    #[error("Failed to stage image: {0}")]
    Staging(#[source] std::io::Error),

    #[error("{0:#}")]
    Engine(anyhow::Error),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl ExtractError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExtractError::MissingFile
            | ExtractError::EmptyFilename
            | ExtractError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ExtractError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractError::Decode(_)
            | ExtractError::Staging(_)
            | ExtractError::Engine(_)
            | ExtractError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the caller sent something we refuse, as opposed to a failure on our side
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    pub fn to_response(&self) -> ErrorResponse {
        let error = if self.is_client_error() {
            self.to_string()
        } else {
            format!("Failed to extract text: {}", self)
        };
        ErrorResponse { error }
    }
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
