// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction endpoint handler

use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, error, info_span, warn, Instrument, Span};
use uuid::Uuid;

use super::pipeline;
use super::request::{check_content_length, UploadedImage};
use super::response::ExtractionResponse;
use crate::api::errors::ExtractError;
use crate::api::http_server::AppState;

/// POST /extract-text - Extract text from an uploaded image
///
/// # Request
/// `multipart/form-data` with the image as a file part named `image`.
///
/// # Response
/// - `success`: always `true`
/// - `text`: recognized fragments joined by single spaces
/// - `confidence`: average region confidence as a percentage (two decimals)
/// - `character_count`: number of characters in `text`
///
/// # Errors
/// - 400 Bad Request: no `image` file part, or an empty filename
/// - 413 Payload Too Large: body over the configured limit
/// - 500 Internal Server Error: decode, staging or recognition failed
pub async fn extract_text_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ExtractionResponse>, ExtractError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("extract_text", %request_id);

    let result = extract(state, headers, multipart).instrument(span.clone()).await;

    if let Err(e) = &result {
        span.in_scope(|| {
            if e.is_client_error() {
                warn!("Rejected extraction request: {}", e);
            } else {
                error!("Text extraction failed: {}", e);
            }
        });
    }

    result.map(Json)
}

async fn extract(
    state: AppState,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ExtractionResponse, ExtractError> {
    let limit = state.max_upload_bytes;
    check_content_length(&headers, limit)?;

    let multipart = multipart.map_err(|rejection| {
        debug!("Not a multipart request: {}", rejection);
        ExtractError::MissingFile
    })?;

    let upload = UploadedImage::from_multipart(multipart, limit).await?;
    debug!(
        "Received '{}' ({} bytes, {:?})",
        upload.filename,
        upload.bytes.len(),
        upload.content_type
    );

    let span = Span::current();
    tokio::task::spawn_blocking(move || {
        span.in_scope(|| {
            pipeline::extract_text(&state.stager, state.recognizer.as_ref(), &upload.bytes)
        })
    })
    .await
    .map_err(|e| ExtractError::Task(e.to_string()))?
}
