// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decode → stage → recognize → aggregate
//!
//! Blocking; the HTTP handler runs it on the blocking pool, the CLI calls it
//! directly.

use tracing::{debug, info};

use super::response::ExtractionResponse;
use crate::api::errors::ExtractError;
use crate::vision::{decode_to_rgb, ImageStager, TextRecognizer};

/// Run one upload through the whole pipeline
///
/// The staged copy is removed before this returns, on success and on error.
pub fn extract_text(
    stager: &ImageStager,
    recognizer: &dyn TextRecognizer,
    upload: &[u8],
) -> Result<ExtractionResponse, ExtractError> {
    let (image, info) = decode_to_rgb(upload)?;
    debug!(
        "Decoded {:?} upload: {}x{}, {} bytes",
        info.format, info.width, info.height, info.size_bytes
    );

    let staged = stager.stage(&image).map_err(ExtractError::Staging)?;

    let detections = recognizer
        .recognize_file(staged.path())
        .map_err(ExtractError::Engine)?;

    let response = ExtractionResponse::from_detections(&detections);
    info!(
        "Extracted text with confidence {:.2}% ({} regions, engine: {})",
        response.confidence,
        detections.len(),
        recognizer.name()
    );

    Ok(response)
}
