// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload parsing for POST /extract-text

use axum::http::{header, HeaderMap, StatusCode};
use axum_extra::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;
use tracing::debug;

use crate::api::errors::ExtractError;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// The file part of an extraction request
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedImage {
    /// Pull the `image` file part out of a multipart body
    ///
    /// Other fields, and `image` fields that are not file parts, are
    /// skipped. No `image` file part at all is [`ExtractError::MissingFile`];
    /// a file part with a blank filename is [`ExtractError::EmptyFilename`].
    pub async fn from_multipart(mut multipart: Multipart, limit: usize) -> Result<Self, ExtractError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limit))?
        {
            if field.name() != Some(IMAGE_FIELD) {
                debug!("Skipping multipart field {:?}", field.name());
                continue;
            }

            let Some(filename) = field.file_name().map(str::to_string) else {
                debug!("Skipping non-file '{}' field", IMAGE_FIELD);
                continue;
            };
            if filename.is_empty() {
                return Err(ExtractError::EmptyFilename);
            }
            let content_type = field.content_type().map(str::to_string);

            let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

            return Ok(Self {
                filename,
                content_type,
                bytes,
            });
        }

        Err(ExtractError::MissingFile)
    }
}

/// Reject early when the declared body length already exceeds `limit`
pub fn check_content_length(headers: &HeaderMap, limit: usize) -> Result<(), ExtractError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());

    match declared {
        Some(len) if len > limit => Err(ExtractError::PayloadTooLarge { limit }),
        _ => Ok(()),
    }
}

fn multipart_error(err: MultipartError, limit: usize) -> ExtractError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ExtractError::PayloadTooLarge { limit }
    } else {
        ExtractError::InvalidUpload(err.body_text())
    }
}
