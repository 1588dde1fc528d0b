// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling and text recognition
//!
//! This module provides:
//! - Decoding of uploads into RGB rasters
//! - Request-scoped staging of decoded images on disk
//! - The [`ocr::TextRecognizer`] capability and its PaddleOCR implementation

pub mod image_utils;
pub mod ocr;
pub mod staging;

pub use image_utils::{decode_image_bytes, decode_to_rgb, detect_format, ImageError, ImageInfo};
pub use ocr::{BoundingBox, Detection, OcrModelConfig, PaddleOcrModel, TextRecognizer};
pub use staging::{ImageStager, StagedImage};
