// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text recognition engines
//!
//! The HTTP layer only talks to [`TextRecognizer`]; the PaddleOCR ONNX
//! pipeline in this module is one implementation of it.
//!
//! Components:
//! - `detection` - Text region detection (DB probability map)
//! - `recognition` - CTC text recognition of cropped regions
//! - `preprocessing` - Tensor preparation for both models
//! - `model` - Combined detection + recognition engine

pub mod detection;
pub mod model;
pub mod preprocessing;
pub mod recognition;

use anyhow::{Context, Result};
use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use detection::{OcrDetectionModel, TextBox};
pub use model::{OcrModelConfig, PaddleOcrModel, SUPPORTED_LANGUAGES};
pub use recognition::{OcrRecognitionModel, RecognizedText};

/// Bounding box of a detected region, in original image pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One text region reported by an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection {
    pub bounding_box: BoundingBox,
    /// Recognized text fragment
    pub text: String,
    /// Confidence probability (0.0-1.0)
    pub confidence: f32,
}

impl Detection {
    pub fn new(bounding_box: BoundingBox, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            bounding_box,
            text: text.into(),
            confidence,
        }
    }
}

/// A text recognition engine
///
/// Engines are constructed once at startup and shared read-only between
/// requests, so implementations must be safe to call from several threads.
/// Detections are returned in the engine's reading order; callers do not
/// re-sort them.
pub trait TextRecognizer: Send + Sync {
    /// Short engine identifier used in logs
    fn name(&self) -> &str;

    /// Language codes the engine was configured with at startup
    fn languages(&self) -> &[String];

    /// Recognize text in an RGB raster
    fn recognize_image(&self, image: &RgbImage) -> Result<Vec<Detection>>;

    /// Recognize text in an image file on disk
    fn recognize_file(&self, path: &Path) -> Result<Vec<Detection>> {
        let image = image::open(path)
            .with_context(|| format!("Failed to open staged image {}", path.display()))?
            .into_rgb8();
        self.recognize_image(&image)
    }
}
