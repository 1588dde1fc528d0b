// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR engine: detection followed by per-region recognition

use anyhow::{Context, Result};
use image::{imageops, RgbImage};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use super::detection::{OcrDetectionModel, TextBox, DEFAULT_DETECTION_THRESHOLD};
use super::preprocessing::{preprocess_for_detection, preprocess_for_recognition, PreprocessInfo};
use super::recognition::{OcrRecognitionModel, RecognizedText};
use super::{BoundingBox, Detection, TextRecognizer};

/// Languages that ship with a PaddleOCR recognition model
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "zh", "ja", "ko"];

const DETECTION_MODEL_FILE: &str = "det_model.onnx";

/// Settings for loading the engine, fixed for the life of the process
#[derive(Debug, Clone)]
pub struct OcrModelConfig {
    /// Directory holding `det_model.onnx`, `rec_<lang>.onnx`, `dict_<lang>.txt`
    pub model_dir: PathBuf,
    /// Recognition languages, in preference order
    pub languages: Vec<String>,
    pub detection_threshold: f32,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
}

impl Default for OcrModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./models/paddleocr-onnx"),
            languages: vec!["en".to_string()],
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            intra_threads: 4,
        }
    }
}

impl OcrModelConfig {
    pub fn detection_model_path(&self) -> PathBuf {
        self.model_dir.join(DETECTION_MODEL_FILE)
    }

    pub fn recognition_model_path(&self, language: &str) -> PathBuf {
        self.model_dir.join(format!("rec_{}.onnx", language))
    }

    pub fn dictionary_path(&self, language: &str) -> PathBuf {
        self.model_dir.join(format!("dict_{}.txt", language))
    }

    /// Check languages before any model file is touched
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            anyhow::bail!("at least one OCR language must be configured");
        }
        for language in &self.languages {
            if !SUPPORTED_LANGUAGES.contains(&language.as_str()) {
                anyhow::bail!(
                    "unsupported OCR language '{}', supported: {:?}",
                    language,
                    SUPPORTED_LANGUAGES
                );
            }
        }
        Ok(())
    }
}

/// PaddleOCR detection + recognition on CPU
#[derive(Debug)]
pub struct PaddleOcrModel {
    detector: OcrDetectionModel,
    recognizers: Vec<OcrRecognitionModel>,
    languages: Vec<String>,
}

impl PaddleOcrModel {
    /// Load every model named by `config`
    pub fn load(config: &OcrModelConfig) -> Result<Self> {
        config.validate()?;

        let detector = OcrDetectionModel::new(
            &config.detection_model_path(),
            config.detection_threshold,
            config.intra_threads,
        )?;

        let recognizers = config
            .languages
            .iter()
            .map(|language| {
                OcrRecognitionModel::new(
                    language,
                    &config.recognition_model_path(language),
                    &config.dictionary_path(language),
                    config.intra_threads,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "✅ PaddleOCR loaded from {} (languages: {})",
            config.model_dir.display(),
            config.languages.join(", ")
        );

        Ok(Self {
            detector,
            recognizers,
            languages: config.languages.clone(),
        })
    }

    /// Best non-empty reading of `crop` across all language models
    fn read_region(&self, crop: &RgbImage) -> Result<Option<RecognizedText>> {
        let input = preprocess_for_recognition(crop);
        let mut best: Option<RecognizedText> = None;

        for recognizer in &self.recognizers {
            let reading = recognizer
                .recognize(&input)
                .with_context(|| format!("{} recognition failed", recognizer.language()))?;
            if reading.is_empty() {
                continue;
            }
            if best.as_ref().map_or(true, |b| reading.confidence > b.confidence) {
                best = Some(reading);
            }
        }

        Ok(best)
    }
}

/// Map a canvas-space box onto the original image, clamped to its bounds
pub fn to_original_box(text_box: &TextBox, info: &PreprocessInfo) -> Option<BoundingBox> {
    let (x0, y0) = info.map_to_original(text_box.x, text_box.y);
    let (x1, y1) = info.map_to_original(text_box.x + text_box.width, text_box.y + text_box.height);

    let max_w = info.original_width as f32;
    let max_h = info.original_height as f32;
    let (x0, x1) = (x0.clamp(0.0, max_w), x1.clamp(0.0, max_w));
    let (y0, y1) = (y0.clamp(0.0, max_h), y1.clamp(0.0, max_h));

    let x = x0.floor() as u32;
    let y = y0.floor() as u32;
    let width = (x1.ceil() as u32).saturating_sub(x);
    let height = (y1.ceil() as u32).saturating_sub(y);

    (width > 0 && height > 0).then_some(BoundingBox { x, y, width, height })
}

impl TextRecognizer for PaddleOcrModel {
    fn name(&self) -> &str {
        "paddleocr"
    }

    fn languages(&self) -> &[String] {
        &self.languages
    }

    fn recognize_image(&self, image: &RgbImage) -> Result<Vec<Detection>> {
        let started = Instant::now();
        let (tensor, info) = preprocess_for_detection(image);
        let boxes = self.detector.detect(&tensor)?;

        let mut detections = Vec::with_capacity(boxes.len());
        for text_box in boxes.iter().filter(|b| b.is_valid()) {
            let Some(region) = to_original_box(text_box, &info) else {
                continue;
            };
            let crop = imageops::crop_imm(image, region.x, region.y, region.width, region.height)
                .to_image();

            if let Some(reading) = self.read_region(&crop)? {
                detections.push(Detection::new(region, reading.text, reading.confidence));
            }
        }

        debug!(
            "PaddleOCR: {} boxes, {} readings in {}ms",
            boxes.len(),
            detections.len(),
            started.elapsed().as_millis()
        );

        Ok(detections)
    }
}

/// Whether every model file for `config` is present
pub fn models_present(config: &OcrModelConfig) -> bool {
    config.detection_model_path().exists()
        && config.languages.iter().all(|lang| {
            config.recognition_model_path(lang).exists() && config.dictionary_path(lang).exists()
        })
}
