// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::vision::ocr::detection::DEFAULT_DETECTION_THRESHOLD;
use crate::vision::OcrModelConfig;

/// Recognition engine settings, shared by the server and the CLI
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Directory containing det_model.onnx, rec_<lang>.onnx and dict_<lang>.txt
    #[arg(long, env = "OCR_MODEL_DIR", default_value = "./models/paddleocr-onnx")]
    pub model_dir: PathBuf,

    /// Comma-separated recognition languages (en, zh, ja, ko)
    #[arg(long, env = "OCR_LANGUAGES", value_delimiter = ',', default_value = "en")]
    pub languages: Vec<String>,

    /// Probability threshold for text pixels in the detection map
    #[arg(long, env = "OCR_DETECTION_THRESHOLD", default_value_t = DEFAULT_DETECTION_THRESHOLD)]
    pub detection_threshold: f32,

    /// ONNX Runtime threads per model session
    #[arg(long, env = "OCR_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,
}

impl EngineArgs {
    pub fn validate(&self) -> Result<()> {
        if !(self.detection_threshold > 0.0 && self.detection_threshold < 1.0) {
            anyhow::bail!(
                "detection threshold must be between 0 and 1, got {}",
                self.detection_threshold
            );
        }
        if self.intra_threads == 0 {
            anyhow::bail!("intra threads must be at least 1");
        }
        self.to_model_config().validate()
    }

    pub fn to_model_config(&self) -> OcrModelConfig {
        OcrModelConfig {
            model_dir: self.model_dir.clone(),
            languages: self
                .languages
                .iter()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty())
                .collect(),
            detection_threshold: self.detection_threshold,
            intra_threads: self.intra_threads,
        }
    }
}
