// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text recognition model
//!
//! Reads the text of one cropped region with a CTC recognition network.

use anyhow::{anyhow, Context, Result};
use ndarray::{Array4, ArrayView2, Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use super::preprocessing::REC_INPUT_HEIGHT;

/// Recognized text with confidence score
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    /// Mean of the per-character maxima (0.0-1.0)
    pub confidence: f32,
}

impl RecognizedText {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// PaddleOCR recognition network for one language, CPU only
pub struct OcrRecognitionModel {
    language: String,
    session: Mutex<Session>,
    dictionary: Vec<char>,
    input_name: String,
}

impl std::fmt::Debug for OcrRecognitionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrRecognitionModel")
            .field("language", &self.language)
            .field("dictionary_size", &self.dictionary.len())
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl OcrRecognitionModel {
    /// Load a recognition model and its character dictionary
    pub fn new(
        language: &str,
        model_path: &Path,
        dict_path: &Path,
        intra_threads: usize,
    ) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("OCR recognition model not found: {}", model_path.display());
        }
        if !dict_path.exists() {
            anyhow::bail!("OCR character dictionary not found: {}", dict_path.display());
        }

        let dictionary = load_dictionary(dict_path)?;
        info!(
            "Loading OCR recognition model for '{}' from {} ({} characters)",
            language,
            model_path.display(),
            dictionary.len()
        );

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!(
                    "Failed to load OCR recognition model from {}",
                    model_path.display()
                )
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        Ok(Self {
            language: language.to_string(),
            session: Mutex::new(session),
            dictionary,
            input_name,
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Recognize a `[1, 3, 48, W]` tensor
    pub fn recognize(&self, input: &Array4<f32>) -> Result<RecognizedText> {
        let shape = input.shape();
        if shape[0] != 1 || shape[1] != 3 || shape[2] != REC_INPUT_HEIGHT as usize || shape[3] < 4
        {
            anyhow::bail!(
                "Invalid input shape: {:?}, expected [1, 3, {}, W>=4]",
                shape,
                REC_INPUT_HEIGHT
            );
        }

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("OCR recognition session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Recognition inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        // [1, T, C] or [T, C]
        let mut probs = output.view();
        while probs.ndim() > 2 {
            probs = probs.index_axis_move(Axis(0), 0);
        }
        let probs = probs
            .into_dimensionality::<Ix2>()
            .context("Unexpected recognition output shape")?;

        let result = ctc_greedy_decode(probs, &self.dictionary);
        debug!(
            "Recognized '{}' ({:.3}) with {} model",
            result.text, result.confidence, self.language
        );
        Ok(result)
    }
}

/// Load a one-character-per-line dictionary; index 0 is the CTC blank
pub fn load_dictionary(path: &Path) -> Result<Vec<char>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to open dictionary: {}", path.display()))?;

    let mut dictionary = vec!['\0'];
    dictionary.extend(contents.lines().filter_map(|line| line.chars().next()));

    if !dictionary[1..].contains(&' ') {
        dictionary.push(' ');
    }

    Ok(dictionary)
}

/// Best-path CTC decoding over a `[T, C]` probability matrix
///
/// Takes the argmax class at each step, drops blanks (class 0) and collapses
/// repeats that are not separated by a blank. Confidence is the mean of the
/// kept maxima, clamped to [0, 1]; zero when nothing is kept.
pub fn ctc_greedy_decode(probs: ArrayView2<f32>, dictionary: &[char]) -> RecognizedText {
    let mut text = String::new();
    let mut kept = Vec::new();
    let mut prev: Option<usize> = None;

    for step in probs.rows() {
        let (best, best_prob) = step
            .iter()
            .copied()
            .enumerate()
            .fold((0usize, f32::NEG_INFINITY), |acc, (i, p)| {
                if p > acc.1 {
                    (i, p)
                } else {
                    acc
                }
            });

        if best != 0 && prev != Some(best) {
            if let Some(&ch) = dictionary.get(best) {
                text.push(ch);
                kept.push(best_prob);
            }
        }

        prev = (best != 0).then_some(best);
    }

    let confidence = if kept.is_empty() {
        0.0
    } else {
        (kept.iter().sum::<f32>() / kept.len() as f32).clamp(0.0, 1.0)
    };

    RecognizedText { text, confidence }
}
