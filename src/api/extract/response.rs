// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Extraction response and the aggregation of engine detections

use serde::{Deserialize, Serialize};

use crate::vision::Detection;

/// Successful response of POST /extract-text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResponse {
    pub success: bool,
    /// All fragments joined by a single space, trimmed
    pub text: String,
    /// Mean per-region confidence as a percentage, two decimals
    pub confidence: f64,
    /// Characters (not bytes) in `text`
    pub character_count: usize,
}

impl ExtractionResponse {
    /// Aggregate detections in engine order
    ///
    /// No detections gives empty text and a confidence of 0.
    pub fn from_detections(detections: &[Detection]) -> Self {
        let joined = detections
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let text = joined.trim().to_string();

        let percentages: Vec<f64> = detections
            .iter()
            .map(|d| confidence_percent(d.confidence))
            .collect();
        let average = if percentages.is_empty() {
            0.0
        } else {
            percentages.iter().sum::<f64>() / percentages.len() as f64
        };

        let character_count = text.chars().count();

        Self {
            success: true,
            text,
            confidence: round2(average),
            character_count,
        }
    }
}

/// Probability in [0,1] to a percentage rounded to two decimals
pub fn confidence_percent(probability: f32) -> f64 {
    round2(f64::from(probability) * 100.0)
}

/// Two decimals, exact ties to even (12.125 -> 12.12)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
