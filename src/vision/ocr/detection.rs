// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text detection model
//!
//! Runs the DB detection network and turns its probability map into boxes
//! in canvas (640x640) coordinates.

use anyhow::{anyhow, Context, Result};
use ndarray::{Array4, ArrayView2, Axis, Ix2};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Default probability threshold for text pixels
pub const DEFAULT_DETECTION_THRESHOLD: f32 = 0.3;

/// Components at or below this many pixels are discarded as noise
pub const MIN_REGION_PIXELS: usize = 10;

/// Fraction of the box height added on each side
const BOX_MARGIN_RATIO: f32 = 0.3;

/// A detected text box in canvas coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Mean probability over the component's pixels
    pub confidence: f32,
}

impl TextBox {
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.confidence > 0.0
    }

    /// Grow the box by `margin` on every side, clipped at zero
    fn expanded(&self, margin: f32) -> Self {
        let x = (self.x - margin).max(0.0);
        let y = (self.y - margin).max(0.0);
        Self {
            x,
            y,
            width: self.x + self.width + margin - x,
            height: self.y + self.height + margin - y,
            confidence: self.confidence,
        }
    }
}

/// PaddleOCR detection network, CPU only
pub struct OcrDetectionModel {
    session: Mutex<Session>,
    input_name: String,
    threshold: f32,
}

impl std::fmt::Debug for OcrDetectionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrDetectionModel")
            .field("input_name", &self.input_name)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl OcrDetectionModel {
    /// Load the detection model (`det_model.onnx`)
    pub fn new(model_path: &Path, threshold: f32, intra_threads: usize) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("OCR detection model not found: {}", model_path.display());
        }

        info!("Loading OCR detection model from {}", model_path.display());

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
                    "Failed to load OCR detection model from {}",
                    model_path.display()
                )
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        debug!("Detection model input: {}", input_name);

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            threshold: threshold.clamp(0.0, 1.0),
        })
    }

    /// Detect text boxes in a `[1, 3, H, W]` tensor
    pub fn detect(&self, input: &Array4<f32>) -> Result<Vec<TextBox>> {
        let shape = input.shape();
        if shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, 3, H, W]", shape);
        }
        let (input_h, input_w) = (shape[2], shape[3]);

        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("OCR detection session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;

        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        // [1, 1, H, W] or [1, H, W]
        let mut map = output.view();
        while map.ndim() > 2 {
            map = map.index_axis_move(Axis(0), 0);
        }
        let map = map
            .into_dimensionality::<Ix2>()
            .context("Unexpected detection output shape")?;

        let (map_h, map_w) = map.dim();
        let scale_y = input_h as f32 / map_h as f32;
        let scale_x = input_w as f32 / map_w as f32;

        let boxes: Vec<TextBox> = extract_boxes(map, self.threshold)
            .into_iter()
            .map(|b| TextBox {
                x: b.x * scale_x,
                y: b.y * scale_y,
                width: b.width * scale_x,
                height: b.height * scale_y,
                confidence: b.confidence,
            })
            .collect();

        debug!("Detected {} text regions", boxes.len());
        Ok(boxes)
    }
}

/// Turn a probability map into reading-ordered boxes
///
/// Pixels at or above `threshold` are grouped into 4-connected components.
/// Components larger than [`MIN_REGION_PIXELS`] become boxes, expanded by a
/// margin proportional to their height and sorted top-to-bottom, then
/// left-to-right.
pub fn extract_boxes(map: ArrayView2<f32>, threshold: f32) -> Vec<TextBox> {
    let (height, width) = map.dim();
    let mut visited = vec![false; height * width];
    let mut boxes = Vec::new();
    let mut stack = Vec::new();

    for start_y in 0..height {
        for start_x in 0..width {
            if visited[start_y * width + start_x] || map[[start_y, start_x]] < threshold {
                continue;
            }

            let (mut min_x, mut max_x, mut min_y, mut max_y) = (start_x, start_x, start_y, start_y);
            let mut count = 0usize;
            let mut sum = 0.0f32;

            visited[start_y * width + start_x] = true;
            stack.push((start_x, start_y));

            while let Some((x, y)) = stack.pop() {
                count += 1;
                sum += map[[y, x]];
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);

                let neighbours = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in neighbours {
                    if nx < width
                        && ny < height
                        && !visited[ny * width + nx]
                        && map[[ny, nx]] >= threshold
                    {
                        visited[ny * width + nx] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            if count > MIN_REGION_PIXELS {
                let raw = TextBox {
                    x: min_x as f32,
                    y: min_y as f32,
                    width: (max_x - min_x + 1) as f32,
                    height: (max_y - min_y + 1) as f32,
                    confidence: sum / count as f32,
                };
                boxes.push(raw.expanded(raw.height * BOX_MARGIN_RATIO));
            }
        }
    }

    boxes.sort_by(|a, b| match a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal),
        other => other,
    });

    boxes
}
