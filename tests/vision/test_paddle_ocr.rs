// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! PaddleOCR engine loading and, when the models are downloaded, inference

use image::{Rgb, RgbImage};
use std::path::PathBuf;
use text_extractor::vision::ocr::model::models_present;
use text_extractor::vision::{OcrModelConfig, PaddleOcrModel, TextRecognizer};

fn model_dir() -> PathBuf {
    std::env::var("OCR_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./models/paddleocr-onnx"))
}

#[test]
fn test_load_fails_without_models() {
    let dir = tempfile::tempdir().unwrap();
    let config = OcrModelConfig {
        model_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    let err = PaddleOcrModel::load(&config).unwrap_err();
    assert!(
        err.to_string().contains("det_model.onnx"),
        "error should name the missing file: {}",
        err
    );
}

#[test]
fn test_load_rejects_unsupported_language_first() {
    let dir = tempfile::tempdir().unwrap();
    let config = OcrModelConfig {
        model_dir: dir.path().to_path_buf(),
        languages: vec!["xx".to_string()],
        ..Default::default()
    };

    let err = PaddleOcrModel::load(&config).unwrap_err();
    assert!(err.to_string().contains("unsupported OCR language"));
}

#[test]
#[ignore] // Requires PaddleOCR ONNX models in OCR_MODEL_DIR
fn test_blank_image_has_no_text() {
    let config = OcrModelConfig {
        model_dir: model_dir(),
        ..Default::default()
    };
    if !models_present(&config) {
        println!("Skipping: models not found in {}", config.model_dir.display());
        return;
    }

    let model = PaddleOcrModel::load(&config).unwrap();
    assert_eq!(model.name(), "paddleocr");
    assert_eq!(model.languages(), ["en".to_string()]);

    let blank = RgbImage::from_pixel(320, 120, Rgb([255, 255, 255]));
    let detections = model.recognize_image(&blank).unwrap();
    assert!(detections.is_empty());
}

#[test]
#[ignore] // Requires PaddleOCR ONNX models in OCR_MODEL_DIR
fn test_detections_are_within_image() {
    let config = OcrModelConfig {
        model_dir: model_dir(),
        ..Default::default()
    };
    if !models_present(&config) {
        return;
    }

    let model = PaddleOcrModel::load(&config).unwrap();
    let mut image = RgbImage::from_pixel(400, 100, Rgb([255, 255, 255]));
    for x in 40..360 {
        for y in 40..60 {
            if (x / 8) % 2 == 0 {
                image.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }

    for detection in model.recognize_image(&image).unwrap() {
        let b = detection.bounding_box;
        assert!(b.x + b.width <= 400 && b.y + b.height <= 100);
        assert!((0.0..=1.0).contains(&detection.confidence));
        assert!(!detection.text.is_empty());
    }
}
