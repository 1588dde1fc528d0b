// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Text Extractor API

/// Human-readable service name, used in the health message
pub const SERVICE_NAME: &str = "Text Extractor API";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "multipart-upload",
    "rgb-normalisation",
    "per-request-staging",
    "paddleocr-onnx",
    "multi-language-recognition",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", SERVICE_NAME, VERSION_NUMBER)
}
