// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction API endpoint module
//!
//! Provides POST /extract-text for recognizing text in uploaded images.

pub mod handler;
pub mod pipeline;
pub mod request;
pub mod response;

pub use handler::extract_text_handler;
pub use pipeline::extract_text;
pub use request::{UploadedImage, IMAGE_FIELD};
pub use response::ExtractionResponse;
