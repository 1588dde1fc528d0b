// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tensor preparation for the PaddleOCR models

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::Array4;

/// Square canvas side for the detection model
pub const DET_INPUT_SIZE: u32 = 640;

/// Recognition model input height
pub const REC_INPUT_HEIGHT: u32 = 48;

/// Recognition input width bounds
pub const REC_MIN_WIDTH: u32 = 4;
pub const REC_MAX_WIDTH: u32 = 320;

/// ImageNet normalisation
pub const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const STD: [f32; 3] = [0.229, 0.224, 0.225];

const PAD_GRAY: Rgb<u8> = Rgb([128, 128, 128]);

/// Geometry of the letterboxed detection canvas
///
/// Maps detection-space coordinates back onto the original image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessInfo {
    pub scale: f32,
    pub offset_x: u32,
    pub offset_y: u32,
    pub original_width: u32,
    pub original_height: u32,
}

impl PreprocessInfo {
    pub fn new(original_width: u32, original_height: u32, target_size: u32) -> Self {
        if original_width == 0 || original_height == 0 {
            return Self {
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
                original_width,
                original_height,
            };
        }

        let scale = (target_size as f32 / original_width as f32)
            .min(target_size as f32 / original_height as f32);
        let (new_w, new_h) = scaled_dims(original_width, original_height, scale);

        Self {
            scale,
            offset_x: (target_size - new_w.min(target_size)) / 2,
            offset_y: (target_size - new_h.min(target_size)) / 2,
            original_width,
            original_height,
        }
    }

    /// Map a point from canvas space to original image space
    pub fn map_to_original(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.offset_x as f32) / self.scale,
            (y - self.offset_y as f32) / self.scale,
        )
    }
}

fn scaled_dims(width: u32, height: u32, scale: f32) -> (u32, u32) {
    (
        ((width as f32 * scale).round() as u32).max(1),
        ((height as f32 * scale).round() as u32).max(1),
    )
}

/// Letterbox `image` into a gray `target_size` square
pub fn resize_with_padding(image: &RgbImage, target_size: u32) -> (RgbImage, PreprocessInfo) {
    let (w, h) = image.dimensions();
    let info = PreprocessInfo::new(w, h, target_size);
    let mut canvas = RgbImage::from_pixel(target_size, target_size, PAD_GRAY);

    if w == 0 || h == 0 {
        return (canvas, info);
    }

    let (new_w, new_h) = scaled_dims(w, h, info.scale);
    let resized = imageops::resize(
        image,
        new_w.min(target_size),
        new_h.min(target_size),
        FilterType::Lanczos3,
    );
    imageops::replace(
        &mut canvas,
        &resized,
        info.offset_x as i64,
        info.offset_y as i64,
    );

    (canvas, info)
}

/// Normalise an RGB raster into an NCHW `[1, 3, H, W]` tensor
pub fn to_nchw_tensor(image: &RgbImage) -> Array4<f32> {
    let (w, h) = image.dimensions();
    let mut tensor = Array4::zeros((1, 3, h as usize, w as usize));

    for (x, y, pixel) in image.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
        }
    }

    tensor
}

/// Detection input: letterboxed 640x640 tensor plus its geometry
pub fn preprocess_for_detection(image: &RgbImage) -> (Array4<f32>, PreprocessInfo) {
    let (canvas, info) = resize_with_padding(image, DET_INPUT_SIZE);
    (to_nchw_tensor(&canvas), info)
}

/// Recognition input: crop resized to height 48 with aspect-scaled width
pub fn preprocess_for_recognition(crop: &RgbImage) -> Array4<f32> {
    let (w, h) = crop.dimensions();
    let scale = REC_INPUT_HEIGHT as f32 / h.max(1) as f32;
    let width = ((w as f32 * scale).round() as u32).clamp(REC_MIN_WIDTH, REC_MAX_WIDTH);

    let resized = imageops::resize(crop, width, REC_INPUT_HEIGHT, FilterType::Lanczos3);
    to_nchw_tensor(&resized)
}
