// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request-scoped staging of normalised uploads
//!
//! Every upload is written to its own uniquely named file inside the working
//! directory. The file lives as long as the returned [`StagedImage`] and is
//! removed when it is dropped, whichever way the request ends.

use image::{ImageFormat, RgbImage};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const STAGED_PREFIX: &str = "upload-";
const STAGED_SUFFIX: &str = ".png";

/// Writes decoded uploads into the working directory
#[derive(Debug, Clone)]
pub struct ImageStager {
    dir: PathBuf,
}

impl ImageStager {
    /// Create a stager rooted at `dir`, creating the directory if absent
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Working directory used for staged files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `image` as a lossless PNG under a fresh name
    pub fn stage(&self, image: &RgbImage) -> io::Result<StagedImage> {
        let file = tempfile::Builder::new()
            .prefix(STAGED_PREFIX)
            .suffix(STAGED_SUFFIX)
            .tempfile_in(&self.dir)?;

        image
            .save_with_format(file.path(), ImageFormat::Png)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        debug!(
            "Staged {}x{} image at {}",
            image.width(),
            image.height(),
            file.path().display()
        );

        Ok(StagedImage { file })
    }
}

/// A staged upload, deleted on drop
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
