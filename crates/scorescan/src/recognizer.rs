//! High-level recognition API.
//!
//! [`Recognizer`] is the primary entry point. It wraps a
//! [`RecognizeConfig`] and runs the full pipeline on decoded grids, 8-bit
//! images or `P2` files.

use image::GrayImage;
use std::path::Path;

use crate::config::RecognizeConfig;
use crate::grid::RawGrid;
use crate::pgm::{self, PgmError};
use crate::pipeline::{self, Recognition};

/// Primary recognition interface.
///
/// Create once, recognize many images.
///
/// # Examples
///
/// ```no_run
/// use scorescan::Recognizer;
/// use std::path::Path;
///
/// let recognizer = Recognizer::new();
/// let result = recognizer.recognize_file(Path::new("score.pgm")).unwrap();
/// println!("Found {} notes", result.note_count());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recognizer {
    config: RecognizeConfig,
}

impl Recognizer {
    /// Create a recognizer with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with full config control.
    pub fn with_config(config: RecognizeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecognizeConfig {
        &self.config
    }

    /// Mutable access to configuration for post-construction tuning.
    pub fn config_mut(&mut self) -> &mut RecognizeConfig {
        &mut self.config
    }

    /// Recognize a decoded grid.
    pub fn recognize(&self, raw: &RawGrid) -> Recognition {
        pipeline::run(raw, &self.config)
    }

    /// Recognize an image whose contrast is already normalized.
    pub fn recognize_normalized(&self, gray: &GrayImage) -> Recognition {
        pipeline::run_normalized(gray, &self.config)
    }

    /// Decode a `P2` raster and recognize it.
    pub fn recognize_str(&self, text: &str) -> Result<Recognition, PgmError> {
        Ok(self.recognize(&pgm::decode_str(text)?))
    }

    /// Read a `P2` file and recognize it.
    pub fn recognize_file(&self, path: &Path) -> Result<Recognition, PgmError> {
        tracing::info!("Loading image: {}", path.display());
        let raw = pgm::read_file(path)?;
        tracing::info!("Image size: {}x{}", raw.width(), raw.height());
        Ok(self.recognize(&raw))
    }
}
