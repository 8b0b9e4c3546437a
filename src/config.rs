// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Rendering configuration and dataset defaults.
//!
//! This module defines the [`VizConfig`] struct, which controls the fixed
//! resolutions, the heatmap threshold fraction and the title font used by
//! [`viz_sample`](crate::visualizer::viz_sample).

use std::path::PathBuf;

/// Folder containing the four `.npz` files for the training and test sets.
pub const DEFAULT_DATA_DIR: &str = "./data/";

/// Sample index visualized by the preview command.
pub const DEFAULT_SAMPLE_INDEX: usize = 10;

/// Configuration for heatmap rendering.
///
/// # Example
///
/// ```rust
/// use flic_heatmaps::VizConfig;
///
/// let config = VizConfig::new()
///     .with_low_res(60, 90)
///     .with_high_res(480, 720)
///     .with_threshold_fraction(0.55);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VizConfig {
    /// Size (height, width) the base image is resized to when not rendering
    /// at full resolution.
    pub low_res: (usize, usize),
    /// Size (height, width) every heatmap channel is resized to when
    /// rendering at full resolution.
    pub high_res: (usize, usize),
    /// Fraction of a channel's range below its maximum used for the joint
    /// threshold. The threshold is recorded but not applied.
    pub threshold_fraction: f32,
    /// TrueType font for the title. `None` falls back to the downloaded
    /// default font when the `annotate` feature is enabled.
    pub font: Option<PathBuf>,
    /// Title font size in pixels.
    pub title_font_size: f32,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            low_res: (60, 90),
            high_res: (480, 720),
            threshold_fraction: 0.55,
            font: None,
            title_font_size: 16.0,
        }
    }
}

impl VizConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the low resolution target for the base image.
    #[must_use]
    pub const fn with_low_res(mut self, height: usize, width: usize) -> Self {
        self.low_res = (height, width);
        self
    }

    /// Set the high resolution target for heatmap channels.
    #[must_use]
    pub const fn with_high_res(mut self, height: usize, width: usize) -> Self {
        self.high_res = (height, width);
        self
    }

    /// Set the threshold fraction.
    #[must_use]
    pub const fn with_threshold_fraction(mut self, fraction: f32) -> Self {
        self.threshold_fraction = fraction;
        self
    }

    /// Use a specific TrueType font for the title.
    #[must_use]
    pub fn with_font(mut self, font: impl Into<PathBuf>) -> Self {
        self.font = Some(font.into());
        self
    }

    /// Set the title font size in pixels.
    #[must_use]
    pub const fn with_title_font_size(mut self, size: f32) -> Self {
        self.title_font_size = size;
        self
    }
}
