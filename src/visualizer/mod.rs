// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Visualization of images and their joint heatmaps.

/// Layered drawing surface.
pub mod canvas;

/// Color definitions and ramps.
pub mod color;

/// Per-joint heatmap overlays.
pub mod heatmap;

#[cfg(feature = "visualize")]
pub mod viewer;

pub use canvas::{Canvas, CanvasScope, HeatmapLayer, Layer};
pub use color::{Color, ColorRamp};
pub use heatmap::{Figure, VizOptions, compose_sample, viz_sample};

#[cfg(feature = "visualize")]
pub use viewer::Viewer;
