// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Layered drawing surface.
//!
//! A [`Canvas`] collects a base image and heatmap overlays the way a plotting
//! axis collects artists, and rasterizes them on demand. Callers own the
//! canvas and pass it explicitly; [`Canvas::scope`] hands out a guard that
//! clears it when dropped.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use std::ops::{Deref, DerefMut};

use image::{Rgba, RgbaImage};
use ndarray::{Array2, Array3, ArrayView2};

use crate::error::{FlicError, Result};
use crate::preprocessing::array_to_image;
use crate::visualizer::color::ColorRamp;

/// Background where no layer is drawn.
const BACKGROUND: [f32; 3] = [1.0, 1.0, 1.0];

/// Heatmap channel drawn through a color ramp.
#[derive(Debug, Clone)]
pub struct HeatmapLayer {
    /// Joint (channel) index the layer was built from.
    pub joint: usize,
    /// Channel values after division by their maximum.
    pub data: Array2<f32>,
    /// Transparent-to-color ramp for the joint.
    pub ramp: ColorRamp,
    /// Joint threshold computed from the raw channel. Not used for drawing.
    pub threshold: f32,
}

impl HeatmapLayer {
    /// (height, width) of the layer.
    #[must_use]
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}

/// One drawn element of a canvas.
#[derive(Debug, Clone)]
pub enum Layer {
    /// Opaque (H, W, 3) base image.
    Image(Array3<f32>),
    /// Semi-transparent heatmap overlay.
    Heatmap(HeatmapLayer),
}

impl Layer {
    /// (height, width) covered by the layer, anchored at the origin.
    #[must_use]
    pub fn extent(&self) -> (usize, usize) {
        match self {
            Self::Image(image) => {
                let (h, w, _) = image.dim();
                (h, w)
            }
            Self::Heatmap(heatmap) => heatmap.dim(),
        }
    }
}

/// Drawing surface holding layers in draw order plus an optional title.
#[derive(Debug, Default)]
pub struct Canvas {
    layers: Vec<Layer>,
    title: Option<String>,
}

impl Canvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw an opaque (H, W, 3) image.
    ///
    /// # Errors
    ///
    /// Returns [`FlicError::ShapeMismatch`] if the image does not have three
    /// color channels.
    pub fn imshow(&mut self, image: Array3<f32>) -> Result<()> {
        if image.dim().2 != 3 {
            return Err(FlicError::ShapeMismatch(format!(
                "expected an (H, W, 3) image, got {:?}",
                image.shape()
            )));
        }
        self.layers.push(Layer::Image(image));
        Ok(())
    }

    /// Draw a heatmap overlay on top of everything drawn so far.
    pub fn overlay(&mut self, layer: HeatmapLayer) {
        self.layers.push(Layer::Heatmap(layer));
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Current title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Layers in draw order.
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Whether nothing has been drawn and no title is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.title.is_none()
    }

    /// Remove all layers and the title.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.title = None;
    }

    /// Borrow the canvas for one drawing; it is cleared when the guard drops.
    pub fn scope(&mut self) -> CanvasScope<'_> {
        CanvasScope { canvas: self }
    }

    /// (height, width) covering every layer.
    #[must_use]
    pub fn extent(&self) -> (usize, usize) {
        self.layers.iter().map(Layer::extent).fold((0, 0), |(h, w), (lh, lw)| {
            (h.max(lh), w.max(lw))
        })
    }

    /// Rasterize all layers, one pixel per data cell.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been drawn or the extent exceeds
    /// `u32::MAX`.
    pub fn render(&self) -> Result<RgbaImage> {
        let (height, width) = self.extent();
        if height == 0 || width == 0 {
            return Err(FlicError::VisualizerError(
                "nothing to render on an empty canvas".to_string(),
            ));
        }

        let mut pixels = vec![BACKGROUND; height * width];
        for layer in &self.layers {
            match layer {
                Layer::Image(image) => paint_image(&mut pixels, width, image)?,
                Layer::Heatmap(heatmap) => paint_heatmap(&mut pixels, width, heatmap),
            }
        }

        let frame_w = u32::try_from(width)
            .map_err(|_| FlicError::ImageError("Frame width exceeds u32::MAX".to_string()))?;
        let frame_h = u32::try_from(height)
            .map_err(|_| FlicError::ImageError("Frame height exceeds u32::MAX".to_string()))?;

        Ok(RgbaImage::from_fn(frame_w, frame_h, |x, y| {
            let [r, g, b] = pixels[y as usize * width + x as usize];
            Rgba([to_u8(r), to_u8(g), to_u8(b), 255])
        }))
    }
}

/// Guard returned by [`Canvas::scope`].
pub struct CanvasScope<'a> {
    canvas: &'a mut Canvas,
}

impl Deref for CanvasScope<'_> {
    type Target = Canvas;

    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for CanvasScope<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

impl Drop for CanvasScope<'_> {
    fn drop(&mut self) {
        self.canvas.clear();
    }
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).clamp(0.0, 255.0).round() as u8
}

fn paint_image(pixels: &mut [[f32; 3]], stride: usize, image: &Array3<f32>) -> Result<()> {
    let rgb = array_to_image(image.view())?;
    for (x, y, p) in rgb.enumerate_pixels() {
        pixels[y as usize * stride + x as usize] = [
            f32::from(p[0]) / 255.0,
            f32::from(p[1]) / 255.0,
            f32::from(p[2]) / 255.0,
        ];
    }
    Ok(())
}

/// Composite a heatmap with straight alpha. The ramp position is the value
/// rescaled to the layer's own finite min..max.
fn paint_heatmap(pixels: &mut [[f32; 3]], stride: usize, layer: &HeatmapLayer) {
    let Some((lo, hi)) = finite_range(layer.data.view()) else {
        return;
    };
    if hi <= lo {
        return;
    }

    for ((y, x), &v) in layer.data.indexed_iter() {
        if !v.is_finite() {
            continue;
        }
        let [r, g, b, a] = layer.ramp.sample((v - lo) / (hi - lo));
        let dst = &mut pixels[y * stride + x];
        dst[0] = r.mul_add(a, dst[0] * (1.0 - a));
        dst[1] = g.mul_add(a, dst[1] * (1.0 - a));
        dst[2] = b.mul_add(a, dst[2] * (1.0 - a));
    }
}

/// Minimum and maximum of the finite values, if any.
pub(crate) fn finite_range(data: ArrayView2<'_, f32>) -> Option<(f32, f32)> {
    data.iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
