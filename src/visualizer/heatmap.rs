// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Per-joint heatmap overlays.
//!
//! [`viz_sample`] draws an image, overlays each heatmap channel in its
//! joint's color, optionally saves the figure, and always leaves the canvas
//! empty afterwards.

use std::path::PathBuf;

use image::RgbaImage;
use ndarray::{Array2, Array3, ArrayView3, Axis};

use crate::config::VizConfig;
use crate::error::Result;
use crate::io::save_figure;
use crate::joints::joint;
use crate::preprocessing::{chw_to_hwc, resize_channel, resize_image};
use crate::visualizer::canvas::{Canvas, HeatmapLayer, finite_range};
use crate::visualizer::color::ColorRamp;

/// Title used when the sample has no name.
pub const DEFAULT_TITLE: &str = "Image with targets on top";

/// Per-call options of [`viz_sample`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VizOptions {
    /// Sample name, shown in the title and used as the file stem.
    pub name: Option<String>,
    /// Directory the figure is saved under (in `images/`).
    pub save_dir: Option<PathBuf>,
    /// Inputs are channel-first: (3, H, W) and (J, H, W).
    pub permute: bool,
    /// Keep the image size and upscale the heatmap channels instead of
    /// shrinking the image.
    pub full_res: bool,
}

impl VizOptions {
    /// Options with everything off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sample name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the save directory.
    #[must_use]
    pub fn with_save_dir(mut self, save_dir: impl Into<PathBuf>) -> Self {
        self.save_dir = Some(save_dir.into());
        self
    }

    /// Treat inputs as channel-first.
    #[must_use]
    pub const fn with_permute(mut self, permute: bool) -> Self {
        self.permute = permute;
        self
    }

    /// Render at full resolution.
    #[must_use]
    pub const fn with_full_res(mut self, full_res: bool) -> Self {
        self.full_res = full_res;
        self
    }

    /// Name, if set and non-empty.
    fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Title for the figure.
    #[must_use]
    pub fn title(&self) -> String {
        self.display_name().map_or_else(
            || DEFAULT_TITLE.to_string(),
            |name| format!("Displaying targets: {name}"),
        )
    }
}

/// A rendered figure.
#[derive(Debug, Clone)]
pub struct Figure {
    /// Rendered pixels, including the title band when a font was available.
    pub frame: RgbaImage,
    /// Figure title.
    pub title: String,
    /// Where the figure was saved, if it was.
    pub saved_to: Option<PathBuf>,
}

/// Draw `image` and every channel of `heatmap` onto `canvas` without
/// rendering or clearing it.
///
/// # Errors
///
/// Returns [`FlicError::ShapeMismatch`](crate::FlicError::ShapeMismatch)
/// for malformed inputs and [`FlicError::IndexError`](crate::FlicError::IndexError)
/// if the heatmap has more channels than there are configured joints. Layers
/// drawn before the error stay on the canvas.
pub fn compose_sample(
    canvas: &mut Canvas,
    image: ArrayView3<'_, f32>,
    heatmap: ArrayView3<'_, f32>,
    opts: &VizOptions,
    config: &VizConfig,
) -> Result<()> {
    let (image, heatmap): (Array3<f32>, Array3<f32>) = if opts.permute {
        (chw_to_hwc(image), chw_to_hwc(heatmap))
    } else {
        (image.to_owned(), heatmap.to_owned())
    };

    let image = if opts.full_res {
        image
    } else {
        resize_image(image.view(), config.low_res)?
    };

    canvas.imshow(image)?;
    canvas.set_title(opts.title());

    for (i, channel) in heatmap.axis_iter(Axis(2)).enumerate() {
        let ramp = ColorRamp::transparent_to(joint(i)?.color);

        let channel = if opts.full_res {
            resize_channel(channel, config.high_res)?
        } else {
            channel.to_owned()
        };

        let (min, max) = finite_range(channel.view()).unwrap_or((f32::NAN, f32::NAN));

        // Compatibility: the threshold is computed and kept on the layer but
        // never masks the data, so the full channel is drawn. This matches
        // the established output and is probably a latent bug.
        let threshold = max - (max - min) * config.threshold_fraction;

        // A zero or missing maximum normalizes to NaN and draws nothing. A
        // negative maximum flips the sign, so the ramp runs the other way.
        let data = if max.is_finite() && max != 0.0 {
            channel.mapv(|v| v / max)
        } else {
            Array2::from_elem(channel.dim(), f32::NAN)
        };

        canvas.overlay(HeatmapLayer {
            joint: i,
            data,
            ramp,
            threshold,
        });
    }

    Ok(())
}

/// Render one image with its per-joint heatmap overlays.
///
/// The figure is saved to `{save_dir}/images/{name}.png` when both a name and
/// a save directory are given. The canvas is cleared on every return path.
///
/// # Errors
///
/// Returns the errors of [`compose_sample`], plus rendering, font and save
/// failures.
pub fn viz_sample(
    canvas: &mut Canvas,
    image: ArrayView3<'_, f32>,
    heatmap: ArrayView3<'_, f32>,
    opts: &VizOptions,
    config: &VizConfig,
) -> Result<Figure> {
    let mut scope = canvas.scope();
    compose_sample(&mut scope, image, heatmap, opts, config)?;

    let title = scope.title().unwrap_or(DEFAULT_TITLE).to_string();
    let frame = scope.render()?;

    #[cfg(feature = "annotate")]
    let frame = match &config.font {
        Some(path) => {
            let font = crate::font::TitleFont::load(path, config.title_font_size)?;
            crate::font::draw_title(&frame, &title, &font)
        }
        None => frame,
    };

    let saved_to = match (opts.display_name(), &opts.save_dir) {
        (Some(name), Some(save_dir)) => Some(save_figure(&frame, save_dir, name)?),
        _ => None,
    };

    Ok(Figure {
        frame,
        title,
        saved_to,
    })
}
