// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Title font handling.
//!
//! Figures get their title drawn in a header band when a TrueType font is
//! available. The default font is downloaded once into the user config
//! directory.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};

use crate::error::{FlicError, Result};

/// Assets URL for downloading fonts
const ASSETS_URL: &str = "https://github.com/ultralytics/assets/releases/download/v0.0.0";

/// Font downloaded when none is configured.
pub const DEFAULT_FONT: &str = "Arial.ttf";

/// Connection timeout in seconds.
const CONNECT_TIMEOUT: u64 = 30;

/// Read timeout in seconds.
const READ_TIMEOUT: u64 = 120;

/// Title color.
const TITLE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Horizontal padding around the title, in pixels.
const TITLE_PAD: u32 = 4;

/// A loaded TrueType font at a fixed pixel size.
pub struct TitleFont {
    font: FontVec,
    scale: PxScale,
}

impl TitleFont {
    /// Load a font file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid font.
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let data = fs::read(path).map_err(|e| {
            FlicError::ConfigError(format!("Failed to read font {}: {e}", path.display()))
        })?;
        let font = FontVec::try_from_vec(data).map_err(|e| {
            FlicError::ConfigError(format!("Invalid font {}: {e}", path.display()))
        })?;

        Ok(Self {
            font,
            scale: PxScale::from(size),
        })
    }

    /// Pixel size of `text` in this font.
    #[must_use]
    pub fn measure(&self, text: &str) -> (u32, u32) {
        text_size(self.scale, &self.font, text)
    }

    /// Height of the header band holding one line of text.
    #[must_use]
    pub fn band_height(&self) -> u32 {
        (self.scale.y * 1.6).ceil() as u32
    }
}

/// Return `frame` with `title` centered in a white band above it.
///
/// The frame is widened if the title does not fit, keeping the plot centered.
#[must_use]
pub fn draw_title(frame: &RgbaImage, title: &str, font: &TitleFont) -> RgbaImage {
    let (text_w, text_h) = font.measure(title);
    let band = font.band_height().max(text_h + 2);
    let width = frame.width().max(text_w + 2 * TITLE_PAD);

    let mut out = RgbaImage::from_pixel(width, frame.height() + band, Rgba([255, 255, 255, 255]));
    let plot_x = (width - frame.width()) / 2;
    image::imageops::overlay(&mut out, frame, i64::from(plot_x), i64::from(band));

    let text_x = ((width - text_w) / 2) as i32;
    let text_y = ((band - text_h) / 2) as i32;
    draw_text_mut(&mut out, TITLE_COLOR, text_x, text_y, font.scale, &font.font, title);

    out
}

/// Locate the default font in the config directory, downloading it if missing.
///
/// Returns `None` when there is no config directory or the download fails.
#[must_use]
pub fn resolve_default_font() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?.join(env!("CARGO_PKG_NAME"));
    let font_path = config_dir.join(DEFAULT_FONT);

    if font_path.exists() {
        return Some(font_path);
    }

    if let Err(e) = fs::create_dir_all(&config_dir) {
        crate::warn!("Failed to create config directory: {e}");
        return None;
    }

    let url = format!("{ASSETS_URL}/{DEFAULT_FONT}");
    crate::verbose!("Downloading {url} to {}", font_path.display());

    match download_file(&url, &font_path) {
        Ok(()) => Some(font_path),
        Err(e) => {
            crate::warn!("{e}");
            None
        }
    }
}

/// Download `url` to `dest` through a temporary file and an atomic rename.
fn download_file(url: &str, dest: &Path) -> Result<()> {
    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(Duration::from_secs(CONNECT_TIMEOUT)))
        .timeout_recv_body(Some(Duration::from_secs(READ_TIMEOUT)))
        .build();
    let agent = ureq::Agent::new_with_config(config);

    let response = agent.get(url).call().map_err(|e| {
        FlicError::IoError(format!("Failed to download font from {url}: {e}"))
    })?;

    let temp_path = dest.with_extension("part");
    let result = (|| -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(&temp_path)?);
        let mut reader = response.into_body().into_reader();
        io::copy(&mut reader, &mut writer)?;
        writer.flush()
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(FlicError::IoError(format!("Failed to download font: {e}")));
    }

    fs::rename(&temp_path, dest).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        FlicError::IoError(format!(
            "Failed to move downloaded font to {}: {e}",
            dest.display()
        ))
    })
}
