// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Window for displaying rendered figures.

use image::RgbaImage;
use minifb::{Key, Scale, Window, WindowOptions};

use crate::error::{FlicError, Result};

/// A simple image viewer using minifb.
pub struct Viewer {
    window: Window,
    width: usize,
    height: usize,
    buffer: Vec<u32>,
}

impl Viewer {
    /// Create a window sized for a `width` x `height` frame. Small frames
    /// are scaled up so low-resolution previews stay legible.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let scale = match width.max(height) {
            0..=199 => Scale::X4,
            200..=399 => Scale::X2,
            _ => Scale::X1,
        };

        let mut window = Window::new(
            title,
            width,
            height,
            WindowOptions {
                resize: true,
                scale,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| FlicError::VisualizerError(format!("Failed to create window: {e}")))?;

        window.set_target_fps(60);

        Ok(Self {
            window,
            width,
            height,
            buffer: Vec::new(),
        })
    }

    /// Show `frame` until the window is closed or Escape/Q is pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be created or updated.
    pub fn show_blocking(title: &str, frame: &RgbaImage) -> Result<()> {
        let mut viewer = Self::new(title, frame.width() as usize, frame.height() as usize)?;
        while viewer.update(frame)? {}
        Ok(())
    }

    /// Push `frame` to the window. Returns `false` once the user closed it.
    ///
    /// # Errors
    ///
    /// Returns an error if the window update fails.
    pub fn update(&mut self, frame: &RgbaImage) -> Result<bool> {
        if !self.window.is_open()
            || self.window.is_key_down(Key::Escape)
            || self.window.is_key_down(Key::Q)
        {
            return Ok(false);
        }

        let (width, height) = (frame.width() as usize, frame.height() as usize);
        self.buffer.clear();
        // Pack as 0x00RRGGBB
        self.buffer.extend(frame.pixels().map(|p| {
            (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2])
        }));
        self.width = width;
        self.height = height;

        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| FlicError::VisualizerError(format!("Failed to update window: {e}")))?;

        Ok(true)
    }
}
