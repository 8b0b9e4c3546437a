// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Array layout and resizing helpers.
//!
//! This module converts between the HWC layout the dataset is stored in and
//! the CHW layout used for training tensors, resizes float images and heatmap
//! channels, and turns float arrays into displayable pixels.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use fast_image_resize::images::{Image, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::RgbImage;
use ndarray::{Array2, Array3, Array4, ArrayView2, ArrayView3};

use crate::error::{FlicError, Result};

/// Permute a batch from (N, H, W, C) to (N, C, H, W) in standard layout.
#[must_use]
pub fn nhwc_to_nchw(batch: Array4<f32>) -> Array4<f32> {
    batch
        .permuted_axes([0, 3, 1, 2])
        .as_standard_layout()
        .into_owned()
}

/// Permute a single sample from (H, W, C) to (C, H, W).
#[must_use]
pub fn hwc_to_chw(sample: ArrayView3<'_, f32>) -> Array3<f32> {
    sample.permuted_axes([2, 0, 1]).as_standard_layout().into_owned()
}

/// Permute a single sample from (C, H, W) to (H, W, C).
#[must_use]
pub fn chw_to_hwc(sample: ArrayView3<'_, f32>) -> Array3<f32> {
    sample.permuted_axes([1, 2, 0]).as_standard_layout().into_owned()
}

/// Bilinear resize of an (H, W, 3) float image to `target_size` (height, width).
///
/// # Errors
///
/// Returns an error if the image does not have 3 channels, either size is
/// empty, or the resizer rejects the buffers.
pub fn resize_image(
    image: ArrayView3<'_, f32>,
    target_size: (usize, usize),
) -> Result<Array3<f32>> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(FlicError::ShapeMismatch(format!(
            "expected an (H, W, 3) image, got {:?}",
            image.shape()
        )));
    }

    let src: Vec<f32> = image.iter().copied().collect();
    let dst = resize_plane(&src, (height, width), target_size, PixelType::F32x3, 3)?;

    Ok(Array3::from_shape_vec((target_size.0, target_size.1, 3), dst)?)
}

/// Bilinear resize of a single heatmap channel to `target_size` (height, width).
///
/// # Errors
///
/// Returns an error if either size is empty or the resizer rejects the buffers.
pub fn resize_channel(
    channel: ArrayView2<'_, f32>,
    target_size: (usize, usize),
) -> Result<Array2<f32>> {
    let src: Vec<f32> = channel.iter().copied().collect();
    let dst = resize_plane(&src, channel.dim(), target_size, PixelType::F32, 1)?;

    Ok(Array2::from_shape_vec(target_size, dst)?)
}

/// Resize a row-major interleaved float buffer with `fast_image_resize`.
fn resize_plane(
    src: &[f32],
    src_size: (usize, usize),
    dst_size: (usize, usize),
    pixel_type: PixelType,
    channels: usize,
) -> Result<Vec<f32>> {
    let (src_h, src_w) = src_size;
    let (dst_h, dst_w) = dst_size;
    if src_h == 0 || src_w == 0 || dst_h == 0 || dst_w == 0 {
        return Err(FlicError::ShapeMismatch(format!(
            "cannot resize {src_h}x{src_w} to {dst_h}x{dst_w}"
        )));
    }

    let (src_w32, src_h32) = (to_u32(src_w, "Source width")?, to_u32(src_h, "Source height")?);
    let (dst_w32, dst_h32) = (to_u32(dst_w, "Target width")?, to_u32(dst_h, "Target height")?);

    // Borrow the f32 buffers as bytes so both images stay 4-byte aligned.
    let src_image = ImageRef::new(src_w32, src_h32, bytemuck::cast_slice(src), pixel_type)
        .map_err(|e| FlicError::ImageError(format!("Failed to create source image: {e}")))?;

    let mut dst = vec![0.0f32; dst_h * dst_w * channels];
    let mut dst_image =
        Image::from_slice_u8(dst_w32, dst_h32, bytemuck::cast_slice_mut(&mut dst), pixel_type)
            .map_err(|e| {
                FlicError::ImageError(format!("Failed to create destination image: {e}"))
            })?;

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    Resizer::new()
        .resize(&src_image, &mut dst_image, &options)
        .map_err(|e| FlicError::ImageError(format!("Failed to resize image: {e}")))?;

    Ok(dst)
}

/// Image dimension as `u32`, the size type of the resizer and `image` buffers.
fn to_u32(value: usize, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| FlicError::ImageError(format!("{what} exceeds u32::MAX")))
}

/// Convert an (H, W, 3) float image to 8-bit RGB.
///
/// Images whose maximum exceeds 1.0 are treated as [0, 255], others as
/// [0, 1]. Values are clipped to the range.
///
/// # Errors
///
/// Returns an error if the image does not have 3 channels or its dimensions
/// exceed `u32::MAX`.
pub fn array_to_image(image: ArrayView3<'_, f32>) -> Result<RgbImage> {
    let (height, width, channels) = image.dim();
    if channels != 3 {
        return Err(FlicError::ShapeMismatch(format!(
            "expected an (H, W, 3) image, got {:?}",
            image.shape()
        )));
    }
    let height = to_u32(height, "Image height")?;
    let width = to_u32(width, "Image width")?;

    let scale = if pixel_max(image) > 1.0 { 1.0 } else { 255.0 };
    let rgb_data: Vec<u8> = image
        .iter()
        .map(|&v| {
            let v = if v.is_nan() { 0.0 } else { v * scale };
            v.clamp(0.0, 255.0).round() as u8
        })
        .collect();

    RgbImage::from_raw(width, height, rgb_data)
        .ok_or_else(|| FlicError::ImageError("Failed to create image from array".to_string()))
}

/// Largest finite value of an array, or `f32::NEG_INFINITY` if there is none.
fn pixel_max(image: ArrayView3<'_, f32>) -> f32 {
    image
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f32::NEG_INFINITY, f32::max)
}
