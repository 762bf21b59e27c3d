//! SIMD-accelerated resizing.
//!
//! Uses the fast_image_resize crate, which is 5-14x faster than the image
//! crate's resize and picks AVX2/NEON automatically. Every resize here uses
//! a Lanczos3 convolution, the anti-aliasing filter both the hasher and the
//! dataset resizer expect.
//!
//! Failures are returned as plain reasons; callers attach the file path.

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage};

/// Reusable resizer
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    /// Create a new fast resizer
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Convert to grayscale, then resize to `width` x `height`.
    pub fn resize_to_grayscale(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, String> {
        let gray = image.to_luma8();
        let (src_width, src_height) = gray.dimensions();

        let pixels = self.resize_pixels(
            gray.into_raw(),
            (src_width, src_height),
            (width, height),
            PixelType::U8,
        )?;

        ImageBuffer::from_raw(width, height, pixels)
            .ok_or_else(|| "Failed to create grayscale result buffer".to_string())
    }

    /// Resize to `width` x `height` as 8-bit RGB. Alpha is discarded.
    pub fn resize_rgb(
        &mut self,
        image: &DynamicImage,
        width: u32,
        height: u32,
    ) -> Result<RgbImage, String> {
        let rgb = image.to_rgb8();
        let (src_width, src_height) = rgb.dimensions();

        let pixels = self.resize_pixels(
            rgb.into_raw(),
            (src_width, src_height),
            (width, height),
            PixelType::U8x3,
        )?;

        ImageBuffer::from_raw(width, height, pixels)
            .ok_or_else(|| "Failed to create RGB result buffer".to_string())
    }

    fn resize_pixels(
        &mut self,
        pixels: Vec<u8>,
        (src_width, src_height): (u32, u32),
        (dst_width, dst_height): (u32, u32),
        pixel_type: PixelType,
    ) -> Result<Vec<u8>, String> {
        if src_width == 0 || src_height == 0 {
            return Err("Invalid source dimensions".to_string());
        }

        if dst_width == 0 || dst_height == 0 {
            return Err("Invalid destination dimensions".to_string());
        }

        let src_image = Image::from_vec_u8(src_width, src_height, pixels, pixel_type)
            .map_err(|e| format!("Failed to create source image: {}", e))?;

        let mut dst_image = Image::new(dst_width, dst_height, pixel_type);

        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| format!("Resize failed: {}", e))?;

        Ok(dst_image.into_vec())
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}
