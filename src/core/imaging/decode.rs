//! Image decoding with format-specific fast paths.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than the image crate),
//! falls back to the image crate for everything else and for any JPEG
//! zune-jpeg refuses.

use crate::error::HashError;
use image::{DynamicImage, ImageBuffer, ImageReader, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Source formats with a dedicated decode path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Other,
}

impl SourceFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("png") => Self::Png,
            _ => Self::Other,
        }
    }
}

/// Image decoder that picks the fastest decoder per format
pub struct FastDecoder;

impl FastDecoder {
    /// Decode an image from a file path.
    ///
    /// Zero-sized results are rejected with [`HashError::EmptyImage`].
    pub fn decode(path: &Path) -> Result<DynamicImage, HashError> {
        let image = match SourceFormat::from_path(path) {
            SourceFormat::Jpeg => Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path))?,
            _ => Self::decode_fallback(path)?,
        };

        if image.width() == 0 || image.height() == 0 {
            return Err(HashError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(image)
    }

    /// Fully decode a file, guessing its format from the content rather
    /// than the extension. Used to tell corrupted files apart from images.
    pub fn verify(path: &Path) -> Result<(), HashError> {
        let reader = ImageReader::open(path)
            .map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?
            .with_guessed_format()
            .map_err(|e| HashError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?;

        if reader.format().is_none() {
            return Err(HashError::DecodeError {
                path: path.to_path_buf(),
                reason: "unrecognized image format".to_string(),
            });
        }

        reader.decode().map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// JPEG decoding using zune-jpeg
    fn decode_jpeg(path: &Path) -> Result<DynamicImage, HashError> {
        let file_bytes = fs::read(path).map_err(|e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;

        let buffer_error = |kind: &str| HashError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("Failed to create {} buffer", kind),
        };

        let image = match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(|| buffer_error("RGB"))?;
                DynamicImage::ImageRgb8(buffer)
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
                    .ok_or_else(|| buffer_error("RGBA"))?;
                DynamicImage::ImageRgba8(buffer)
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
                    .ok_or_else(|| buffer_error("Luma"))?;
                DynamicImage::ImageLuma8(buffer)
            }
            _ => return Self::decode_fallback(path),
        };

        Ok(image)
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, HashError> {
        let io_error = |e| HashError::IoError {
            path: path.to_path_buf(),
            source: e,
        };

        ImageReader::open(path)
            .map_err(io_error)?
            .with_guessed_format()
            .map_err(io_error)?
            .decode()
            .map_err(|e| HashError::DecodeError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn format_detection_jpeg() {
        assert_eq!(SourceFormat::from_path(Path::new("photo.jpg")), SourceFormat::Jpeg);
        assert_eq!(SourceFormat::from_path(Path::new("photo.JPEG")), SourceFormat::Jpeg);
    }

    #[test]
    fn format_detection_png_and_other() {
        assert_eq!(SourceFormat::from_path(Path::new("image.PNG")), SourceFormat::Png);
        assert_eq!(SourceFormat::from_path(Path::new("image.bmp")), SourceFormat::Other);
        assert_eq!(SourceFormat::from_path(Path::new("no_extension")), SourceFormat::Other);
    }

    #[test]
    fn decode_reads_jpeg_and_png() {
        let dir = TempDir::new().unwrap();
        let image = RgbImage::from_fn(40, 30, |x, y| image::Rgb([(x * 6) as u8, (y * 8) as u8, 90]));

        let jpeg = dir.path().join("sample.jpg");
        let png = dir.path().join("sample.png");
        image.save(&jpeg).unwrap();
        image.save(&png).unwrap();

        let decoded_jpeg = FastDecoder::decode(&jpeg).unwrap();
        let decoded_png = FastDecoder::decode(&png).unwrap();

        assert_eq!((decoded_jpeg.width(), decoded_jpeg.height()), (40, 30));
        assert_eq!((decoded_png.width(), decoded_png.height()), (40, 30));
    }

    #[test]
    fn decode_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("garbage.jpg");
        File::create(&path)
            .unwrap()
            .write_all(b"this is not an image")
            .unwrap();

        assert!(FastDecoder::decode(&path).is_err());
    }

    #[test]
    fn decode_missing_file_is_error() {
        let result = FastDecoder::decode(Path::new("/nonexistent/image.png"));
        assert!(result.is_err());
    }

    #[test]
    fn verify_ignores_misleading_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("actually_png.jpg");
        let image = RgbImage::from_pixel(8, 8, image::Rgb([10, 20, 30]));
        image.save_with_format(&path, image::ImageFormat::Png).unwrap();

        assert!(FastDecoder::verify(&path).is_ok());
    }

    #[test]
    fn verify_rejects_truncated_png() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.png");
        RgbImage::from_pixel(64, 64, image::Rgb([200, 10, 10]))
            .save(&good)
            .unwrap();

        let bytes = std::fs::read(&good).unwrap();
        let truncated = dir.path().join("truncated.png");
        std::fs::write(&truncated, &bytes[..bytes.len() / 2]).unwrap();

        assert!(FastDecoder::verify(&truncated).is_err());
    }
}
