//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Converting the image to grayscale
//! 2. Resizing it to hash_size x hash_size with a Lanczos3 filter
//! 3. Computing the mean brightness of the small grid
//! 4. For each pixel: if strictly brighter than the mean, set bit to 1, else 0
//!
//! Bits are packed row-major, most significant bit first, so an 8x8 grid
//! yields 8 bytes and a 16 character hex string.

use super::super::traits::{HashAlgorithm, ImageHashValue};
use crate::core::imaging::FastResizer;
use crate::error::HashError;
use image::DynamicImage;
use std::path::PathBuf;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    /// Size of the hash (width and height)
    hash_size: u32,
}

impl AverageHasher {
    /// Create a new aHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        let gray = FastResizer::new()
            .resize_to_grayscale(image, self.hash_size, self.hash_size)
            .map_err(|reason| HashError::DecodeError {
                path: PathBuf::new(),
                reason,
            })?;

        let total: u64 = gray.pixels().map(|p| p[0] as u64).sum();
        let count = (self.hash_size * self.hash_size) as f64;
        let mean = total as f64 / count;

        let mut hash_bytes = Vec::with_capacity((self.hash_size * self.hash_size / 8) as usize + 1);
        let mut current_byte: u8 = 0;
        let mut bit_position = 0;

        for pixel in gray.pixels() {
            if pixel[0] as f64 > mean {
                current_byte |= 1 << (7 - bit_position);
            }

            bit_position += 1;

            if bit_position == 8 {
                hash_bytes.push(current_byte);
                current_byte = 0;
                bit_position = 0;
            }
        }

        if bit_position > 0 {
            hash_bytes.push(current_byte);
        }

        Ok(ImageHashValue::new(hash_bytes))
    }

    fn hash_size(&self) -> u32 {
        self.hash_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn create_solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([r, g, b]));
        DynamicImage::ImageRgb8(img)
    }

    /// Left half black, right half white
    fn create_split_image() -> DynamicImage {
        let img = ImageBuffer::from_fn(128, 128, |x, _| {
            if x < 64 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = AverageHasher::new(8);
        let image = create_split_image();

        let hash1 = hasher.hash_image(&image).unwrap();
        let hash2 = hasher.hash_image(&image).unwrap();

        assert_eq!(hash1, hash2);
    }

    #[test]
    fn solid_image_produces_all_zero_hash() {
        let hasher = AverageHasher::new(8);
        let hash = hasher.hash_image(&create_solid_image(128, 128, 128)).unwrap();

        // No pixel is strictly brighter than the mean of a flat image
        assert_eq!(hash.to_hex(), "0000000000000000");
    }

    #[test]
    fn split_image_sets_right_half_bits() {
        let hasher = AverageHasher::new(8);
        let hash = hasher.hash_image(&create_split_image()).unwrap();

        assert_eq!(hash.to_hex(), "0f0f0f0f0f0f0f0f");
    }

    #[test]
    fn hash_length_follows_hash_size() {
        let image = create_split_image();

        assert_eq!(AverageHasher::new(8).hash_image(&image).unwrap().bit_count(), 64);
        assert_eq!(AverageHasher::new(16).hash_image(&image).unwrap().bit_count(), 256);
        // 3x3 = 9 bits, padded into 2 bytes
        assert_eq!(AverageHasher::new(3).hash_image(&image).unwrap().as_bytes().len(), 2);
    }

    #[test]
    fn scaled_copy_has_same_hash() {
        let hasher = AverageHasher::new(8);
        let original = create_split_image();
        let smaller = original.resize_exact(64, 64, image::imageops::FilterType::Triangle);

        assert_eq!(
            hasher.hash_image(&original).unwrap(),
            hasher.hash_image(&smaller).unwrap()
        );
    }
}
