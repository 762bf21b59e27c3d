//! Trait definitions and the hash value type.

use crate::core::imaging::FastDecoder;
use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a hash from an already-loaded image
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError>;

    /// Compute a hash directly from a file path.
    ///
    /// JPEGs go through zune-jpeg, everything else through the image crate.
    fn hash_file(&self, path: &Path) -> Result<ImageHashValue, HashError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image)
    }

    /// Side length of the sampling grid
    fn hash_size(&self) -> u32;
}

/// A computed perceptual hash.
///
/// Two values are equal only if every bit matches. The string form is
/// lowercase hex, two characters per byte, and is what the hash file stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHashValue {
    bytes: Vec<u8>,
}

impl ImageHashValue {
    /// Create a new hash value
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the raw hash bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Get the hash as a hexadecimal string
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Total number of bits in this hash
    pub fn bit_count(&self) -> u32 {
        (self.bytes.len() * 8) as u32
    }
}

impl fmt::Display for ImageHashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ImageHashValue {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| HashError::InvalidHashString {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        if s.is_empty() {
            return Err(invalid("empty"));
        }
        if s.len() % 2 != 0 {
            return Err(invalid("odd number of hex digits"));
        }

        let bytes = (0..s.len())
            .step_by(2)
            .map(|i| {
                s.get(i..i + 2)
                    .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                    .ok_or_else(|| invalid("not a hex string"))
            })
            .collect::<Result<Vec<u8>, HashError>>()?;

        Ok(Self { bytes })
    }
}
