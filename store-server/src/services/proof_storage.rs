//! Payment-proof storage
//!
//! Persists uploaded bank-transfer evidence. Images are validated,
//! re-encoded to JPEG and written under the uploads directory before the
//! order engine is asked to confirm the order; if confirmation fails the
//! caller discards the file again, so a stored proof on disk always
//! belongs to a confirmed order or to nothing.

use std::io::Cursor;
use std::path::PathBuf;
use std::{fs, path::Path};
use uuid::Uuid;

use crate::utils::AppError;

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// JPEG quality for stored proofs (85% keeps transfer slips legible)
const JPEG_QUALITY: u8 = 85;

/// A stored proof file
#[derive(Debug, Clone)]
pub struct StoredProof {
    /// Public URL path (`/uploads/<file>`)
    pub url: String,
    /// Absolute path on disk
    pub path: PathBuf,
}

/// File storage for payment-proof images
#[derive(Clone, Debug)]
pub struct ProofStorage {
    dir: PathBuf,
}

impl ProofStorage {
    /// Prepare the uploads directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::storage(format!("Failed to create uploads dir: {e}")))?;
        Ok(Self { dir })
    }

    /// Validate, re-encode and persist an uploaded image
    pub fn store(&self, data: &[u8]) -> Result<StoredProof, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty upload"));
        }
        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::validation(format!(
                "File too large ({} bytes, max {})",
                data.len(),
                MAX_FILE_SIZE
            )));
        }

        let jpeg = reencode_jpeg(data)?;

        let filename = format!("proof-{}.jpg", Uuid::new_v4());
        let path = self.dir.join(&filename);
        fs::write(&path, &jpeg)
            .map_err(|e| AppError::storage(format!("Failed to write proof file: {e}")))?;

        Ok(StoredProof {
            url: format!("/uploads/{filename}"),
            path,
        })
    }

    /// Best-effort removal (confirmation failed after the file landed)
    pub fn discard(&self, proof: &StoredProof) {
        if let Err(e) = fs::remove_file(&proof.path) {
            tracing::warn!(
                path = %proof.path.display(),
                error = %e,
                "Failed to remove orphaned proof file"
            );
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Decode whatever format arrived and re-encode as JPEG
fn reencode_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| AppError::storage(format!("Failed to encode image: {e}")))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_fixture() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 120, 40]));
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_store_and_discard() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProofStorage::new(dir.path()).unwrap();

        let stored = storage.store(&png_fixture()).unwrap();
        assert!(stored.path.exists());
        assert!(stored.url.starts_with("/uploads/proof-"));
        assert!(stored.url.ends_with(".jpg"));

        storage.discard(&stored);
        assert!(!stored.path.exists());
    }

    #[test]
    fn test_rejects_non_image_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = ProofStorage::new(dir.path()).unwrap();

        assert!(matches!(
            storage.store(b"definitely not an image"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(storage.store(b""), Err(AppError::Validation(_))));
    }
}
