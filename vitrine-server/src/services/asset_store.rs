//! Image Asset Store
//!
//! Accepts binary image content and returns a durable retrievable URL;
//! supports deletion by that URL. The local implementation normalizes
//! every upload to JPEG and names files by content hash, so re-uploading
//! identical content lands on the same file.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use shared::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// JPEG quality for stored images (85% keeps photos appealing while
/// controlling file size)
const JPEG_QUALITY: u8 = 85;

/// Asset store boundary
///
/// `store` returns the public URL of the durable asset; `delete` accepts
/// that URL back.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn store(&self, data: Vec<u8>, content_type: Option<&str>) -> AppResult<String>;
    async fn delete(&self, url: &str) -> AppResult<()>;
}

/// Local-disk asset store serving files under `/images/`
pub struct LocalAssetStore {
    images_dir: PathBuf,
    public_base: String,
}

impl LocalAssetStore {
    /// Create the store, ensuring the images directory exists
    pub fn new(images_dir: impl Into<PathBuf>, public_base: impl Into<String>) -> AppResult<Self> {
        let images_dir = images_dir.into();
        std::fs::create_dir_all(&images_dir)
            .map_err(|e| AppError::storage(format!("Failed to create images dir: {e}")))?;
        Ok(Self {
            images_dir,
            public_base: public_base.into(),
        })
    }

    /// Extract the stored filename from a public URL
    ///
    /// Only content-hash JPEG names are accepted; anything else is not
    /// one of ours.
    fn filename_from_url(url: &str) -> Option<&str> {
        let name = url.rsplit('/').next()?;
        let hash = name.strip_suffix(".jpg")?;
        (hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit())).then_some(name)
    }
}

/// Calculate SHA256 hash of data
fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Validate and normalize an uploaded image to JPEG
fn process_and_compress_image(data: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::storage(format!("Failed to compress image: {e}")))?;
    }

    Ok(buffer)
}

/// Validate image size and declared content type
fn validate_image(data: &[u8], content_type: Option<&str>) -> AppResult<()> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if let Some(ct) = content_type
        && !ct.starts_with("image/")
    {
        return Err(AppError::validation(format!(
            "Unsupported content type: {ct}"
        )));
    }

    Ok(())
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, data: Vec<u8>, content_type: Option<&str>) -> AppResult<String> {
        validate_image(&data, content_type)?;

        let jpeg = process_and_compress_image(&data)?;
        let hash = calculate_hash(&jpeg);
        let filename = format!("{hash}.jpg");
        let path = self.images_dir.join(&filename);

        // Content-addressed: identical content re-uses the existing file
        if !path.exists() {
            tokio::fs::write(&path, &jpeg)
                .await
                .map_err(|e| AppError::storage(format!("Failed to write image: {e}")))?;
        }

        tracing::debug!(filename = %filename, size = jpeg.len(), "Image stored");
        Ok(format!("{}/images/{}", self.public_base, filename))
    }

    async fn delete(&self, url: &str) -> AppResult<()> {
        let Some(filename) = Self::filename_from_url(url) else {
            return Err(AppError::storage(format!("Not a stored asset URL: {url}")));
        };

        let path = self.images_dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone - deletion is idempotent
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("Failed to delete image: {e}"))),
        }
    }
}

impl LocalAssetStore {
    /// Absolute path of a stored asset (test inspection)
    pub fn path_for(&self, url: &str) -> Option<PathBuf> {
        Self::filename_from_url(url).map(|f| self.images_dir.join(f))
    }

    /// The directory assets are stored in
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 40, 200]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_store_and_delete_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(tmp.path().join("images"), "").unwrap();

        let url = store.store(png_bytes(), Some("image/png")).await.unwrap();
        assert!(url.starts_with("/images/"));
        assert!(url.ends_with(".jpg"));

        let path = store.path_for(&url).unwrap();
        assert!(path.exists());

        store.delete(&url).await.unwrap();
        assert!(!path.exists());

        // Idempotent
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn test_identical_content_dedupes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(tmp.path().join("images"), "").unwrap();

        let a = store.store(png_bytes(), Some("image/png")).await.unwrap();
        let b = store.store(png_bytes(), Some("image/png")).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_rejects_non_image() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalAssetStore::new(tmp.path().join("images"), "").unwrap();

        assert!(store.store(b"not an image".to_vec(), None).await.is_err());
        assert!(
            store
                .store(png_bytes(), Some("application/pdf"))
                .await
                .is_err()
        );
    }

    #[test]
    fn test_filename_from_url() {
        let hash = "a".repeat(64);
        let url = format!("https://cdn.example.com/images/{hash}.jpg");
        let expected = format!("{hash}.jpg");
        assert_eq!(
            LocalAssetStore::filename_from_url(&url),
            Some(expected.as_str())
        );
        assert_eq!(LocalAssetStore::filename_from_url("/images/evil.sh"), None);
        assert_eq!(LocalAssetStore::filename_from_url("/images/abc.jpg"), None);
    }
}
