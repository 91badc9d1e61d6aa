//! Product image upload: validate → JPEG compress → SHA256 → UPLOAD_DIR
//!
//! Files are stored as `{UPLOAD_DIR}/{hash}.jpg` and referenced as
//! `/uploads/{hash}.jpg`. Same content always maps to the same file.

use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};
use shared::error::{AppError, AppResult, ErrorCode};
use std::io::Cursor;
use std::path::Path;

/// Maximum file size (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// JPEG quality
const JPEG_QUALITY: u8 = 85;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Public URL prefix of stored images
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Raw file taken from a multipart field
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// Validate the upload and re-encode it as JPEG
pub fn compress(upload: &ImageUpload) -> AppResult<Vec<u8>> {
    if upload.data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if upload.data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large: {} bytes (max {})",
                upload.data.len(),
                MAX_FILE_SIZE
            ),
        ));
    }

    let ext = upload
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!("Unsupported format: {ext}. Supported: png, jpg, jpeg, webp"),
        ));
    }

    let img = image::load_from_memory(&upload.data).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidImageFile, format!("Invalid image: {e}"))
    })?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img.write_with_encoder(encoder).map_err(|e| {
            AppError::with_message(
                ErrorCode::ImageProcessingFailed,
                format!("Image compression failed: {e}"),
            )
        })?;
    }
    Ok(buffer)
}

/// Compress and persist an upload, returning its public path
pub async fn store_image(upload_dir: &Path, upload: ImageUpload) -> AppResult<String> {
    let buffer = tokio::task::spawn_blocking(move || compress(&upload))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Image compression task failed");
            AppError::new(ErrorCode::ImageProcessingFailed)
        })??;

    let hash = hex::encode(Sha256::digest(&buffer));
    let file_name = format!("{hash}.jpg");
    let path = upload_dir.join(&file_name);

    // Idempotent: same hash = same content
    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        let write = async {
            tokio::fs::create_dir_all(upload_dir).await?;
            tokio::fs::write(&path, &buffer).await
        };
        write.await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Image write failed");
            AppError::new(ErrorCode::FileStorageFailed)
        })?;
    }

    tracing::info!(hash = %hash, size = buffer.len(), "Product image stored");
    Ok(format!("{UPLOADS_PREFIX}/{file_name}"))
}
