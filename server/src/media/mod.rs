//! Recipe image handling: validation of uploads and the external media host
//! that stores them.
//!
//! Image deletion after a document write is not transactional. If the process
//! dies between the two, the media host may keep an orphaned file; nothing
//! reconciles that automatically.

#[cfg(test)]
mod fake;
mod hosted;

#[cfg(test)]
pub use fake::FakeMediaStore;
pub use hosted::HostedMediaStore;

use async_trait::async_trait;
use image::{ImageFormat, ImageReader};
use std::io::Cursor;
use thiserror::Error;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const ALLOWED_FORMATS: &[ImageFormat] = &[ImageFormat::Jpeg, ImageFormat::Png];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("request to media host failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("media host returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid media host URL: {0}")]
    Url(String),
}

/// An uploaded image that passed [`process_image`].
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

/// Storage for recipe images. Implementations return a URL that is saved on
/// the recipe and later handed back to [`MediaStore::delete`].
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, image: &ImageUpload) -> Result<String, MediaError>;

    async fn delete(&self, url: &str) -> Result<(), MediaError>;
}

/// Detect the format from magic bytes and check it is an allowed type and size.
/// Returns the MIME type on success.
pub fn process_image(data: &[u8]) -> Result<String, String> {
    if data.is_empty() {
        return Err("Image file is empty".to_string());
    }

    if data.len() > MAX_FILE_SIZE {
        return Err("File too large. Maximum size is 5MB".to_string());
    }

    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    match reader.format() {
        Some(format) if ALLOWED_FORMATS.contains(&format) => {
            Ok(format.to_mime_type().to_string())
        }
        _ => Err("Only .jpg and .png files are allowed".to_string()),
    }
}

#[cfg(test)]
pub(crate) mod test_images {
    pub const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];
    pub const GIF: &[u8] = b"GIF89a\x01\x00\x01\x00";
}
