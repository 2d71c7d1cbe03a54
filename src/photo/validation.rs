//! Upload checks for a selected ingredient photo.
//!
//! Checks run in order (type prefix, allow-list, size) and are repeated from
//! scratch on every selection.

use std::path::Path;
use std::sync::Arc;

use image::ImageFormat;
use tokio::io::AsyncReadExt;

use crate::error::{ScoutError, ScoutResult};

/// Maximum accepted upload size (10 MiB, inclusive).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// MIME types the recommendation service accepts.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

fn megabytes(bytes: &u64) -> f64 {
    *bytes as f64 / BYTES_PER_MB
}

/// Reasons a selected file is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageValidationError {
    #[error("Please select an image file (JPG, PNG, WebP, or GIF).")]
    NotAnImage { mime_type: Option<String> },
    #[error("File type \"{mime_type}\" is not supported. Please use JPG, PNG, WebP, or GIF.")]
    UnsupportedType { mime_type: String },
    #[error(
        "File is too large ({:.2}MB). Maximum size is {:.0}MB.",
        megabytes(.size_bytes),
        megabytes(.limit_bytes)
    )]
    TooLarge { size_bytes: u64, limit_bytes: u64 },
}

impl ImageValidationError {
    /// The value that tripped the check, for diagnostics.
    pub fn offending_value(&self) -> String {
        match self {
            ImageValidationError::NotAnImage { mime_type } => mime_type.clone().unwrap_or_default(),
            ImageValidationError::UnsupportedType { mime_type } => mime_type.clone(),
            ImageValidationError::TooLarge { size_bytes, .. } => size_bytes.to_string(),
        }
    }
}

/// A file picked by the user, before any processing.
#[derive(Debug, Clone)]
pub struct ImageDescriptor {
    pub bytes: Arc<Vec<u8>>,
    /// Declared MIME type; `None` when the source gave none.
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub file_name: Option<String>,
}

impl ImageDescriptor {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let mime_type = mime_type.into();
        Self {
            size_bytes: bytes.len() as u64,
            bytes: Arc::new(bytes),
            mime_type: (!mime_type.is_empty()).then_some(mime_type),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Read a file from disk, declaring its MIME type from the extension.
    ///
    /// Type and size are checked against the file's metadata before any bytes
    /// are read, and the read itself stops one byte past [`MAX_FILE_SIZE`].
    pub async fn from_path(path: impl AsRef<Path>) -> ScoutResult<Self> {
        let path = path.as_ref();
        let io_error =
            |e: std::io::Error| ScoutError::io("read image", e).with_path(path.display().to_string());

        let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
        if !metadata.is_file() {
            return Err(io_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        let mut descriptor = Self {
            bytes: Arc::new(Vec::new()),
            mime_type: mime_from_extension(path),
            size_bytes: metadata.len(),
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
        };
        validate(&descriptor)?;

        let file = tokio::fs::File::open(path).await.map_err(io_error)?;
        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        file.take(MAX_FILE_SIZE + 1)
            .read_to_end(&mut bytes)
            .await
            .map_err(io_error)?;

        // The file may have grown between the metadata call and the read.
        descriptor.size_bytes = bytes.len() as u64;
        validate(&descriptor)?;
        descriptor.bytes = Arc::new(bytes);
        Ok(descriptor)
    }

    /// File name sent with the multipart part.
    pub fn upload_name(&self) -> String {
        self.file_name.clone().unwrap_or_else(|| "image".to_string())
    }
}

/// MIME type implied by a path's extension, if it names an image format.
pub fn mime_from_extension(path: &Path) -> Option<String> {
    ImageFormat::from_path(path)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

/// Codec for an allowed MIME type.
pub fn format_for_mime(mime_type: &str) -> Option<ImageFormat> {
    match mime_type.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
        "image/png" => Some(ImageFormat::Png),
        "image/webp" => Some(ImageFormat::WebP),
        "image/gif" => Some(ImageFormat::Gif),
        _ => None,
    }
}

/// Check type and size of a selected file.
pub fn validate(image: &ImageDescriptor) -> Result<(), ImageValidationError> {
    let mime = match image.mime_type.as_deref() {
        Some(m) if m.to_ascii_lowercase().starts_with("image/") => m,
        other => {
            return Err(ImageValidationError::NotAnImage {
                mime_type: other.map(str::to_string),
            });
        }
    };

    if !ALLOWED_MIME_TYPES.contains(&mime.to_ascii_lowercase().as_str()) {
        return Err(ImageValidationError::UnsupportedType {
            mime_type: mime.to_string(),
        });
    }

    if image.size_bytes > MAX_FILE_SIZE {
        return Err(ImageValidationError::TooLarge {
            size_bytes: image.size_bytes,
            limit_bytes: MAX_FILE_SIZE,
        });
    }

    Ok(())
}
