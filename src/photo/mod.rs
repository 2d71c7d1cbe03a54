//! # Photo Module
//!
//! Everything that happens to an ingredient photo between the user picking it
//! and the upload: validation, preview lifetime and client-side downscaling.

pub mod pipeline;
pub mod prepare;
pub mod preview;
pub mod validation;

pub use pipeline::{ImagePipeline, PipelineStage};
pub use prepare::{
    DEFAULT_JPEG_QUALITY, PrepareSettings, ProcessedImage, prepare_image, prepare_image_blocking,
};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use validation::{
    ALLOWED_MIME_TYPES, ImageDescriptor, ImageValidationError, MAX_FILE_SIZE, mime_from_extension,
    validate,
};
