//! Selection state for the single photo attached to a submission.

use std::fmt;

use tracing::{debug, info};

use super::prepare::{PrepareSettings, ProcessedImage, prepare_image};
use super::preview::{PreviewHandle, PreviewRegistry};
use super::validation::{ImageDescriptor, ImageValidationError, validate};

/// Where the pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Empty,
    Validating,
    Rejected,
    Accepted,
    Compressing,
    Ready,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Empty => "empty",
            PipelineStage::Validating => "validating",
            PipelineStage::Rejected => "rejected",
            PipelineStage::Accepted => "accepted",
            PipelineStage::Compressing => "compressing",
            PipelineStage::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// Holds at most one selected photo, its preview and, once prepared, the bytes
/// to upload.
#[derive(Debug)]
pub struct ImagePipeline {
    registry: PreviewRegistry,
    settings: PrepareSettings,
    stage: PipelineStage,
    selected: Option<ImageDescriptor>,
    preview: Option<PreviewHandle>,
    processed: Option<ProcessedImage>,
    last_error: Option<ImageValidationError>,
}

impl ImagePipeline {
    pub fn new(registry: PreviewRegistry, settings: PrepareSettings) -> Self {
        Self {
            registry,
            settings,
            stage: PipelineStage::Empty,
            selected: None,
            preview: None,
            processed: None,
            last_error: None,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn settings(&self) -> &PrepareSettings {
        &self.settings
    }

    /// The accepted photo, if any.
    pub fn selected(&self) -> Option<&ImageDescriptor> {
        self.selected.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    pub fn processed(&self) -> Option<&ProcessedImage> {
        self.processed.as_ref()
    }

    /// Why the most recent selection was refused.
    pub fn last_error(&self) -> Option<&ImageValidationError> {
        self.last_error.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.selected.is_some()
    }

    /// Replace the current selection with `image`.
    ///
    /// The previous photo and its preview are released before the new one is
    /// checked, so a rejected selection leaves nothing behind.
    pub fn select(&mut self, image: ImageDescriptor) -> Result<(), ImageValidationError> {
        self.teardown();
        self.stage = PipelineStage::Validating;

        if let Err(e) = validate(&image) {
            debug!(error = %e, "photo rejected");
            self.stage = PipelineStage::Rejected;
            self.last_error = Some(e.clone());
            return Err(e);
        }

        let mime_type = image.mime_type.clone().unwrap_or_default();
        self.preview = Some(self.registry.create(image.bytes.clone(), mime_type));
        info!(
            size_bytes = image.size_bytes,
            mime = image.mime_type.as_deref().unwrap_or(""),
            "photo accepted"
        );
        self.selected = Some(image);
        self.stage = PipelineStage::Accepted;
        Ok(())
    }

    /// Drop the selection and release its preview.
    pub fn clear(&mut self) {
        self.teardown();
        self.stage = PipelineStage::Empty;
    }

    /// Produce the bytes to upload, preparing them on first use.
    ///
    /// Returns `None` when no photo is selected.
    pub async fn prepare(&mut self) -> Option<ProcessedImage> {
        if self.stage == PipelineStage::Ready {
            return self.processed.clone();
        }
        let image = self.selected.clone()?;

        let processed = if self.settings.enabled {
            self.stage = PipelineStage::Compressing;
            prepare_image(image, self.settings).await
        } else {
            ProcessedImage::passthrough(&image)
        };

        debug!(
            size_bytes = processed.size_bytes(),
            width = processed.width,
            height = processed.height,
            resized = processed.resized,
            "photo ready for upload"
        );
        self.processed = Some(processed.clone());
        self.stage = PipelineStage::Ready;
        Some(processed)
    }

    fn teardown(&mut self) {
        self.preview = None;
        self.selected = None;
        self.processed = None;
        self.last_error = None;
    }
}
