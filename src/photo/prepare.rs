//! Client-side downscale and re-encode of an accepted photo.
//!
//! Decoding, resizing and encoding run on Tokio's blocking pool so the caller's
//! task is never stalled by codec work. Any failure along the way degrades to
//! uploading the original bytes; the user is never shown an error for it.

use std::io::Cursor;
use std::sync::Arc;

use fast_image_resize::Resizer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use scout_scale::cpu::scale_rgba_to_vec;
use scout_scale::presets::{ScaleTarget, Size, UPLOAD_MAX_SIDE, build_plan};
use tracing::{debug, warn};

use super::validation::{ImageDescriptor, format_for_mime};
use crate::error::{ScoutError, ScoutResult};

/// Encoder quality used for lossy formats (0.85 on a 0–1 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Knobs for the preparation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareSettings {
    /// When false the validated original is uploaded as-is.
    pub enabled: bool,
    /// Neither output side may exceed this many pixels.
    pub max_side: u32,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
}

impl Default for PrepareSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_side: UPLOAD_MAX_SIDE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Bytes that will actually be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub bytes: Arc<Vec<u8>>,
    pub mime_type: String,
    /// Pixel width; 0 when the image could not be decoded.
    pub width: u32,
    /// Pixel height; 0 when the image could not be decoded.
    pub height: u32,
    pub resized: bool,
    pub reencoded: bool,
}

impl ProcessedImage {
    /// Wrap the original bytes unchanged.
    pub fn passthrough(image: &ImageDescriptor) -> Self {
        let (width, height) = probe_dimensions(&image.bytes).unwrap_or((0, 0));
        Self {
            bytes: Arc::clone(&image.bytes),
            mime_type: image.mime_type.clone().unwrap_or_default(),
            width,
            height,
            resized: false,
            reencoded: false,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Prepare `image` off the calling task. Never fails: problems fall back to
/// [`ProcessedImage::passthrough`].
pub async fn prepare_image(image: ImageDescriptor, settings: PrepareSettings) -> ProcessedImage {
    if !settings.enabled {
        return ProcessedImage::passthrough(&image);
    }

    let fallback = image.clone();
    match tokio::task::spawn_blocking(move || prepare_image_blocking(&image, &settings)).await {
        Ok(processed) => processed,
        Err(e) => {
            warn!(error = %e, "image preparation task failed, uploading original");
            ProcessedImage::passthrough(&fallback)
        }
    }
}

/// Synchronous body of [`prepare_image`].
pub fn prepare_image_blocking(image: &ImageDescriptor, settings: &PrepareSettings) -> ProcessedImage {
    match try_prepare(image, settings) {
        Ok(processed) => processed,
        Err(e) => {
            warn!(error = %e, "image preparation failed, uploading original");
            ProcessedImage::passthrough(image)
        }
    }
}

fn try_prepare(image: &ImageDescriptor, settings: &PrepareSettings) -> ScoutResult<ProcessedImage> {
    let mime_type = image.mime_type.clone().unwrap_or_default();
    let format = format_for_mime(&mime_type)
        .ok_or_else(|| ScoutError::processing("prepare", format!("no encoder for {}", mime_type)))?;

    let decoded = ImageReader::new(Cursor::new(image.bytes.as_slice()))
        .with_guessed_format()?
        .decode()?;

    let input = Size {
        w: decoded.width(),
        h: decoded.height(),
    };
    let plan = build_plan(input, ScaleTarget::MaxSide(settings.max_side));

    let output = if plan.is_identity() {
        decoded
    } else {
        debug!(
            from_w = input.w,
            from_h = input.h,
            to_w = plan.out.w,
            to_h = plan.out.h,
            scale = plan.scale,
            "downscaling photo"
        );
        let rgba = decoded.to_rgba8();
        let scaled = scale_rgba_to_vec(&mut Resizer::new(), rgba.as_raw(), &plan)?;
        let buffer = RgbaImage::from_raw(plan.out.w, plan.out.h, scaled).ok_or_else(|| {
            ScoutError::processing("resize", "scaled buffer does not match plan size")
        })?;
        DynamicImage::ImageRgba8(buffer)
    };

    let encoded = encode(&output, format, settings.jpeg_quality)?;
    if encoded.is_empty() {
        return Err(ScoutError::processing("encode", "encoder produced no output"));
    }

    let resized = !plan.is_identity();
    if !resized && encoded.len() >= image.bytes.len() {
        debug!("re-encoding did not shrink the photo, keeping original bytes");
        return Ok(ProcessedImage {
            bytes: Arc::clone(&image.bytes),
            mime_type,
            width: input.w,
            height: input.h,
            resized: false,
            reencoded: false,
        });
    }

    Ok(ProcessedImage {
        bytes: Arc::new(encoded),
        mime_type,
        width: output.width(),
        height: output.height(),
        resized,
        reencoded: true,
    })
}

fn encode(img: &DynamicImage, format: ImageFormat, jpeg_quality: u8) -> ScoutResult<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
        }
        ImageFormat::Png => {
            img.write_with_encoder(PngEncoder::new(&mut buf))?;
        }
        other => {
            DynamicImage::ImageRgba8(img.to_rgba8()).write_to(&mut Cursor::new(&mut buf), other)?;
        }
    }
    Ok(buf)
}

fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn encoded(w: u32, h: u32, format: ImageFormat) -> Vec<u8> {
        let img = RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), format)
            .unwrap();
        buf
    }

    fn settings(max_side: u32) -> PrepareSettings {
        PrepareSettings {
            max_side,
            ..PrepareSettings::default()
        }
    }

    #[test]
    fn oversized_png_is_downscaled_uniformly() {
        let image = ImageDescriptor::new(encoded(300, 150, ImageFormat::Png), "image/png");
        let out = prepare_image_blocking(&image, &settings(120));

        assert!(out.resized);
        assert!(out.reencoded);
        assert_eq!((out.width, out.height), (120, 60));
        assert_eq!(out.mime_type, "image/png");
        let decoded = image::load_from_memory(&out.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 60));
    }

    #[test]
    fn jpeg_stays_jpeg() {
        let image = ImageDescriptor::new(encoded(200, 400, ImageFormat::Jpeg), "image/jpg");
        let out = prepare_image_blocking(&image, &settings(100));
        assert_eq!((out.width, out.height), (50, 100));
        assert_eq!(
            image::guess_format(&out.bytes).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(out.mime_type, "image/jpg");
    }

    #[test]
    fn small_image_is_never_enlarged() {
        let original = encoded(64, 48, ImageFormat::Png);
        let image = ImageDescriptor::new(original.clone(), "image/png");
        let out = prepare_image_blocking(&image, &settings(1920));
        assert!(!out.resized);
        assert_eq!((out.width, out.height), (64, 48));
        assert!(out.size_bytes() <= original.len() as u64);
    }

    #[test]
    fn undecodable_bytes_fall_back_to_original() {
        let image = ImageDescriptor::new(b"definitely not a png".to_vec(), "image/png");
        let out = prepare_image_blocking(&image, &PrepareSettings::default());
        assert!(!out.reencoded);
        assert_eq!(out.bytes.as_slice(), b"definitely not a png");
        assert_eq!((out.width, out.height), (0, 0));
    }

    #[tokio::test]
    async fn disabled_preparation_passes_through() {
        let bytes = encoded(4000, 10, ImageFormat::Png);
        let image = ImageDescriptor::new(bytes.clone(), "image/png");
        let out = prepare_image(
            image,
            PrepareSettings {
                enabled: false,
                ..PrepareSettings::default()
            },
        )
        .await;
        assert!(!out.resized);
        assert_eq!(out.bytes.as_slice(), bytes.as_slice());
        assert_eq!((out.width, out.height), (4000, 10));
    }
}
