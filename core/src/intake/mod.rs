//! Turns user-provided image files into size-capped, inline-embeddable payloads.

use crate::types::{EncodedImage, ImageConfig};
use base64::prelude::*;
use error::IntakeError;
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use std::path::Path;
use tracing::debug;

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum IntakeError {
        #[error("Not an image: {0}")]
        NotAnImage(String),

        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),

        #[error("Image error: {0}")]
        Image(#[from] image::ImageError),

        #[error("Resize error: {0}")]
        Resize(#[from] fast_image_resize::ResizeError),
    }
}

/// A raw file as handed over by a file picker or a drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    /// Declared media type, e.g. `image/png`.
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    const EXTENSION_TYPES: &[(&str, &str)] = &[
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("gif", "image/gif"),
        ("webp", "image/webp"),
    ];

    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its media type from the extension.
    /// Unknown extensions are declared as `application/octet-stream`.
    pub fn from_path(path: &Path) -> Result<Self, IntakeError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name.clone(), Self::media_type_for(&name), bytes))
    }

    pub fn media_type_for(filename: &str) -> &'static str {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        Self::EXTENSION_TYPES
            .iter()
            .find(|(known, _)| *known == ext)
            .map_or("application/octet-stream", |&(_, media_type)| media_type)
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// The seam the controller hands files to.
pub trait ImageEncoder {
    fn encode(&mut self, file: &ImageFile) -> Result<EncodedImage, IntakeError>;
}

/// Returns `(width, height)` scaled down to fit `max_width × max_height`,
/// preserving aspect ratio. Images already within both bounds are unchanged.
///
/// The tighter of the two ratios wins and both dimensions are floored.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let scaled = |side: u32| ((side as f64 * ratio).floor() as u32).max(1);

    (scaled(width), scaled(height))
}

/// Decodes, downscales and re-encodes images as JPEG data URLs.
pub struct ImageIntake {
    max_width: u32,
    max_height: u32,
    quality: u8,
    resizer: Resizer,
}

impl ImageIntake {
    pub fn new(config: &ImageConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.jpeg_quality,
            resizer: Resizer::new(),
        }
    }

    pub fn process(&mut self, file: &ImageFile) -> Result<EncodedImage, IntakeError> {
        if !file.is_image() {
            return Err(IntakeError::NotAnImage(file.media_type.clone()));
        }

        // JPEG has no alpha channel
        let decoded = image::load_from_memory(&file.bytes)?;
        let source = DynamicImage::ImageRgb8(decoded.into_rgb8());
        let (src_width, src_height) = (source.width(), source.height());

        let (dst_width, dst_height) =
            fit_within(src_width, src_height, self.max_width, self.max_height);

        let output = if (dst_width, dst_height) == (src_width, src_height) {
            source
        } else {
            let mut dst_image = DynamicImage::new(dst_width, dst_height, ColorType::Rgb8);
            self.resizer.resize(
                &source,
                &mut dst_image,
                Some(&ResizeOptions::new().resize_alg(ResizeAlg::Convolution(
                    FilterType::Lanczos3,
                ))),
            )?;
            dst_image
        };

        let mut jpeg = Vec::new();
        output
            .into_rgb8()
            .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, self.quality))?;

        debug!(
            file = %file.name,
            src_width,
            src_height,
            dst_width,
            dst_height,
            bytes = jpeg.len(),
            "image encoded"
        );

        Ok(EncodedImage::from_data_url(format!(
            "data:image/jpeg;base64,{}",
            BASE64_STANDARD.encode(&jpeg)
        )))
    }
}

impl Default for ImageIntake {
    fn default() -> Self {
        Self::new(&ImageConfig::default())
    }
}

impl ImageEncoder for ImageIntake {
    fn encode(&mut self, file: &ImageFile) -> Result<EncodedImage, IntakeError> {
        self.process(file)
    }
}
