//! Per-file metadata extraction: dimension probe plus format-specific refinement.

use exif::{In, Reader, Tag, Value};
use std::io::Cursor;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ImageRecord, MetadataRefinement};

use super::sniff::ImageKind;
use super::source::FileHandle;

/// Optional facility for decoding embedded tags (resolution, bit depth).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagReader {
    /// Read EXIF tags with kamadak-exif
    #[default]
    Exif,
    /// No tag decoding; JPEG records keep their defaults
    Unavailable,
}

impl TagReader {
    /// Read the refinement carried by a file's embedded tags.
    ///
    /// A file without EXIF data yields an empty refinement, not an error.
    pub fn read(self, name: &str, bytes: &[u8]) -> PipelineResult<MetadataRefinement> {
        match self {
            TagReader::Unavailable => Ok(MetadataRefinement::default()),
            TagReader::Exif => match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
                Ok(exif) => Ok(refinement_from_exif(&exif)),
                Err(exif::Error::NotFound(_)) => Ok(MetadataRefinement::default()),
                Err(e) => Err(PipelineError::Metadata {
                    name: name.to_string(),
                    message: e.to_string(),
                }),
            },
        }
    }
}

fn refinement_from_exif(exif: &exif::Exif) -> MetadataRefinement {
    MetadataRefinement {
        dpi: x_resolution(exif),
        color_depth: bits_per_sample(exif),
    }
}

/// Horizontal resolution rounded to whole dots. Zero numerators and zero
/// denominators are treated as missing.
fn x_resolution(exif: &exif::Exif) -> Option<u32> {
    let field = exif.get_field(Tag::XResolution, In::PRIMARY)?;
    match &field.value {
        Value::Rational(v) => v.first().and_then(|r| {
            if r.num == 0 || r.denom == 0 {
                None
            } else {
                Some((f64::from(r.num) / f64::from(r.denom)).round() as u32)
            }
        }),
        _ => None,
    }
}

/// Sum of the per-channel bit counts.
fn bits_per_sample(exif: &exif::Exif) -> Option<u32> {
    let field = exif.get_field(Tag::BitsPerSample, In::PRIMARY)?;
    let total: u32 = match &field.value {
        Value::Short(v) => v.iter().map(|&b| u32::from(b)).sum(),
        Value::Long(v) => v.iter().sum(),
        _ => return None,
    };
    (total > 0).then_some(total)
}

/// Builds an [`ImageRecord`] for one file. Never fails outward.
pub struct MetadataExtractor {
    limits: LimitsConfig,
    tag_reader: TagReader,
}

impl MetadataExtractor {
    pub fn new(limits: LimitsConfig, tag_reader: TagReader) -> Self {
        Self { limits, tag_reader }
    }

    pub fn tag_reader(&self) -> TagReader {
        self.tag_reader
    }

    /// Extract the metadata record for a file.
    ///
    /// The dimension probe and the tag read fail independently; either
    /// failure only leaves its own fields at their defaults. Files over the
    /// size limit are never read, so only their label and fixed depth are set.
    pub async fn extract(&self, file: &FileHandle) -> ImageRecord {
        let start = Instant::now();
        let name = file.name();
        let mut record = ImageRecord::new(name);
        let kind = ImageKind::from_name(name);

        let bytes = match self.read_within_limit(file).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        };

        // Tags are read first so the buffer can move into the blocking probe
        if let Some(kind) = kind {
            record.compression = kind.compression();
            let refinement = match (kind, &bytes) {
                (ImageKind::Jpeg, Some(bytes)) => match self.tag_reader.read(name, bytes) {
                    Ok(refinement) => refinement,
                    Err(e) => {
                        tracing::warn!("{}", e);
                        MetadataRefinement::default()
                    }
                },
                (kind, _) => MetadataRefinement {
                    dpi: None,
                    color_depth: kind.fixed_color_depth(),
                },
            };
            record.apply(refinement);
        }

        if let Some(bytes) = bytes {
            match self.probe_dimensions(bytes, name).await {
                Ok((width, height)) => {
                    record.width = width;
                    record.height = height;
                }
                Err(e) => tracing::warn!("{}", e),
            }
        }
        tracing::trace!("  Dimensions: {:?}", start.elapsed());

        tracing::debug!(
            "Extracted {} in {:?} ({}x{}, {})",
            name,
            start.elapsed(),
            record.width,
            record.height,
            record.compression
        );
        record
    }

    /// Check the size against the limit, then read the whole file.
    async fn read_within_limit(&self, file: &FileHandle) -> PipelineResult<Vec<u8>> {
        let name = file.name();
        let read_error = |e: std::io::Error| PipelineError::Decode {
            name: name.to_string(),
            message: format!("Cannot read file: {}", e),
        };

        let size = file.size().await.map_err(read_error)?;
        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if size > max_bytes {
            return Err(PipelineError::FileTooLarge {
                name: name.to_string(),
                size_mb: size / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        file.read().await.map_err(read_error)
    }

    /// Read the pixel dimensions from the image header, with a timeout.
    async fn probe_dimensions(&self, bytes: Vec<u8>, name: &str) -> PipelineResult<(u32, u32)> {
        let name_owned = name.to_string();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);
        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_dimensions(&bytes, &name_owned)).await
        })
        .await;

        match decode_result {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(PipelineError::Decode {
                name: name.to_string(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                name: name.to_string(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous header read (runs in spawn_blocking). Pixel data is not decoded.
    fn decode_dimensions(bytes: &[u8], name: &str) -> PipelineResult<(u32, u32)> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                name: name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        if reader.format().is_none() {
            return Err(PipelineError::Decode {
                name: name.to_string(),
                message: "Unrecognized image data".to_string(),
            });
        }
        reader.into_dimensions().map_err(|e| PipelineError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(LimitsConfig::default(), TagReader::default())
    }
}
