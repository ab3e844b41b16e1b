//! Core data types for the pixinfo pipeline.
//!
//! These types represent the output of inspecting an image file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resolution assumed when the file carries no usable resolution tag.
pub const DEFAULT_DPI: u32 = 72;

/// Color depth (bits) assumed before any format-specific refinement.
pub const DEFAULT_COLOR_DEPTH: u32 = 24;

/// Format label shown in the compression column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compression {
    #[serde(rename = "JPEG")]
    Jpeg,
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "GIF")]
    Gif,
    #[serde(rename = "BMP")]
    Bmp,
    #[serde(rename = "WebP")]
    WebP,
    #[serde(rename = "TIFF")]
    Tiff,
    /// Format could not be determined
    #[default]
    #[serde(rename = "N/A")]
    Unknown,
}

impl Compression {
    /// The label as displayed in the results table.
    pub fn label(self) -> &'static str {
        match self {
            Compression::Jpeg => "JPEG",
            Compression::Png => "PNG",
            Compression::Gif => "GIF",
            Compression::Bmp => "BMP",
            Compression::WebP => "WebP",
            Compression::Tiff => "TIFF",
            Compression::Unknown => "N/A",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of output: the metadata recovered for a single image file.
///
/// Every file that enters the batch pipeline produces exactly one record.
/// Fields that could not be recovered keep the defaults from [`ImageRecord::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// File name, including extension
    pub name: String,

    /// Width in pixels (0 if the dimension probe failed)
    pub width: u32,

    /// Height in pixels (0 if the dimension probe failed)
    pub height: u32,

    /// Horizontal resolution in dots per inch
    pub dpi: u32,

    /// Bits per pixel
    pub color_depth: u32,

    /// Detected format
    pub compression: Compression,
}

impl ImageRecord {
    /// Create a record holding only defaults for the given file name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: 0,
            height: 0,
            dpi: DEFAULT_DPI,
            color_depth: DEFAULT_COLOR_DEPTH,
            compression: Compression::Unknown,
        }
    }

    /// Merge a refinement into this record, field by field.
    ///
    /// Only fields present in the refinement overwrite the current values.
    pub fn apply(&mut self, refinement: MetadataRefinement) {
        if let Some(dpi) = refinement.dpi {
            self.dpi = dpi;
        }
        if let Some(color_depth) = refinement.color_depth {
            self.color_depth = color_depth;
        }
    }

    /// Whether the dimension probe produced a size.
    pub fn has_dimensions(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Optional per-format overrides for an [`ImageRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataRefinement {
    pub dpi: Option<u32>,
    pub color_depth: Option<u32>,
}

impl MetadataRefinement {
    /// True if the refinement carries no values.
    pub fn is_empty(&self) -> bool {
        self.dpi.is_none() && self.color_depth.is_none()
    }
}

/// What a single inspection run ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Records in the order their files were collected
    Completed(Vec<ImageRecord>),
    /// Collection finished but no file qualified as an image
    NoImages,
    /// The user dismissed the folder picker
    Cancelled,
}

impl RunOutcome {
    /// Records produced by the run, empty unless it completed.
    pub fn records(&self) -> &[ImageRecord] {
        match self {
            RunOutcome::Completed(records) => records,
            RunOutcome::NoImages | RunOutcome::Cancelled => &[],
        }
    }
}

/// Statistics for a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunStats {
    /// Records produced
    pub processed: usize,

    /// Records whose dimension probe failed
    pub dimension_failures: usize,

    /// Total processing time in seconds
    pub elapsed_seconds: f64,
}

impl RunStats {
    /// Summarize a finished run.
    pub fn from_records(records: &[ImageRecord], elapsed: std::time::Duration) -> Self {
        Self {
            processed: records.len(),
            dimension_failures: records.iter().filter(|r| !r.has_dimensions()).count(),
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = ImageRecord::new("beach.jpg");
        assert_eq!(record.name, "beach.jpg");
        assert_eq!((record.width, record.height), (0, 0));
        assert_eq!(record.dpi, 72);
        assert_eq!(record.color_depth, 24);
        assert_eq!(record.compression, Compression::Unknown);
    }

    #[test]
    fn test_apply_only_overwrites_present_fields() {
        let mut record = ImageRecord::new("a.jpg");
        record.apply(MetadataRefinement {
            dpi: Some(300),
            color_depth: None,
        });
        assert_eq!(record.dpi, 300);
        assert_eq!(record.color_depth, 24);

        record.apply(MetadataRefinement::default());
        assert_eq!(record.dpi, 300);
    }

    #[test]
    fn test_compression_serializes_as_label() {
        let json = serde_json::to_string(&Compression::WebP).unwrap();
        assert_eq!(json, "\"WebP\"");
        let json = serde_json::to_string(&Compression::Unknown).unwrap();
        assert_eq!(json, "\"N/A\"");
        let parsed: Compression = serde_json::from_str("\"JPEG\"").unwrap();
        assert_eq!(parsed, Compression::Jpeg);
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = ImageRecord::new("scan.tif");
        record.compression = Compression::Tiff;
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"compression\":\"TIFF\""));
        assert!(json.contains("\"color_depth\":24"));
    }

    #[test]
    fn test_run_stats_counts_dimension_failures() {
        let mut ok = ImageRecord::new("ok.png");
        ok.width = 10;
        ok.height = 10;
        let broken = ImageRecord::new("broken.jpg");
        let stats = RunStats::from_records(&[ok, broken], std::time::Duration::from_secs(2));
        assert_eq!(stats.processed, 2);
        assert_eq!(stats.dimension_failures, 1);
        assert_eq!(stats.elapsed_seconds, 2.0);
    }

    #[test]
    fn test_outcome_records_empty_when_not_completed() {
        assert!(RunOutcome::NoImages.records().is_empty());
        assert!(RunOutcome::Cancelled.records().is_empty());
    }
}
