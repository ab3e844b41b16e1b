//! Extension-based image classification.

use crate::config::ProcessingConfig;
use crate::types::Compression;

/// Format family derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
    Tiff,
}

impl ImageKind {
    /// Classify a file by the text after its last dot, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "bmp" => Some(Self::Bmp),
            "webp" => Some(Self::WebP),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Label for the compression column.
    pub fn compression(self) -> Compression {
        match self {
            Self::Jpeg => Compression::Jpeg,
            Self::Png => Compression::Png,
            Self::Gif => Compression::Gif,
            Self::Bmp => Compression::Bmp,
            Self::WebP => Compression::WebP,
            Self::Tiff => Compression::Tiff,
        }
    }

    /// Fixed color depth reported for this format, if it overrides the default.
    pub fn fixed_color_depth(self) -> Option<u32> {
        match self {
            Self::Png => Some(32),
            Self::Gif => Some(8),
            Self::Jpeg | Self::Bmp | Self::WebP | Self::Tiff => None,
        }
    }
}

/// Decides whether a file is an image by looking at its name only.
#[derive(Debug, Clone)]
pub struct FormatSniffer {
    /// Lower-cased suffixes including the leading dot
    suffixes: Vec<String>,
}

impl FormatSniffer {
    /// Create a sniffer accepting the configured extensions.
    pub fn new(config: &ProcessingConfig) -> Self {
        let suffixes = config
            .supported_formats
            .iter()
            .map(|fmt| format!(".{}", fmt.trim_start_matches('.').to_lowercase()))
            .collect();
        Self { suffixes }
    }

    /// Whether the file name ends with a recognized image extension.
    pub fn is_image(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }
}

impl Default for FormatSniffer {
    fn default() -> Self {
        Self::new(&ProcessingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_accepts_known_extensions() {
        let sniffer = FormatSniffer::default();
        for name in [
            "a.jpg", "a.jpeg", "a.png", "a.gif", "a.bmp", "a.tiff", "a.tif", "a.webp",
        ] {
            assert!(sniffer.is_image(name), "{name} should be accepted");
        }
    }

    #[test]
    fn test_is_image_is_case_insensitive() {
        let sniffer = FormatSniffer::default();
        assert!(sniffer.is_image("A.JPG"));
        assert!(sniffer.is_image("Scan.TiF"));
    }

    #[test]
    fn test_is_image_rejects_other_names() {
        let sniffer = FormatSniffer::default();
        assert!(!sniffer.is_image("notes.txt"));
        assert!(!sniffer.is_image("archive.jpg.zip"));
        assert!(!sniffer.is_image("README"));
        assert!(!sniffer.is_image("photo.heic"));
        assert!(!sniffer.is_image(""));
    }

    #[test]
    fn test_sniffer_uses_configured_formats() {
        let config = ProcessingConfig {
            supported_formats: vec!["HEIC".into(), ".avif".into()],
            ..ProcessingConfig::default()
        };
        let sniffer = FormatSniffer::new(&config);
        assert!(sniffer.is_image("x.heic"));
        assert!(sniffer.is_image("x.AVIF"));
        assert!(!sniffer.is_image("x.jpg"));
    }

    #[test]
    fn test_image_kind_from_name() {
        assert_eq!(ImageKind::from_name("a.JPEG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_name("a.b.tif"), Some(ImageKind::Tiff));
        assert_eq!(ImageKind::from_name("jpg"), None);
        assert_eq!(ImageKind::from_name("a.txt"), None);
    }

    #[test]
    fn test_fixed_color_depths() {
        assert_eq!(ImageKind::Png.fixed_color_depth(), Some(32));
        assert_eq!(ImageKind::Gif.fixed_color_depth(), Some(8));
        assert_eq!(ImageKind::Bmp.fixed_color_depth(), None);
        assert_eq!(ImageKind::WebP.compression(), Compression::WebP);
    }
}
