//! Pixinfo Core - Embeddable image metadata inspection library.
//!
//! Pixinfo takes dropped files and folders (or a chosen directory), keeps the
//! ones that look like images, and reports basic metadata for each one:
//! pixel dimensions, resolution, color depth and a compression label.
//!
//! # Architecture
//!
//! ```text
//! Input → Collect (sniff + traverse) → Extract (probe + refine) → Records
//! ```
//!
//! Files are processed strictly one at a time, in discovery order. Per-file
//! failures are logged and leave the record with default values.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pixinfo_core::{CollectInput, Config, Entry, Inspector, ResultTable};
//!
//! #[tokio::main]
//! async fn main() -> pixinfo_core::Result<()> {
//!     let config = Config::load()?;
//!     let inspector = Inspector::new(config);
//!
//!     let entry = Entry::from_path("./photos", &inspector.config().processing);
//!     let mut table = ResultTable::new();
//!     inspector.inspect(CollectInput::Entries(vec![entry]), &mut table).await;
//!     println!("{}", table.render());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod status;
pub mod table;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult, PixinfoError, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{
    BatchPipeline, CollectInput, DirectoryEntry, DirectoryPicker, Entry, FileHandle,
    FormatSniffer, MetadataExtractor, NoopSink, PathPicker, ProgressSink, TagReader,
    TreeCollector,
};
pub use status::{StatusLine, StatusMessage};
pub use table::ResultTable;
pub use types::{Compression, ImageRecord, MetadataRefinement, RunOutcome, RunStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pixinfo inspector - the main entry point for metadata inspection.
pub struct Inspector {
    config: Config,
    collector: TreeCollector,
    pipeline: BatchPipeline,
}

impl Inspector {
    /// Create an inspector reading JPEG tags with the EXIF reader.
    pub fn new(config: Config) -> Self {
        Self::with_tag_reader(config, TagReader::default())
    }

    /// Create an inspector with an explicit JPEG tag reader.
    pub fn with_tag_reader(config: Config, tag_reader: TagReader) -> Self {
        tracing::debug!("Initializing pixinfo v{}", VERSION);
        let collector = TreeCollector::new(FormatSniffer::new(&config.processing));
        let extractor = MetadataExtractor::new(config.limits.clone(), tag_reader);
        Self {
            config,
            collector,
            pipeline: BatchPipeline::new(extractor),
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collect images from the input without processing them.
    pub async fn collect(&self, input: CollectInput) -> Vec<FileHandle> {
        self.collector.collect(input).await
    }

    /// Collect images from the input and extract a record for each.
    ///
    /// When nothing qualifies, the sink is told via `no_images` and no
    /// processing takes place.
    pub async fn inspect(&self, input: CollectInput, sink: &mut dyn ProgressSink) -> RunOutcome {
        let files = self.collector.collect(input).await;
        if files.is_empty() {
            tracing::info!("No images found");
            sink.no_images();
            return RunOutcome::NoImages;
        }

        tracing::info!("Inspecting {} image(s)", files.len());
        RunOutcome::Completed(self.pipeline.run(&files, sink).await)
    }

    /// Ask the picker for a folder and inspect its direct image children.
    ///
    /// A dismissed picker yields [`RunOutcome::Cancelled`]; a picker the host
    /// cannot offer is an error.
    pub async fn select_folder(
        &self,
        picker: &dyn DirectoryPicker,
        sink: &mut dyn ProgressSink,
    ) -> Result<RunOutcome> {
        match picker.pick().await? {
            Some(dir) => {
                tracing::debug!("Folder selected: {}", dir.name());
                Ok(self.inspect(CollectInput::Directory(dir), sink).await)
            }
            None => {
                tracing::debug!("Folder selection cancelled");
                Ok(RunOutcome::Cancelled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extract::tests::encode;
    use async_trait::async_trait;
    use image::ImageFormat;

    struct FixedPicker(Option<std::path::PathBuf>);

    #[async_trait]
    impl DirectoryPicker for FixedPicker {
        async fn pick(&self) -> PipelineResult<Option<Box<dyn DirectoryEntry>>> {
            Ok(self.0.as_ref().map(|path| {
                Box::new(pipeline::FsDirectoryEntry::new(
                    path,
                    &config::ProcessingConfig::default(),
                )) as Box<dyn DirectoryEntry>
            }))
        }
    }

    struct NoPicker;

    #[async_trait]
    impl DirectoryPicker for NoPicker {
        async fn pick(&self) -> PipelineResult<Option<Box<dyn DirectoryEntry>>> {
            Err(PipelineError::PickerUnavailable("headless".into()))
        }
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[tokio::test]
    async fn test_inspect_dropped_folder() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), encode(4, 3, ImageFormat::Png)).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.gif"), encode(2, 2, ImageFormat::Gif)).unwrap();

        let inspector = Inspector::new(Config::default());
        let entry = Entry::from_path(dir.path(), &inspector.config().processing);
        let mut table = ResultTable::new();
        let outcome = inspector
            .inspect(CollectInput::Entries(vec![entry]), &mut table)
            .await;

        let records = outcome.records();
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].width, records[0].height), (4, 3));
        assert_eq!(records[0].color_depth, 32);
        assert_eq!(records[1].compression, Compression::Gif);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.processed(), 2);
    }

    #[tokio::test]
    async fn test_inspect_without_images() {
        let inspector = Inspector::new(Config::default());
        let files = vec![FileHandle::from_bytes("readme.md", b"# hi".to_vec())];
        let mut status = StatusLine::new(&inspector.config().status);
        let outcome = inspector.inspect(CollectInput::Files(files), &mut status).await;
        assert!(matches!(outcome, RunOutcome::NoImages));
        assert_eq!(status.message(), StatusMessage::NoImages);
    }

    #[tokio::test]
    async fn test_select_folder_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.bmp"), encode(1, 1, ImageFormat::Bmp)).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/b.png"), encode(1, 1, ImageFormat::Png)).unwrap();

        let inspector = Inspector::new(Config::default());
        let picker = FixedPicker(Some(dir.path().to_path_buf()));
        let outcome = inspector.select_folder(&picker, &mut NoopSink).await.unwrap();

        let names: Vec<&str> = outcome.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a.bmp"]);
    }

    #[tokio::test]
    async fn test_select_folder_cancelled() {
        let inspector = Inspector::new(Config::default());
        let outcome = inspector
            .select_folder(&FixedPicker(None), &mut NoopSink)
            .await
            .unwrap();
        assert!(matches!(outcome, RunOutcome::Cancelled));
    }

    #[tokio::test]
    async fn test_select_folder_unavailable() {
        let inspector = Inspector::new(Config::default());
        let err = inspector
            .select_folder(&NoPicker, &mut NoopSink)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PixinfoError::Pipeline(PipelineError::PickerUnavailable(_))
        ));
    }
}
