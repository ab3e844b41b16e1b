//! Image metadata pipeline components.
//!
//! - **sniff**: Classify files as images by extension
//! - **source**: Host handles for files, dropped entries and pickers
//! - **collect**: Expand inputs into an ordered list of image files
//! - **extract**: Probe dimensions and format-specific metadata for one file
//! - **batch**: Drive extraction over a collection, one file at a time

pub mod batch;
pub mod collect;
pub mod extract;
pub mod sniff;
pub mod source;

// Re-exports for convenient access
pub use batch::{BatchPipeline, NoopSink, ProgressSink};
pub use collect::{CollectInput, TreeCollector};
pub use extract::{MetadataExtractor, TagReader};
pub use sniff::{FormatSniffer, ImageKind};
pub use source::{
    DirectoryEntry, DirectoryPicker, DirectoryReader, Entry, FileEntry, FileHandle,
    FsDirectoryEntry, FsFileEntry, PathPicker,
};
