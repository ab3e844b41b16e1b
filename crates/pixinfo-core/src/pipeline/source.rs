//! Host-side handles: files, drag-and-drop style entries, and directory pickers.
//!
//! The collector and extractor only see the traits in this module. The
//! filesystem implementations below back them with tokio and walkdir; tests and
//! embedders can supply their own.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::config::ProcessingConfig;
use crate::error::{PipelineError, PipelineResult};

/// Reference to a file's name and content. Content is read on demand.
#[derive(Clone)]
pub struct FileHandle {
    name: String,
    content: Content,
}

#[derive(Clone)]
enum Content {
    Disk(PathBuf),
    Memory(Arc<[u8]>),
}

impl FileHandle {
    /// Handle to a file on disk. The name is the final path component.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            content: Content::Disk(path),
        }
    }

    /// Handle to content already held in memory.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            content: Content::Memory(bytes.into()),
        }
    }

    /// File name, including extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Location on disk, if the handle is disk-backed.
    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            Content::Disk(path) => Some(path),
            Content::Memory(_) => None,
        }
    }

    /// Size of the content in bytes.
    pub async fn size(&self) -> io::Result<u64> {
        match &self.content {
            Content::Disk(path) => Ok(tokio::fs::metadata(path).await?.len()),
            Content::Memory(bytes) => Ok(bytes.len() as u64),
        }
    }

    /// Read the full content.
    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.content {
            Content::Disk(path) => tokio::fs::read(path).await,
            Content::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("FileHandle");
        s.field("name", &self.name);
        match &self.content {
            Content::Disk(path) => s.field("path", path),
            Content::Memory(bytes) => s.field("bytes", &bytes.len()),
        };
        s.finish()
    }
}

/// A dropped or listed filesystem entry.
pub enum Entry {
    File(Box<dyn FileEntry>),
    Directory(Box<dyn DirectoryEntry>),
}

impl Entry {
    /// Build a filesystem entry for a path, choosing the variant from its metadata.
    ///
    /// Paths whose metadata cannot be read become file entries; their
    /// resolution fails later and is reported there.
    pub fn from_path(path: impl Into<PathBuf>, config: &ProcessingConfig) -> Self {
        let path = path.into();
        if path.is_dir() {
            Entry::Directory(Box::new(FsDirectoryEntry::new(path, config)))
        } else {
            Entry::File(Box::new(FsFileEntry::new(path)))
        }
    }

    /// Entry name as shown by the host.
    pub fn name(&self) -> &str {
        match self {
            Entry::File(entry) => entry.name(),
            Entry::Directory(entry) => entry.name(),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::File(entry) => f.debug_tuple("File").field(&entry.name()).finish(),
            Entry::Directory(entry) => f.debug_tuple("Directory").field(&entry.name()).finish(),
        }
    }
}

/// An entry that resolves to a file. Resolution may fail or be deferred.
#[async_trait]
pub trait FileEntry: Send + Sync {
    fn name(&self) -> &str;

    async fn file(&self) -> io::Result<FileHandle>;
}

/// An entry whose children are listed through a [`DirectoryReader`].
pub trait DirectoryEntry: Send + Sync {
    fn name(&self) -> &str;

    fn create_reader(&self) -> Box<dyn DirectoryReader>;

    /// Stable identity of the underlying directory, if the host has one.
    ///
    /// Two entries reaching the same directory (through links, say) report the
    /// same identity, which lets a recursive walk skip directories it has
    /// already expanded.
    fn identity(&self) -> Option<PathBuf> {
        None
    }
}

/// Pages through the children of a directory.
#[async_trait]
pub trait DirectoryReader: Send {
    /// Return the next page of children. An empty page ends the listing.
    async fn read_entries(&mut self) -> io::Result<Vec<Entry>>;
}

/// Lets the user choose a directory.
#[async_trait]
pub trait DirectoryPicker: Send + Sync {
    /// `Ok(None)` means the user dismissed the picker.
    async fn pick(&self) -> PipelineResult<Option<Box<dyn DirectoryEntry>>>;
}

/// A file on the local filesystem.
pub struct FsFileEntry {
    path: PathBuf,
    name: String,
}

impl FsFileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self { path, name }
    }
}

#[async_trait]
impl FileEntry for FsFileEntry {
    fn name(&self) -> &str {
        &self.name
    }

    async fn file(&self) -> io::Result<FileHandle> {
        let meta = tokio::fs::metadata(&self.path).await?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", self.path.display()),
            ));
        }
        Ok(FileHandle::from_path(&self.path))
    }
}

/// A directory on the local filesystem.
pub struct FsDirectoryEntry {
    path: PathBuf,
    name: String,
    /// Canonical path; `None` if it could not be resolved
    canonical: Option<PathBuf>,
    page_size: usize,
    follow_links: bool,
}

impl FsDirectoryEntry {
    pub fn new(path: impl Into<PathBuf>, config: &ProcessingConfig) -> Self {
        let path = path.into();
        let canonical = std::fs::canonicalize(&path).ok();
        Self::with_options(path, canonical, config.page_size, config.follow_links)
    }

    fn with_options(
        path: PathBuf,
        canonical: Option<PathBuf>,
        page_size: usize,
        follow_links: bool,
    ) -> Self {
        let name = display_name(&path);
        Self {
            path,
            name,
            canonical,
            page_size: page_size.max(1),
            follow_links,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DirectoryEntry for FsDirectoryEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_reader(&self) -> Box<dyn DirectoryReader> {
        Box::new(FsDirectoryReader {
            path: self.path.clone(),
            page_size: self.page_size,
            follow_links: self.follow_links,
            pending: None,
        })
    }

    fn identity(&self) -> Option<PathBuf> {
        self.canonical.clone()
    }
}

/// Lists direct children sorted by file name, handing them out in pages.
pub struct FsDirectoryReader {
    path: PathBuf,
    page_size: usize,
    follow_links: bool,
    /// Children not yet returned, in listing order
    pending: Option<VecDeque<Child>>,
}

/// A listed child. Directories carry their canonical path.
enum Child {
    File(PathBuf),
    Directory(PathBuf, Option<PathBuf>),
}

impl FsDirectoryReader {
    fn list_children(path: &Path, follow_links: bool) -> io::Result<VecDeque<Child>> {
        let mut children = VecDeque::new();
        for item in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(follow_links)
            .sort_by_file_name()
        {
            match item {
                Ok(entry) => {
                    if entry.file_type().is_dir() {
                        let canonical = std::fs::canonicalize(entry.path()).ok();
                        children.push_back(Child::Directory(entry.into_path(), canonical));
                    } else {
                        children.push_back(Child::File(entry.into_path()));
                    }
                }
                Err(e) if e.depth() == 0 => return Err(e.into()),
                Err(e) => tracing::warn!("Skipping unreadable entry in {:?}: {}", path, e),
            }
        }
        Ok(children)
    }
}

#[async_trait]
impl DirectoryReader for FsDirectoryReader {
    async fn read_entries(&mut self) -> io::Result<Vec<Entry>> {
        if self.pending.is_none() {
            let path = self.path.clone();
            let follow_links = self.follow_links;
            let listed =
                tokio::task::spawn_blocking(move || Self::list_children(&path, follow_links))
                    .await
                    .map_err(io::Error::other)??;
            self.pending = Some(listed);
        }
        let Some(pending) = self.pending.as_mut() else {
            return Ok(Vec::new());
        };

        let take = self.page_size.min(pending.len());
        let (page_size, follow_links) = (self.page_size, self.follow_links);
        Ok(pending
            .drain(..take)
            .map(|child| match child {
                Child::Directory(path, canonical) => Entry::Directory(Box::new(
                    FsDirectoryEntry::with_options(path, canonical, page_size, follow_links),
                )),
                Child::File(path) => Entry::File(Box::new(FsFileEntry::new(path))),
            })
            .collect())
    }
}

/// A picker whose answer was given up front, e.g. on the command line.
pub struct PathPicker {
    path: PathBuf,
    config: ProcessingConfig,
}

impl PathPicker {
    pub fn new(path: impl Into<PathBuf>, config: &ProcessingConfig) -> Self {
        Self {
            path: path.into(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl DirectoryPicker for PathPicker {
    async fn pick(&self) -> PipelineResult<Option<Box<dyn DirectoryEntry>>> {
        let meta = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| PipelineError::Traversal {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        if !meta.is_dir() {
            return Err(PipelineError::Traversal {
                path: self.path.clone(),
                message: "not a directory".to_string(),
            });
        }
        Ok(Some(Box::new(FsDirectoryEntry::new(&self.path, &self.config))))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_page_size(page_size: usize) -> ProcessingConfig {
        ProcessingConfig {
            page_size,
            ..ProcessingConfig::default()
        }
    }

    #[tokio::test]
    async fn test_memory_handle_reads_bytes() {
        let handle = FileHandle::from_bytes("a.png", vec![1u8, 2, 3]);
        assert_eq!(handle.name(), "a.png");
        assert!(handle.path().is_none());
        assert_eq!(handle.size().await.unwrap(), 3);
        assert_eq!(handle.read().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_disk_handle_name_is_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.JPG");
        std::fs::write(&path, b"abcd").unwrap();

        let handle = FileHandle::from_path(&path);
        assert_eq!(handle.name(), "photo.JPG");
        assert_eq!(handle.size().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_reader_pages_until_empty() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.png", "a.png", "b.png"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("d")).unwrap();

        let entry = FsDirectoryEntry::new(dir.path(), &config_with_page_size(2));
        let mut reader = entry.create_reader();

        let first = reader.read_entries().await.unwrap();
        let second = reader.read_entries().await.unwrap();
        let third = reader.read_entries().await.unwrap();

        let names: Vec<&str> = first.iter().chain(second.iter()).map(Entry::name).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png", "d"]);
        assert_eq!(first.len(), 2);
        assert!(matches!(second[1], Entry::Directory(_)));
        assert!(third.is_empty());
    }

    #[tokio::test]
    async fn test_reader_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let entry = FsDirectoryEntry::new(dir.path().join("gone"), &ProcessingConfig::default());
        let mut reader = entry.create_reader();
        assert!(reader.read_entries().await.is_err());
    }

    #[tokio::test]
    async fn test_file_entry_rejects_directories() {
        let dir = tempfile::tempdir().unwrap();
        let entry = FsFileEntry::new(dir.path());
        assert!(entry.file().await.is_err());
    }

    #[tokio::test]
    async fn test_entry_from_path_picks_variant() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.gif");
        std::fs::write(&file, b"x").unwrap();

        let config = ProcessingConfig::default();
        assert!(matches!(Entry::from_path(dir.path(), &config), Entry::Directory(_)));
        assert!(matches!(Entry::from_path(&file, &config), Entry::File(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_linked_directory_shares_identity_with_target() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        let root = FsDirectoryEntry::new(dir.path(), &ProcessingConfig::default());
        let children = root.create_reader().read_entries().await.unwrap();
        let ids: Vec<Option<PathBuf>> = children
            .iter()
            .map(|child| match child {
                Entry::Directory(d) => d.identity(),
                Entry::File(_) => None,
            })
            .collect();

        assert_eq!(ids.len(), 2);
        assert!(ids[0].is_some());
        assert_eq!(ids[0], ids[1]);
        assert_ne!(ids[0], root.identity());
    }

    #[tokio::test]
    async fn test_path_picker_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.gif");
        std::fs::write(&file, b"x").unwrap();
        let config = ProcessingConfig::default();

        let picked = PathPicker::new(dir.path(), &config).pick().await.unwrap();
        assert!(picked.is_some());

        let err = PathPicker::new(&file, &config).pick().await.err().unwrap();
        assert!(matches!(err, PipelineError::Traversal { .. }));
    }
}
