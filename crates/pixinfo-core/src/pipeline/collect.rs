//! Turns files, dropped entries or a chosen directory into a flat list of images.

use std::collections::HashSet;
use std::path::PathBuf;

use super::sniff::FormatSniffer;
use super::source::{DirectoryEntry, Entry, FileEntry, FileHandle};

/// What the user handed over.
pub enum CollectInput {
    /// A flat list of files; only filtered
    Files(Vec<FileHandle>),
    /// Dropped entries; directories are expanded recursively
    Entries(Vec<Entry>),
    /// A chosen directory; only its direct file children are considered
    Directory(Box<dyn DirectoryEntry>),
}

/// Collects image files in discovery order.
///
/// Unreadable entries and directories are logged and contribute nothing;
/// collection itself never fails.
#[derive(Debug, Clone, Default)]
pub struct TreeCollector {
    sniffer: FormatSniffer,
}

impl TreeCollector {
    pub fn new(sniffer: FormatSniffer) -> Self {
        Self { sniffer }
    }

    pub fn sniffer(&self) -> &FormatSniffer {
        &self.sniffer
    }

    /// Collect every image file reachable from the input.
    pub async fn collect(&self, input: CollectInput) -> Vec<FileHandle> {
        let files = match input {
            CollectInput::Files(files) => files
                .into_iter()
                .filter(|file| self.sniffer.is_image(file.name()))
                .collect(),
            CollectInput::Entries(entries) => self.collect_entries(entries).await,
            CollectInput::Directory(dir) => self.collect_directory(dir.as_ref()).await,
        };
        tracing::debug!("Collected {} image file(s)", files.len());
        files
    }

    /// Depth-first walk over dropped entries using an explicit stack.
    ///
    /// Each directory identity is expanded at most once, so linked cycles end
    /// and a directory reachable twice contributes its files once.
    async fn collect_entries(&self, entries: Vec<Entry>) -> Vec<FileHandle> {
        let mut files = Vec::new();
        let mut visited: HashSet<PathBuf> = HashSet::new();
        // Reversed so entries pop in the order they were discovered
        let mut stack: Vec<Entry> = entries.into_iter().rev().collect();

        while let Some(entry) = stack.pop() {
            match entry {
                Entry::File(file) => {
                    if let Some(handle) = self.resolve(file.as_ref()).await {
                        files.push(handle);
                    }
                }
                Entry::Directory(dir) => {
                    if let Some(id) = dir.identity() {
                        if !visited.insert(id) {
                            tracing::warn!("Skipping {}: directory already visited", dir.name());
                            continue;
                        }
                    }
                    let children = read_all_entries(dir.as_ref()).await;
                    tracing::trace!("{}: {} child entries", dir.name(), children.len());
                    stack.extend(children.into_iter().rev());
                }
            }
        }
        files
    }

    /// Direct file children of a chosen directory. Sub-directories are not entered.
    async fn collect_directory(&self, dir: &dyn DirectoryEntry) -> Vec<FileHandle> {
        let mut files = Vec::new();
        for entry in read_all_entries(dir).await {
            match entry {
                Entry::File(file) => {
                    if let Some(handle) = self.resolve(file.as_ref()).await {
                        files.push(handle);
                    }
                }
                Entry::Directory(sub) => {
                    tracing::debug!("Not descending into {}/{}", dir.name(), sub.name());
                }
            }
        }
        files
    }

    async fn resolve(&self, entry: &dyn FileEntry) -> Option<FileHandle> {
        match entry.file().await {
            Ok(handle) if self.sniffer.is_image(handle.name()) => Some(handle),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("Error reading file {}: {}", entry.name(), e);
                None
            }
        }
    }
}

/// Read pages from a directory until the host returns an empty one.
///
/// A failing read ends the listing; entries from earlier pages are kept.
async fn read_all_entries(dir: &dyn DirectoryEntry) -> Vec<Entry> {
    let mut reader = dir.create_reader();
    let mut entries = Vec::new();
    loop {
        match reader.read_entries().await {
            Ok(batch) if batch.is_empty() => break,
            Ok(batch) => entries.extend(batch),
            Err(e) => {
                tracing::warn!("Error reading directory {}: {}", dir.name(), e);
                break;
            }
        }
    }
    entries
}
