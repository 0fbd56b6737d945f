//! Archive walker: enumerates the input zip and sorts every entry into raw
//! output files and categorized content blocks.

use crate::entry::{ArchiveEntry, CategorizedBlock, EntryPath};
use crate::error::{Error, Result};
use crate::filter::{Decision, DropReason, EntryGate};
use crate::naming::output_file_name;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io::{Cursor, Read};
use tracing::{debug, trace, warn};
use zip::ZipArchive;

/// Statistics collected during a walk.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// File entries enumerated (directories excluded)
    pub total_files: usize,

    /// Directory entries skipped
    pub directories: usize,

    /// Files written to the output archive
    pub kept_files: usize,

    /// Kept files rendered into the aggregates
    pub content_blocks: usize,

    /// Kept files left out of every aggregate
    pub raw_only_files: usize,

    /// Dropped files per reason
    pub dropped: BTreeMap<DropReason, usize>,

    /// Uncompressed bytes of kept files
    pub bytes_read: u64,

    /// Shared top-level directory stripped from every path
    pub root_prefix: Option<String>,
}

impl WalkStats {
    /// Total number of dropped files.
    #[must_use]
    pub fn dropped_files(&self) -> usize {
        self.dropped.values().sum()
    }

    fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_default() += 1;
    }
}

/// A kept file, renamed for the output archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFile {
    /// Name inside the output archive
    pub name: String,
    /// Unmodified content
    pub content: Vec<u8>,
}

/// Everything a walk produced.
#[derive(Debug, Clone)]
pub struct WalkOutput {
    /// Kept files in archive order
    pub raw_files: Vec<RawFile>,

    /// Rendered and labeled files in archive order
    pub blocks: Vec<CategorizedBlock>,

    /// Counters
    pub stats: WalkStats,
}

/// Returns the first segment of the first path, slash included, when every
/// path starts with it.
///
/// `proj/a.py` + `proj/sub/b.py` share `proj/`; `a.py` + `proj/b.py` share
/// nothing.
#[must_use]
pub fn detect_root_prefix<S: AsRef<str>>(paths: &[S]) -> Option<String> {
    let (first, _) = paths.first()?.as_ref().split_once('/')?;
    if first.is_empty() {
        return None;
    }

    let prefix = format!("{first}/");
    paths
        .iter()
        .all(|p| p.as_ref().starts_with(&prefix))
        .then_some(prefix)
}

/// Last path segment, whichever separator the archive used.
fn raw_basename(raw: &str) -> &str {
    raw.rsplit(['/', '\\']).next().unwrap_or(raw)
}

/// Walks an input archive through an [`EntryGate`].
#[derive(Debug, Clone)]
pub struct Walker {
    gate: EntryGate,
}

impl Walker {
    /// Creates a walker. Output names follow the gate's extension mode.
    #[must_use]
    pub const fn new(gate: EntryGate) -> Self {
        Self { gate }
    }

    /// Walks every entry of `archive`, in archive order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if `archive` is not a readable zip
    /// or if any kept entry cannot be read back (e.g. a CRC mismatch).
    pub fn walk(&self, archive: &[u8]) -> Result<WalkOutput> {
        let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(Error::invalid_archive)?;
        let mut stats = WalkStats::default();

        let mut files: Vec<(usize, String)> = Vec::new();
        for index in 0..zip.len() {
            let file = zip.by_index(index).map_err(Error::invalid_archive)?;
            if file.is_dir() {
                stats.directories += 1;
            } else {
                files.push((index, file.name().to_string()));
            }
        }
        stats.total_files = files.len();

        let unified: Vec<String> = files.iter().map(|(_, raw)| raw.replace('\\', "/")).collect();
        let root_prefix = detect_root_prefix(&unified);
        if let Some(prefix) = &root_prefix {
            debug!("Detected shared root '{prefix}'");
        }

        let mut basename_counts: HashMap<&str, usize> = HashMap::new();
        for (_, raw) in &files {
            *basename_counts.entry(raw_basename(raw)).or_default() += 1;
        }

        let mut raw_files = Vec::new();
        let mut blocks = Vec::new();

        for (index, raw) in &files {
            let path = EntryPath::new(raw.as_str(), root_prefix.as_deref());

            let decision = self.gate.decide(&path);
            if let Decision::Drop(reason) = decision {
                debug!("Dropped {} ({reason})", path.normalized_path);
                stats.record_drop(reason);
                continue;
            }

            let content = Self::read_entry(&mut zip, *index).inspect_err(|e| {
                warn!("Failed to read {raw}: {e}");
            })?;

            let unique = basename_counts.get(raw_basename(raw)).copied().unwrap_or(0) <= 1;
            let name = output_file_name(&path, unique, self.gate.keep_original_extension());
            trace!("Kept {} as {name}", path.normalized_path);

            stats.kept_files += 1;
            stats.bytes_read += content.len() as u64;

            let entry = ArchiveEntry::new(path, content);
            if decision == Decision::Include {
                let categories = self
                    .gate
                    .profile()
                    .categorize_file(&entry.path.normalized_path);
                blocks.push(CategorizedBlock {
                    block: entry.to_content_block(),
                    categories,
                });
                stats.content_blocks += 1;
            } else {
                stats.raw_only_files += 1;
            }

            raw_files.push(RawFile {
                name,
                content: entry.content,
            });
        }

        stats.root_prefix = root_prefix;
        debug!(
            "Walk complete: {} files, {} kept, {} blocks, {} dropped",
            stats.total_files,
            stats.kept_files,
            stats.content_blocks,
            stats.dropped_files()
        );

        Ok(WalkOutput {
            raw_files,
            blocks,
            stats,
        })
    }

    fn read_entry(zip: &mut ZipArchive<Cursor<&[u8]>>, index: usize) -> Result<Vec<u8>> {
        let mut file = zip.by_index(index).map_err(Error::invalid_archive)?;
        let mut content = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut content)
            .map_err(|e| Error::invalid_archive(format!("{}: {e}", file.name())))?;
        Ok(content)
    }
}
