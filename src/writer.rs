use crate::error::{Error, Result};
use std::{
    collections::HashMap,
    fs,
    io::{Cursor, Write},
    path::Path,
};
use tracing::{debug, warn};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Raw,
    Artifact,
}

#[derive(Debug, Clone)]
struct OutputEntry {
    name: String,
    content: Vec<u8>,
    origin: Origin,
}

/// Output archive assembled in memory, one entry per name.
///
/// Copied source files never overwrite each other: the first one wins.
/// Generated artifacts take precedence over a copied file of the same name.
#[derive(Debug, Clone, Default)]
pub struct OutputArchive {
    entries: Vec<OutputEntry>,
    index: HashMap<String, usize>,
    collisions: usize,
}

impl OutputArchive {
    /// Creates an empty archive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a copied source file. Returns false if the name was taken.
    pub fn add_raw(&mut self, name: String, content: Vec<u8>) -> bool {
        if self.index.contains_key(&name) {
            warn!("Duplicate output name '{name}', keeping the first file");
            self.collisions += 1;
            return false;
        }

        self.push(name, content, Origin::Raw);
        true
    }

    /// Adds a generated text artifact, replacing any entry of the same name.
    pub fn add_artifact(&mut self, name: &str, content: String) {
        let Some(&position) = self.index.get(name) else {
            self.push(name.to_string(), content.into_bytes(), Origin::Artifact);
            return;
        };

        let existing = &mut self.entries[position];
        if existing.origin == Origin::Raw {
            warn!("Source file '{name}' is replaced by the generated artifact");
        } else {
            warn!("Artifact '{name}' generated twice, keeping the last one");
        }
        existing.content = content.into_bytes();
        existing.origin = Origin::Artifact;
        self.collisions += 1;
    }

    fn push(&mut self, name: String, content: Vec<u8>, origin: Origin) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(OutputEntry {
            name,
            content,
            origin,
        });
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of name collisions resolved so far.
    #[must_use]
    pub const fn collisions(&self) -> usize {
        self.collisions
    }

    /// Serializes every entry into a deflated zip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Archive`] if the zip writer fails.
    pub fn finish(self) -> Result<Vec<u8>> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.content).map_err(|e| Error::Archive {
                message: format!("{}: {e}", entry.name),
            })?;
        }

        let bytes = zip.finish()?.into_inner();
        debug!("Assembled output archive: {} entries, {} bytes", self.entries.len(), bytes.len());
        Ok(bytes)
    }
}

/// Writes `content` to `path` through a temporary file and a rename, so an
/// interrupted run never leaves a truncated archive behind.
///
/// # Errors
///
/// Returns [`Error::Io`] if the parent directory cannot be created or any
/// file operation fails.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = path.with_extension("tmp");
    let mut temp_file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{zip_names, zip_text};
    use assert_fs::prelude::*;

    #[test]
    fn test_raw_duplicates_keep_first() {
        let mut archive = OutputArchive::new();
        assert!(archive.add_raw("x.py".into(), b"first".to_vec()));
        assert!(!archive.add_raw("x.py".into(), b"second".to_vec()));

        assert_eq!(archive.len(), 1);
        assert_eq!(archive.collisions(), 1);

        let bytes = archive.finish().unwrap();
        assert_eq!(zip_text(&bytes, "x.py"), "first");
    }

    #[test]
    fn test_artifact_replaces_raw_entry() {
        let mut archive = OutputArchive::new();
        archive.add_raw("a.py".into(), b"a".to_vec());
        archive.add_raw("__code_complet.txt".into(), b"stale export".to_vec());
        archive.add_artifact("__code_complet.txt", "fresh".to_string());

        assert_eq!(archive.names().collect::<Vec<_>>(), vec!["a.py", "__code_complet.txt"]);
        let bytes = archive.finish().unwrap();
        assert_eq!(zip_text(&bytes, "__code_complet.txt"), "fresh");
    }

    #[test]
    fn test_finish_preserves_order() {
        let mut archive = OutputArchive::new();
        archive.add_raw("b.py".into(), Vec::new());
        archive.add_raw("a.py".into(), Vec::new());
        archive.add_artifact("__arborescence.txt", String::new());

        let bytes = archive.finish().unwrap();
        assert_eq!(zip_names(&bytes), vec!["b.py", "a.py", "__arborescence.txt"]);
    }

    #[test]
    fn test_empty_archive_is_valid_zip() {
        let archive = OutputArchive::new();
        assert!(archive.is_empty());
        let bytes = archive.finish().unwrap();
        assert!(zip_names(&bytes).is_empty());
    }

    #[test]
    fn test_write_file_atomic_creates_parent() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("out/nested/result.zip");

        write_file_atomic(target.path(), b"zip bytes").unwrap();

        target.assert("zip bytes");
        assert!(!temp.child("out/nested/result.tmp").path().exists());
    }

    #[test]
    fn test_write_file_atomic_overwrites() {
        let temp = assert_fs::TempDir::new().unwrap();
        let target = temp.child("result.zip");
        target.write_str("old").unwrap();

        write_file_atomic(target.path(), b"new").unwrap();
        target.assert("new");
    }
}
