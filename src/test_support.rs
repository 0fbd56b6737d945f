//! In-memory zip fixtures shared by the unit tests.

use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Builds a zip from `(name, content)` pairs. Names ending in `/` become
/// directory entries.
pub(crate) fn zip_fixture(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build(entries, SimpleFileOptions::default())
}

/// Same as [`zip_fixture`] with uncompressed entries, so contents can be
/// located and altered in the raw bytes.
pub(crate) fn zip_fixture_stored(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build(
        entries,
        SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
    )
}

fn build(entries: &[(&str, &[u8])], options: SimpleFileOptions) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, content) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }

    writer.finish().unwrap().into_inner()
}

/// Entry names of a zip, in archive order.
pub(crate) fn zip_names(bytes: &[u8]) -> Vec<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Content of one zip entry as text.
pub(crate) fn zip_text(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut text = String::new();
    file.read_to_string(&mut text).unwrap();
    text
}
