//! Plain-text directory listing of an archive.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::io::Cursor;
use zip::ZipArchive;

const EMPTY_ARCHIVE: &str = "Le fichier ZIP est vide.";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

#[derive(Debug, Default)]
struct Node {
    children: BTreeMap<String, Node>,
}

impl Node {
    fn insert<'a>(&mut self, segments: impl Iterator<Item = &'a str>) {
        let mut current = self;
        for segment in segments {
            current = current.children.entry(segment.to_string()).or_default();
        }
    }

    fn render(&self, prefix: &str, lines: &mut Vec<String>) {
        let count = self.children.len();
        for (i, (name, child)) in self.children.iter().enumerate() {
            let last = i + 1 == count;
            let connector = if last { LAST_BRANCH } else { BRANCH };
            lines.push(format!("{prefix}{connector}{name}"));

            if !child.children.is_empty() {
                let extension = if last { SPACE } else { PIPE };
                child.render(&format!("{prefix}{extension}"), lines);
            }
        }
    }
}

/// Returns the first segment of the first sorted path when every path lives
/// under it.
fn shared_root(sorted: &[&str]) -> Option<String> {
    let first = sorted.first()?.split('/').next()?;
    let nested = format!("{first}/");

    let all_under = sorted.iter().all(|p| *p == first || p.starts_with(&nested));
    let any_nested = sorted.iter().any(|p| p.starts_with(&nested));

    (!first.is_empty() && all_under && any_nested).then(|| first.to_string())
}

/// Renders the sorted tree of every entry (directories included) of a zip.
///
/// A shared top-level directory is printed alone on the first line and the
/// rest of the tree is indented under it.
///
/// # Errors
///
/// Returns [`Error::InvalidArchive`] if `archive` is not a readable zip.
pub fn generate_tree(archive: &[u8]) -> Result<String> {
    let archive = ZipArchive::new(Cursor::new(archive)).map_err(Error::invalid_archive)?;

    let mut paths: Vec<&str> = archive.file_names().collect();
    if paths.is_empty() {
        return Ok(EMPTY_ARCHIVE.to_string());
    }
    paths.sort_unstable();

    let root = shared_root(&paths);
    let mut tree = Node::default();
    for path in &paths {
        let relative = match &root {
            Some(root) => path
                .strip_prefix(root.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
                .unwrap_or(""),
            None => path,
        };
        tree.insert(relative.split('/').filter(|s| !s.is_empty()));
    }

    let mut lines = Vec::new();
    match root {
        Some(root) => {
            lines.push(root);
            tree.render(PIPE, &mut lines);
        }
        None => tree.render("", &mut lines),
    }

    Ok(lines.join("\n"))
}
