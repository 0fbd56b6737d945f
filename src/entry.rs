use crate::language::language_for;
use crate::profile::Categories;
use crate::rules::extension;

const BLOCK_START: &str = "-- DEBUT DU FICHIER --";
const BLOCK_CODE: &str = "-- CONTENU DU CODE --";
const BLOCK_END: &str = "-- FIN DU FICHIER --";

/// Location of one file inside the source archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPath {
    /// Path exactly as stored in the archive
    pub raw_path: String,

    /// Root-stripped, `/`-separated path used for every rule
    pub normalized_path: String,
}

impl EntryPath {
    /// Normalizes a raw archive path.
    ///
    /// Backslashes become `/`, then `root_prefix` (including its trailing
    /// `/`) is removed when present.
    #[must_use]
    pub fn new(raw_path: impl Into<String>, root_prefix: Option<&str>) -> Self {
        let raw_path = raw_path.into();
        let unified = raw_path.replace('\\', "/");
        let normalized_path = root_prefix
            .and_then(|prefix| unified.strip_prefix(prefix))
            .map_or_else(|| unified.clone(), str::to_string);

        Self {
            raw_path,
            normalized_path,
        }
    }

    /// Splits the normalized path on `/`.
    #[must_use]
    pub fn components(&self) -> Vec<&str> {
        self.normalized_path.split('/').collect()
    }

    /// Last component of the normalized path.
    #[must_use]
    pub fn basename(&self) -> &str {
        self.normalized_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.normalized_path)
    }

    /// Unicode-aware lowercase basename.
    #[must_use]
    pub fn basename_lower(&self) -> String {
        self.basename().to_lowercase()
    }
}

/// A kept archive file with its raw bytes.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Where the file lives in the archive
    pub path: EntryPath,

    /// Raw, undecoded content
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    /// Creates an entry from its path and content.
    #[must_use]
    pub const fn new(path: EntryPath, content: Vec<u8>) -> Self {
        Self { path, content }
    }

    /// Renders the entry as a content block.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    #[must_use]
    pub fn to_content_block(&self) -> ContentBlock {
        ContentBlock::new(
            &self.path.normalized_path,
            self.path.basename(),
            &String::from_utf8_lossy(&self.content),
        )
    }
}

/// Formatted text rendering of one included file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBlock {
    display_path: String,
    stylesheet: bool,
    text: String,
}

impl ContentBlock {
    /// Builds the delimited block for a file.
    #[must_use]
    pub fn new(display_path: &str, basename: &str, content: &str) -> Self {
        let language = language_for(basename);
        let text = format!(
            "{BLOCK_START}\nChemin: {display_path}\nLangage: {language}\n{BLOCK_CODE}\n{content}\n{BLOCK_END}"
        );

        Self {
            display_path: display_path.to_string(),
            stylesheet: extension(basename).eq_ignore_ascii_case(".css"),
            text,
        }
    }

    /// Path shown in the block header.
    #[must_use]
    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    /// True for stylesheets, which are left out of the sans-CSS aggregate.
    #[must_use]
    pub const fn is_stylesheet(&self) -> bool {
        self.stylesheet
    }

    /// The rendered block.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// A content block together with the labels its profile assigned.
#[derive(Debug, Clone)]
pub struct CategorizedBlock {
    /// Rendered file
    pub block: ContentBlock,

    /// Labels, never empty
    pub categories: Categories,
}

impl CategorizedBlock {
    /// Returns true if the block carries `label`.
    #[must_use]
    pub fn has(&self, label: &str) -> bool {
        self.categories.contains(label)
    }

    /// Returns true if the block carries any of `labels`.
    #[must_use]
    pub fn has_any(&self, labels: &[&str]) -> bool {
        labels.iter().any(|label| self.has(label))
    }
}
