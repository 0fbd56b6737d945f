//! Consolidation engine: joins content blocks into the text exports.
//!
//! Two aggregates exist whatever the profile: the full code (prefixed by the
//! archive tree) and the full code without stylesheets. Everything else is
//! delegated to the active profile.

use crate::entry::CategorizedBlock;
use crate::profile::{AnalysisProfile, ConsolidatedFile};

/// Separator placed between two joined blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Standalone tree artifact.
pub const TREE_ARTIFACT: &str = "__arborescence.txt";

/// Tree header followed by every content block.
pub const FULL_CODE_ARTIFACT: &str = "__code_complet.txt";

/// Every content block except stylesheets.
pub const FULL_CODE_SANS_CSS_ARTIFACT: &str = "__code_complet_sans_CSS.txt";

const TREE_HEADER_START: &str = "--- DEBUT DE L'ARBORESCENCE ---";
const TREE_HEADER_END: &str = "--- FIN DE L'ARBORESCENCE ---";

/// Joins parts in order with [`BLOCK_SEPARATOR`].
///
/// No sorting and no deduplication: `["A", "B", "C"]` gives `"A\n\nB\n\nC"`.
pub fn join_blocks<I, S>(parts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut joined = String::new();
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            joined.push_str(BLOCK_SEPARATOR);
        }
        joined.push_str(part.as_ref());
    }
    joined
}

/// Wraps the tree text in its delimiters.
#[must_use]
pub fn tree_header(tree: &str) -> String {
    format!("{TREE_HEADER_START}\n{tree}\n{TREE_HEADER_END}")
}

/// Builds every text artifact of one run, in write order.
///
/// The three profile-agnostic artifacts come first, followed by the
/// profile's own exports.
#[must_use]
pub fn consolidate(
    tree: &str,
    blocks: &[CategorizedBlock],
    profile: &dyn AnalysisProfile,
) -> Vec<ConsolidatedFile> {
    let header = tree_header(tree);
    let full = join_blocks(
        std::iter::once(header.as_str()).chain(blocks.iter().map(|b| b.block.as_str())),
    );
    let sans_css = join_blocks(
        blocks
            .iter()
            .filter(|b| !b.block.is_stylesheet())
            .map(|b| b.block.as_str()),
    );

    let mut files = vec![
        ConsolidatedFile::new(TREE_ARTIFACT, tree.to_string()),
        ConsolidatedFile::new(FULL_CODE_ARTIFACT, full),
        ConsolidatedFile::new(FULL_CODE_SANS_CSS_ARTIFACT, sans_css),
    ];
    files.extend(profile.generate_consolidated_files(blocks));
    files
}
