//! # codetotext
//!
//! Turns a zipped code repository into an archive an LLM can read: every kept
//! file flattened to the archive root, a directory tree, a full-code dump and
//! the thematic exports of an analysis profile.
//!
//! ## Features
//!
//! - Global rule base for lock files, binaries and architecture documents
//! - Pluggable analysis profiles (`admin_scolaire`, `scenario_builder`, `fullstack`)
//! - Flattened, collision-aware output names with optional `.txt` textification
//! - Caller-level glob exclusions
//! - Atomic output writes
//!
//! ## Quick Start
//!
//! ```no_run
//! use codetotext::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .input_path("./projet.zip")
//!     .output_dir("./exports")
//!     .profile("fullstack")
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! Archives received in memory go through [`process_archive`] directly.
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Tree**: Renders the directory tree of the archive
//! 2. **Walker**: Filters entries through the [`EntryGate`] and builds content blocks
//! 3. **Consolidate**: Builds the aggregates and the profile exports
//! 4. **Writer**: Assembles and persists the output archive

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod consolidate;
mod entry;
mod error;
mod filter;
mod language;
mod naming;
mod pipeline;
mod rules;
mod tree;
mod walker;
mod writer;

#[cfg(test)]
mod test_support;

pub mod api;
pub mod profile;

pub use config::{Config, ConfigBuilder};
pub use consolidate::{
    BLOCK_SEPARATOR, FULL_CODE_ARTIFACT, FULL_CODE_SANS_CSS_ARTIFACT, TREE_ARTIFACT, consolidate,
    join_blocks, tree_header,
};
pub use entry::{ArchiveEntry, CategorizedBlock, ContentBlock, EntryPath};
pub use error::{Error, Result};
pub use filter::{Decision, DropReason, EntryGate, FileFilterConfig};
pub use language::language_for;
pub use naming::{
    FLATTEN_DELIMITER, KEPT_EXTENSIONS, TEXT_EXTENSION, output_archive_name, output_file_name,
    with_timestamp,
};
pub use pipeline::{Pipeline, PipelineStats, ProcessOptions, ProcessedArchive, process_archive};
pub use profile::{
    AnalysisProfile, Categories, ConsolidatedFile, ProfileInfo, ProfileKind, ProfileRegistry,
};
pub use rules::{
    ARCHITECTURE_DOC_PREFIXES, CRITICAL_CONFIG_BASENAMES, CRITICAL_IGNORED_BASENAMES,
    CRITICAL_IGNORED_EXTENSIONS, is_always_ignored, is_always_included,
};
pub use tree::generate_tree;
pub use walker::{RawFile, WalkOutput, WalkStats, Walker, detect_root_prefix};
pub use writer::{OutputArchive, write_file_atomic};

/// Runs the complete conversion pipeline with the given configuration.
///
/// This is the main entry point for the library.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The input is not a readable zip archive
/// - No processable files are found
/// - The output archive cannot be written
///
/// # Examples
///
/// ```no_run
/// use codetotext::{Config, run};
///
/// # fn main() -> anyhow::Result<()> {
/// let config = Config::builder()
///     .input_path("./projet.zip")
///     .profile("admin_scolaire")
///     .build()?;
///
/// let stats = run(config)?;
/// stats.print_summary();
/// # Ok(())
/// # }
/// ```
pub fn run(config: Config) -> Result<PipelineStats> {
    Pipeline::new(config)?.run()
}
