//! Entry filtering: the global rule base, then the active profile, then the
//! walker-generic rules and finally caller-supplied glob exclusions.

use crate::entry::EntryPath;
use crate::error::{Error, Result};
use crate::naming::TEXT_EXTENSION;
use crate::profile::AnalysisProfile;
use crate::rules::{REPLIT_DOTFILE, SYNTHESIS_DOC, is_always_ignored, is_always_included};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Caller-level exclusions expressed as glob patterns.
///
/// Patterns are matched against the normalized path of every entry. They
/// only ever remove files: nothing dropped by the built-in rules comes back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileFilterConfig {
    exclude_files: Vec<String>,
    exclude_directories: Vec<String>,
}

impl FileFilterConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file patterns to exclude.
    #[must_use]
    pub fn exclude_files(mut self, patterns: Vec<String>) -> Self {
        self.exclude_files = patterns;
        self
    }

    /// Sets the directory patterns to exclude. A file is excluded when any
    /// of its ancestors matches.
    #[must_use]
    pub fn exclude_directories(mut self, patterns: Vec<String>) -> Self {
        self.exclude_directories = patterns;
        self
    }

    /// Returns true if no pattern is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exclude_files.is_empty() && self.exclude_directories.is_empty()
    }

    /// Checks that every pattern compiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for the first invalid glob.
    pub fn validate(&self) -> Result<()> {
        FileFilter::new(self).map(|_| ())
    }
}

/// Compiled form of a [`FileFilterConfig`].
#[derive(Debug, Clone)]
pub(crate) struct FileFilter {
    exclude_files: GlobSet,
    exclude_directories: GlobSet,
}

impl FileFilter {
    pub(crate) fn new(config: &FileFilterConfig) -> Result<Self> {
        Ok(Self {
            exclude_files: Self::build_globset(&config.exclude_files)?,
            exclude_directories: Self::build_globset(&config.exclude_directories)?,
        })
    }

    fn build_globset(patterns: &[String]) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();

        for pattern in patterns {
            let glob =
                Glob::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
            builder.add(glob);
        }

        builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build glob set: {e}")))
    }

    pub(crate) fn is_excluded(&self, normalized_path: &str) -> bool {
        let path = Path::new(normalized_path);

        if self.exclude_files.is_match(path) || self.exclude_directories.is_match(path) {
            return true;
        }

        path.ancestors()
            .skip(1)
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .any(|ancestor| self.exclude_directories.is_match(ancestor))
    }
}

/// Why an entry was left out of the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Lock file or binary extension from the global rule base
    AlwaysIgnored,
    /// Rejected by the active profile
    Profile,
    /// Hidden file
    Hidden,
    /// Text file that looks like a previous textified export
    PreviousOutput,
    /// Matched a caller-supplied glob
    UserExcluded,
}

impl DropReason {
    /// Stable identifier used in logs and statistics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysIgnored => "always_ignored",
            Self::Profile => "profile",
            Self::Hidden => "hidden",
            Self::PreviousOutput => "previous_output",
            Self::UserExcluded => "user_excluded",
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of the gate for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Written to the output archive and rendered into the aggregates.
    Include,
    /// Written to the output archive only (architecture documents and the
    /// development summary).
    RawOnly,
    /// Not written anywhere.
    Drop(DropReason),
}

impl Decision {
    /// Returns true unless the entry is dropped.
    #[must_use]
    pub const fn is_kept(self) -> bool {
        !matches!(self, Self::Drop(_))
    }
}

/// Ordered decision chain applied to every file entry.
///
/// 1. architecture documents are kept (raw only)
/// 2. lock files and binaries are dropped
/// 3. the profile may drop the file
/// 4. hidden files other than `.replit` are dropped
/// 5. in textified mode, `.txt` files are dropped
/// 6. caller globs may drop the file
#[derive(Debug, Clone)]
pub struct EntryGate {
    profile: Arc<dyn AnalysisProfile>,
    keep_original_extension: bool,
    user_filter: FileFilter,
}

impl EntryGate {
    /// Builds a gate for one run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if a caller glob does not compile.
    pub fn new(
        profile: Arc<dyn AnalysisProfile>,
        keep_original_extension: bool,
        exclusions: &FileFilterConfig,
    ) -> Result<Self> {
        Ok(Self {
            profile,
            keep_original_extension,
            user_filter: FileFilter::new(exclusions)?,
        })
    }

    /// The profile consulted at stage 3.
    #[must_use]
    pub fn profile(&self) -> &dyn AnalysisProfile {
        self.profile.as_ref()
    }

    /// Whether kept files retain their extension. Also disables the
    /// previous-output guard.
    #[must_use]
    pub const fn keep_original_extension(&self) -> bool {
        self.keep_original_extension
    }

    /// Decides the fate of one file entry.
    #[must_use]
    pub fn decide(&self, path: &EntryPath) -> Decision {
        let normalized = path.normalized_path.as_str();
        let components = path.components();

        if is_always_included(normalized, &components) {
            return Decision::RawOnly;
        }
        if is_always_ignored(normalized, &components) {
            return Decision::Drop(DropReason::AlwaysIgnored);
        }
        if self.profile.is_file_ignored(normalized, &components) {
            return Decision::Drop(DropReason::Profile);
        }

        let basename = path.basename();
        let basename_lower = path.basename_lower();

        if basename.starts_with('.') && basename != REPLIT_DOTFILE {
            return Decision::Drop(DropReason::Hidden);
        }
        if !self.keep_original_extension && basename_lower.ends_with(TEXT_EXTENSION) {
            return Decision::Drop(DropReason::PreviousOutput);
        }
        if self.user_filter.is_excluded(normalized) {
            return Decision::Drop(DropReason::UserExcluded);
        }

        if basename_lower == SYNTHESIS_DOC {
            Decision::RawOnly
        } else {
            Decision::Include
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ProfileRegistry;

    fn gate(profile: &str, keep: bool, exclusions: &FileFilterConfig) -> EntryGate {
        let profile = ProfileRegistry::global().resolve(profile).unwrap();
        EntryGate::new(profile, keep, exclusions).unwrap()
    }

    fn decide(gate: &EntryGate, raw: &str) -> Decision {
        gate.decide(&EntryPath::new(raw, None))
    }

    #[test]
    fn test_architecture_docs_short_circuit() {
        let gate = gate("admin_scolaire", false, &FileFilterConfig::new());
        // The profile drops every .md and docs/ entirely, the global gate wins.
        assert_eq!(decide(&gate, "DDA_V2.md"), Decision::RawOnly);
        assert_eq!(decide(&gate, "docs/memo_tech_v1.md"), Decision::RawOnly);
    }

    #[test]
    fn test_always_ignored_beats_profile() {
        for profile in ["admin_scolaire", "scenario_builder", "fullstack"] {
            let gate = gate(profile, true, &FileFilterConfig::new());
            assert_eq!(
                decide(&gate, "poetry.lock"),
                Decision::Drop(DropReason::AlwaysIgnored)
            );
            assert_eq!(
                decide(&gate, "image.png"),
                Decision::Drop(DropReason::AlwaysIgnored)
            );
        }
    }

    #[test]
    fn test_profile_stage() {
        let gate = gate("scenario_builder", false, &FileFilterConfig::new());
        assert_eq!(
            decide(&gate, "node_modules/react/index.js"),
            Decision::Drop(DropReason::Profile)
        );
        assert_eq!(decide(&gate, "backend/app.py"), Decision::Include);
    }

    #[test]
    fn test_hidden_files() {
        let gate = gate("fullstack", false, &FileFilterConfig::new());
        assert_eq!(decide(&gate, ".env"), Decision::Drop(DropReason::Hidden));
        assert_eq!(decide(&gate, "backend/.flaskenv"), Decision::Drop(DropReason::Hidden));
        assert_eq!(decide(&gate, ".replit"), Decision::Include);
    }

    #[test]
    fn test_previous_output_guard_only_when_textified() {
        let textified = gate("fullstack", false, &FileFilterConfig::new());
        let original = gate("fullstack", true, &FileFilterConfig::new());

        assert_eq!(
            decide(&textified, "notes/todo.TXT"),
            Decision::Drop(DropReason::PreviousOutput)
        );
        assert_eq!(decide(&original, "notes/todo.TXT"), Decision::Include);
        assert!(!textified.keep_original_extension());
        assert!(original.keep_original_extension());
    }

    #[test]
    fn test_synthesis_doc_is_raw_only() {
        let gate = gate("admin_scolaire", false, &FileFilterConfig::new());
        assert_eq!(decide(&gate, "synthèse_développement.md"), Decision::RawOnly);
    }

    #[test]
    fn test_user_exclusions() {
        let exclusions = FileFilterConfig::new()
            .exclude_files(vec!["**/*.sql".to_string()])
            .exclude_directories(vec!["scripts".to_string()]);
        let gate = gate("fullstack", true, &exclusions);

        assert_eq!(
            decide(&gate, "backend/schema.sql"),
            Decision::Drop(DropReason::UserExcluded)
        );
        assert_eq!(
            decide(&gate, "scripts/deploy/run.sh"),
            Decision::Drop(DropReason::UserExcluded)
        );
        assert_eq!(decide(&gate, "backend/scripts.py"), Decision::Include);
    }

    #[test]
    fn test_user_exclusions_cannot_resurrect() {
        let exclusions = FileFilterConfig::new().exclude_files(vec!["nothing".to_string()]);
        let gate = gate("fullstack", true, &exclusions);
        assert!(!decide(&gate, "yarn.lock").is_kept());
    }

    #[test]
    fn test_invalid_pattern() {
        let config = FileFilterConfig::new().exclude_files(vec!["a[".to_string()]);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidPattern { .. }));
        assert!(FileFilterConfig::new().is_empty());
    }
}
