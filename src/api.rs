//! # Quick Start API
//!
//! High-level, fluent API for common use cases.
//!
//! ## Examples
//!
//! ```no_run
//! use codetotext::api::{Flatten, ProfileKind};
//!
//! // Textified export of a full-stack project
//! Flatten::archive("./projet.zip")
//!     .profile(ProfileKind::Fullstack)
//!     .run()?;
//!
//! // Keep original extensions, custom output directory, extra exclusions
//! Flatten::archive("./projet.zip")
//!     .profile_id("scenario_builder")
//!     .keep_original_extension()
//!     .output("./exports")
//!     .exclude(["**/fixtures"])
//!     .run()?;
//! # Ok::<(), codetotext::Error>(())
//! ```

pub use crate::profile::ProfileKind;

use crate::{
    Config, FileFilterConfig, Pipeline, PipelineStats, ProcessOptions, ProcessedArchive, Result,
    pipeline::process_archive, profile::ProfileRegistry,
};
use std::path::{Path, PathBuf};

/// How kept files are named in the output archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extensions {
    /// Append `.txt` unless the extension is whitelisted (default)
    #[default]
    Textify,
    /// Keep every original extension
    KeepOriginal,
}

impl Extensions {
    const fn keep_original(self) -> bool {
        matches!(self, Self::KeepOriginal)
    }
}

/// Entry point of the fluent API.
///
/// # Examples
///
/// ```no_run
/// use codetotext::api::*;
///
/// let stats = Flatten::archive("./projet.zip")
///     .profile(ProfileKind::AdminScolaire)
///     .dry_run()
///     .run()?;
/// println!("{} content blocks", stats.walk.content_blocks);
/// # Ok::<(), codetotext::Error>(())
/// ```
#[derive(Debug, Clone)]
#[must_use = "call .run() to execute the conversion"]
pub struct Flatten {
    input: PathBuf,
    output: PathBuf,
    profile_id: String,
    extensions: Extensions,
    exclude_dirs: Vec<String>,
    exclude_files: Vec<String>,
    timestamp: bool,
    dry_run: bool,
}

impl Flatten {
    /// Starts a conversion of the given zip archive.
    ///
    /// Defaults: `fullstack` profile, textified names, `./out`, timestamped.
    pub fn archive(path: impl Into<PathBuf>) -> Self {
        Self {
            input: path.into(),
            output: PathBuf::from("./out"),
            profile_id: ProfileKind::Fullstack.id().to_string(),
            extensions: Extensions::default(),
            exclude_dirs: Vec::new(),
            exclude_files: Vec::new(),
            timestamp: true,
            dry_run: false,
        }
    }

    /// Sets the output directory.
    ///
    /// Default: `./out`
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Selects a built-in profile.
    pub fn profile(mut self, kind: ProfileKind) -> Self {
        self.profile_id = kind.id().to_string();
        self
    }

    /// Selects a profile by identifier. Unknown identifiers are reported by
    /// [`Flatten::run`].
    pub fn profile_id(mut self, id: impl Into<String>) -> Self {
        self.profile_id = id.into();
        self
    }

    /// Sets the naming mode.
    pub fn extensions(mut self, mode: Extensions) -> Self {
        self.extensions = mode;
        self
    }

    /// Shortcut for `.extensions(Extensions::KeepOriginal)`.
    pub fn keep_original_extension(self) -> Self {
        self.extensions(Extensions::KeepOriginal)
    }

    /// Adds directory globs to exclude (e.g. `**/fixtures`).
    pub fn exclude<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds file globs to exclude (e.g. `**/*.sql`).
    pub fn exclude_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_files.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Writes the output archive without a timestamp in its name.
    pub fn no_timestamp(mut self) -> Self {
        self.timestamp = false;
        self
    }

    /// Converts in memory only.
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the conversion and returns statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The profile is unknown
    /// - The input is missing or not a zip archive
    /// - No processable files remain after filtering
    /// - I/O errors occur while writing
    pub fn run(self) -> Result<PipelineStats> {
        let config = self.build_config()?;
        Pipeline::new(config)?.run()
    }

    fn build_config(self) -> Result<Config> {
        Config::builder()
            .input_path(self.input)
            .output_dir(self.output)
            .profile(self.profile_id)
            .keep_original_extension(self.extensions.keep_original())
            .file_filter_config(
                FileFilterConfig::new()
                    .exclude_files(self.exclude_files)
                    .exclude_directories(self.exclude_dirs),
            )
            .timestamped_output(self.timestamp)
            .dry_run(self.dry_run)
            .build()
    }
}

/// Converts an archive held in memory, as an upload handler would.
///
/// # Errors
///
/// Returns [`crate::Error::UnknownProfile`] before reading anything if
/// `profile_id` is not registered, then any error of
/// [`crate::process_archive`].
///
/// # Examples
///
/// ```no_run
/// use codetotext::api::flatten_bytes;
///
/// let upload = std::fs::read("projet.zip")?;
/// let processed = flatten_bytes(&upload, "projet.zip", "fullstack", false)?;
/// std::fs::write(&processed.suggested_name, &processed.bytes)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn flatten_bytes(
    archive: &[u8],
    uploaded_name: &str,
    profile_id: &str,
    keep_original_extension: bool,
) -> Result<ProcessedArchive> {
    let profile = ProfileRegistry::global().resolve(profile_id)?;
    let options = ProcessOptions {
        keep_original_extension,
        ..ProcessOptions::default()
    };
    process_archive(archive, uploaded_name, profile, &options)
}

/// Converts an archive on disk with the given profile and default settings.
///
/// # Examples
///
/// ```no_run
/// use codetotext::api::*;
///
/// let stats = flatten("./projet.zip", ProfileKind::ScenarioBuilder)?;
/// # Ok::<(), codetotext::Error>(())
/// ```
pub fn flatten(path: impl AsRef<Path>, profile: ProfileKind) -> Result<PipelineStats> {
    Flatten::archive(path.as_ref()).profile(profile).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{zip_fixture, zip_names};
    use assert_fs::prelude::*;

    #[test]
    fn test_flatten_builder_has_sensible_defaults() {
        let flatten = Flatten::archive("a.zip");
        assert_eq!(flatten.input, PathBuf::from("a.zip"));
        assert_eq!(flatten.output, PathBuf::from("./out"));
        assert_eq!(flatten.profile_id, "fullstack");
        assert_eq!(flatten.extensions, Extensions::Textify);
        assert!(flatten.timestamp);
        assert!(!flatten.dry_run);
    }

    #[test]
    fn test_flatten_builder_is_fluent() {
        let flatten = Flatten::archive("a.zip")
            .output("./exports")
            .profile(ProfileKind::AdminScolaire)
            .keep_original_extension()
            .no_timestamp()
            .dry_run();

        assert_eq!(flatten.output, PathBuf::from("./exports"));
        assert_eq!(flatten.profile_id, "admin_scolaire");
        assert_eq!(flatten.extensions, Extensions::KeepOriginal);
        assert!(!flatten.timestamp);
        assert!(flatten.dry_run);
    }

    #[test]
    fn test_exclude_patterns_are_additive() {
        let flatten = Flatten::archive("a.zip")
            .exclude(["**/fixtures"])
            .exclude(["**/seeds", "**/mocks"])
            .exclude_files(["**/*.sql"]);

        assert_eq!(flatten.exclude_dirs.len(), 3);
        assert_eq!(flatten.exclude_files, vec!["**/*.sql".to_string()]);
    }

    #[test]
    fn test_unknown_profile_id() {
        let err = Flatten::archive("a.zip").profile_id("nope").run().unwrap_err();
        assert!(err.is_unknown_profile());

        let err = flatten_bytes(b"irrelevant", "a.zip", "nope", false).unwrap_err();
        assert!(err.is_unknown_profile());
    }

    #[test]
    fn test_flatten_bytes() {
        let zip = zip_fixture(&[("proj/app.py", b"x = 1"), ("proj/run.sh", b"echo")]);
        let processed = flatten_bytes(&zip, "proj.zip", "fullstack", false).unwrap();

        assert_eq!(processed.suggested_name, "proj_flat_textified.zip");
        let names = zip_names(&processed.bytes);
        assert!(names.contains(&"run.sh.txt".to_string()));
    }

    #[test]
    fn test_run_dry() {
        let temp = assert_fs::TempDir::new().unwrap();
        let input = temp.child("proj.zip");
        input
            .write_binary(&zip_fixture(&[("proj/app.py", b"x = 1")]))
            .unwrap();

        let stats = Flatten::archive(input.path())
            .output(temp.path().join("out"))
            .dry_run()
            .run()
            .unwrap();

        assert_eq!(stats.walk.content_blocks, 1);
        assert!(stats.output_path.is_none());
    }
}
