use crate::error::{Error, Result};
use crate::filter::FileFilterConfig;
use crate::profile::{AnalysisProfile, ProfileRegistry};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_OUTPUT_DIR: &str = "out";
const ARCHIVE_EXTENSION: &str = "zip";

/// Configuration for one conversion run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Zip archive to convert
    pub input_path: PathBuf,

    /// Directory receiving the output archive
    pub output_dir: PathBuf,

    /// Identifier of the analysis profile
    pub profile_id: String,

    /// Keep every original extension instead of appending `.txt`
    pub keep_original_extension: bool,

    /// Caller-level glob exclusions
    pub file_filter_config: FileFilterConfig,

    /// Process in memory without writing the output archive
    pub dry_run: bool,

    /// Insert a local timestamp in the output archive name
    pub timestamped_output: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use codetotext::Config;
    ///
    /// let config = Config::builder()
    ///     .input_path("./projet.zip")
    ///     .profile("fullstack")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// The profile is checked first, so an unknown identifier is reported
    /// even when the input is missing too.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The profile identifier is empty or unknown
    /// - The input path doesn't exist, is not a file or is not a `.zip`
    /// - An exclusion glob doesn't compile
    pub fn validate(&self) -> Result<()> {
        if self.profile_id.trim().is_empty() {
            return Err(Error::config("A profile identifier is required"));
        }
        self.profile()?;

        if !self.input_path.exists() {
            return Err(Error::config(format!(
                "Input archive does not exist: {}",
                self.input_path.display()
            )));
        }

        if !self.input_path.is_file() {
            return Err(Error::config(format!(
                "Input path is not a file: {}",
                self.input_path.display()
            )));
        }

        let is_zip = self
            .input_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
        if !is_zip {
            return Err(Error::config(format!(
                "Input must be a .zip archive: {}",
                self.input_path.display()
            )));
        }

        self.file_filter_config.validate()
    }

    /// Resolves the configured profile from the global registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProfile`] if the identifier is not registered.
    pub fn profile(&self) -> Result<Arc<dyn AnalysisProfile>> {
        ProfileRegistry::global().resolve(&self.profile_id)
    }

    /// File name of the input archive, as shown to the user.
    #[must_use]
    pub fn input_name(&self) -> String {
        self.input_path
            .file_name()
            .map_or_else(
                || self.input_path.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            )
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    input_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    profile_id: Option<String>,
    keep_original_extension: bool,
    file_filter_config: Option<FileFilterConfig>,
    dry_run: bool,
    timestamped_output: Option<bool>,
}

impl ConfigBuilder {
    /// Sets the input zip archive.
    #[must_use]
    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Selects the analysis profile by identifier.
    #[must_use]
    pub fn profile(mut self, id: impl Into<String>) -> Self {
        self.profile_id = Some(id.into());
        self
    }

    /// Keeps original extensions instead of textifying file names.
    #[must_use]
    pub fn keep_original_extension(mut self, enabled: bool) -> Self {
        self.keep_original_extension = enabled;
        self
    }

    /// Sets the caller-level glob exclusions.
    #[must_use]
    pub fn file_filter_config(mut self, config: FileFilterConfig) -> Self {
        self.file_filter_config = Some(config);
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Enables or disables the timestamp in the output archive name.
    #[must_use]
    pub fn timestamped_output(mut self, enabled: bool) -> Self {
        self.timestamped_output = Some(enabled);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            input_path: self.input_path.unwrap_or_default(),
            output_dir: self
                .output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            profile_id: self.profile_id.unwrap_or_default(),
            keep_original_extension: self.keep_original_extension,
            file_filter_config: self.file_filter_config.unwrap_or_default(),
            dry_run: self.dry_run,
            timestamped_output: self.timestamped_output.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn archive(temp: &assert_fs::TempDir, name: &str) -> PathBuf {
        let child = temp.child(name);
        child.write_binary(b"PK").unwrap();
        child.path().to_path_buf()
    }

    #[test]
    fn test_default_config() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config::builder()
            .input_path(archive(&temp, "projet.zip"))
            .profile("fullstack")
            .build()
            .unwrap();

        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert!(!config.keep_original_extension);
        assert!(config.timestamped_output);
        assert!(!config.dry_run);
        assert_eq!(config.input_name(), "projet.zip");
        assert_eq!(config.profile().unwrap().id(), "fullstack");
    }

    #[test]
    fn test_unknown_profile_is_reported_first() {
        let err = Config::builder()
            .input_path("/nonexistent/archive.zip")
            .profile("does_not_exist")
            .build()
            .unwrap_err();

        assert!(err.is_unknown_profile());
    }

    #[test]
    fn test_missing_profile() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .input_path(archive(&temp, "a.zip"))
            .build()
            .unwrap_err();

        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_input_path() {
        let result = Config::builder()
            .input_path("/nonexistent/path/that/should/not/exist.zip")
            .profile("fullstack")
            .build();

        assert!(result.unwrap_err().is_config());
    }

    #[test]
    fn test_input_must_be_zip() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .input_path(archive(&temp, "projet.tar"))
            .profile("fullstack")
            .build()
            .unwrap_err();
        assert!(err.is_config());

        let upper = Config::builder()
            .input_path(archive(&temp, "PROJET.ZIP"))
            .profile("fullstack")
            .build();
        assert!(upper.is_ok());
    }

    #[test]
    fn test_input_must_be_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let dir = temp.child("folder.zip");
        dir.create_dir_all().unwrap();

        let err = Config::builder()
            .input_path(dir.path())
            .profile("fullstack")
            .build()
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_glob() {
        let temp = assert_fs::TempDir::new().unwrap();
        let err = Config::builder()
            .input_path(archive(&temp, "a.zip"))
            .profile("fullstack")
            .file_filter_config(FileFilterConfig::new().exclude_directories(vec!["[".into()]))
            .build()
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPattern { .. }));
    }
}
