use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for the codetotext library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// The input could not be opened as a zip archive.
    #[error("Le fichier fourni n'est pas un ZIP valide: {message}")]
    InvalidArchive {
        /// Reason reported by the archive reader
        message: String,
    },

    /// Every entry was filtered out, nothing left to consolidate.
    #[error("Le fichier ZIP '{archive}' ne contenait aucun fichier traitable après filtrage.")]
    NoProcessableFiles {
        /// Name of the archive that was processed
        archive: String,
    },

    /// The requested analysis profile is not registered.
    #[error("Profil d'analyse inconnu : {id} (disponibles : {})", .available.join(", "))]
    UnknownProfile {
        /// Requested profile identifier
        id: String,
        /// Identifiers known to the registry
        available: Vec<String>,
    },

    /// Failure while assembling the output archive.
    #[error("Failed to write output archive: {message}")]
    Archive {
        /// Error message
        message: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },

    /// Invalid exclusion pattern.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The invalid pattern
        pattern: String,
        /// Reason why it's invalid
        reason: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid archive error.
    #[must_use]
    pub fn invalid_archive(message: impl ToString) -> Self {
        Self::InvalidArchive {
            message: message.to_string(),
        }
    }

    /// Creates a "nothing left after filtering" error.
    #[must_use]
    pub fn no_processable_files(archive: impl Into<String>) -> Self {
        Self::NoProcessableFiles {
            archive: archive.into(),
        }
    }

    /// Creates an unknown profile error.
    #[must_use]
    pub fn unknown_profile(id: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnknownProfile {
            id: id.into(),
            available,
        }
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this is an IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if the input was not a readable archive.
    #[must_use]
    pub const fn is_invalid_archive(&self) -> bool {
        matches!(self, Self::InvalidArchive { .. })
    }

    /// Returns true if filtering left no file to consolidate.
    #[must_use]
    pub const fn is_no_processable_files(&self) -> bool {
        matches!(self, Self::NoProcessableFiles { .. })
    }

    /// Returns true if the selected profile does not exist.
    #[must_use]
    pub const fn is_unknown_profile(&self) -> bool {
        matches!(self, Self::UnknownProfile { .. })
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Archive {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
