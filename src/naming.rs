//! Names of the files written to the output archive.

use crate::entry::EntryPath;
use crate::rules::{REPLIT_DOTFILE, SYNTHESIS_DOC, extension};

/// Extensions left untouched even in textified mode (lowercase).
pub const KEPT_EXTENSIONS: &[&str] = &[
    ".tsx", ".ts", ".jsx", ".js", ".css", ".scss", ".html", ".json", ".yml", ".yaml", ".toml",
    ".py", ".md",
];

/// Basenames left untouched even in textified mode (lowercase).
const KEPT_BASENAMES: &[&str] = &["package.json"];

/// Replaces `/` when a nested path is flattened into a file name.
pub const FLATTEN_DELIMITER: &str = ".";

/// Extension appended in textified mode.
pub const TEXT_EXTENSION: &str = ".txt";

const REPLIT_OUTPUT: &str = "replit.txt";

const ORIGINAL_EXTENSION_SUFFIX: &str = "_flat_orig_ext.zip";
const TEXTIFIED_SUFFIX: &str = "_flat_textified.zip";

/// Computes the name under which a kept file is written.
///
/// Files whose basename occurs more than once in the archive are renamed
/// after their whole normalized path (`pkg/a/x.py` becomes `pkg.a.x.py`).
/// In textified mode, [`TEXT_EXTENSION`] is appended unless the extension
/// is in [`KEPT_EXTENSIONS`].
#[must_use]
pub fn output_file_name(
    path: &EntryPath,
    basename_is_unique: bool,
    keep_original_extension: bool,
) -> String {
    let basename_lower = path.basename_lower();

    if basename_lower == REPLIT_DOTFILE {
        return REPLIT_OUTPUT.to_string();
    }

    let base = if basename_is_unique {
        path.basename().to_string()
    } else {
        path.normalized_path.replace('/', FLATTEN_DELIMITER)
    };

    if keep_original_extension
        || basename_lower == SYNTHESIS_DOC
        || KEPT_EXTENSIONS.contains(&extension(&basename_lower))
        || KEPT_BASENAMES.contains(&basename_lower.as_str())
    {
        base
    } else {
        base + TEXT_EXTENSION
    }
}

/// Suggested name of the output archive, derived from the uploaded one.
///
/// ```
/// use codetotext::output_archive_name;
///
/// assert_eq!(output_archive_name("projet.zip", false), "projet_flat_textified.zip");
/// assert_eq!(output_archive_name("projet.zip", true), "projet_flat_orig_ext.zip");
/// ```
#[must_use]
pub fn output_archive_name(uploaded_name: &str, keep_original_extension: bool) -> String {
    let ext = extension(uploaded_name);
    let stem = &uploaded_name[..uploaded_name.len() - ext.len()];
    let suffix = if keep_original_extension {
        ORIGINAL_EXTENSION_SUFFIX
    } else {
        TEXTIFIED_SUFFIX
    };
    format!("{stem}{suffix}")
}

/// Inserts `_{timestamp}` before the `.zip` extension of an archive name.
#[must_use]
pub fn with_timestamp(archive_name: &str, timestamp: &str) -> String {
    match archive_name.strip_suffix(".zip") {
        Some(stem) => format!("{stem}_{timestamp}.zip"),
        None => format!("{archive_name}_{timestamp}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str, unique: bool, keep: bool) -> String {
        output_file_name(&EntryPath::new(raw, None), unique, keep)
    }

    #[test]
    fn test_unique_basename_is_kept() {
        assert_eq!(name("backend/app/models.py", true, false), "models.py");
        assert_eq!(name("frontend/src/App.tsx", true, false), "App.tsx");
    }

    #[test]
    fn test_colliding_basename_is_flattened() {
        let a = name("pkg/a/x.py", false, false);
        let b = name("pkg/b/x.py", false, false);
        assert_eq!(a, "pkg.a.x.py");
        assert_eq!(b, "pkg.b.x.py");
        assert_ne!(a, b);
    }

    #[test]
    fn test_textified_extension() {
        assert_eq!(name("Dockerfile", true, false), "Dockerfile.txt");
        assert_eq!(name("scripts/run.sh", true, false), "run.sh.txt");
        assert_eq!(name("docs/README.MD", true, false), "README.MD");
        assert_eq!(name("package.json", true, false), "package.json");
        assert_eq!(name("a/config.ini", false, false), "a.config.ini.txt");
    }

    #[test]
    fn test_keep_original_extension() {
        assert_eq!(name("Dockerfile", true, true), "Dockerfile");
        assert_eq!(name("scripts/run.sh", false, true), "scripts.run.sh");
    }

    #[test]
    fn test_special_names() {
        assert_eq!(name(".replit", true, false), "replit.txt");
        assert_eq!(name(".replit", true, true), "replit.txt");
        assert_eq!(name("Synthèse_Développement.md", true, false), "Synthèse_Développement.md");
        assert_eq!(
            name("docs/synthèse_développement.md", false, false),
            "docs.synthèse_développement.md"
        );
    }

    #[test]
    fn test_output_archive_name() {
        assert_eq!(output_archive_name("app.zip", false), "app_flat_textified.zip");
        assert_eq!(output_archive_name("app.v2.zip", true), "app.v2_flat_orig_ext.zip");
        assert_eq!(output_archive_name("noext", true), "noext_flat_orig_ext.zip");
    }

    #[test]
    fn test_with_timestamp() {
        assert_eq!(
            with_timestamp("app_flat_textified.zip", "25-01-31_14h05"),
            "app_flat_textified_25-01-31_14h05.zip"
        );
    }
}
