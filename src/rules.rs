//! Global, profile-independent inclusion and exclusion rules.
//!
//! These tables are evaluated before any profile logic. A profile can
//! neither resurrect a globally ignored file nor drop an architecture document.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Configuration files that profiles must never exclude.
///
/// Entries are stored verbatim. Profiles decide whether they compare the
/// exact basename, its lowercased form, or both.
pub static CRITICAL_CONFIG_BASENAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "pyproject.toml",
        "requirements.txt",
        "dockerfile",
        "docker-compose.yml",
        ".replit",
        "replit.md",
        "package.json",
        "vite.config.ts",
        "tailwind.config.js",
        "tsconfig.json",
        "tsconfig.node.json",
        "postcss.config.js",
        ".env.example",
        "README.md",
        "STRUCTURE.md",
        "AMELIORATIONS_COMPLETEES.md",
        "CONFIGURATION_COMPLETE.md",
        "DDA_mermaid_1762371637525.md",
        "app.py",
        "run.py",
        "analysis_profiles.py",
    ]
    .into_iter()
    .collect()
});

/// Binary, media, archive, compiled and office extensions (lowercase, with dot).
pub static CRITICAL_IGNORED_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // databases
        ".rdb", ".db", ".sqlite", ".sqlite3", ".sqlitedb", ".db3",
        // images & media
        ".png", ".jpg", ".jpeg", ".gif", ".ico", ".svg", ".webp", ".bmp", ".tiff", ".mp3",
        ".mp4", ".wav", ".avi", ".mov",
        // fonts
        ".eot", ".ttf", ".woff", ".woff2", ".otf",
        // archives & compiled artifacts
        ".zip", ".tar", ".gz", ".rar", ".7z", ".pyc", ".pyo", ".pyd", ".so", ".dll", ".exe",
        ".bin", ".class", ".jar",
        // office documents
        ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    ]
    .into_iter()
    .collect()
});

/// Lock files and dumps matched by exact basename.
pub static CRITICAL_IGNORED_BASENAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "poetry.lock",
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "uv.lock",
        "Gemfile.lock",
        "composer.lock",
        "mix.lock",
        "go.sum",
        "Cargo.lock",
        "dump.rdb",
    ]
    .into_iter()
    .collect()
});

/// Uppercased basename prefixes identifying architecture documents.
pub const ARCHITECTURE_DOC_PREFIXES: &[&str] = &["MEMO_TECH_V", "DDA_V"];

/// Development summary, matched on the lowercased basename. It keeps its own
/// name in the output archive and stays out of every aggregate.
pub(crate) const SYNTHESIS_DOC: &str = "synthèse_développement.md";

/// The one hidden file that is not dropped.
pub(crate) const REPLIT_DOTFILE: &str = ".replit";

/// Returns the extension of a basename, dot included.
///
/// Leading dots do not start an extension, so `.replit` has none while
/// `archive.tar.gz` yields `.gz`.
#[must_use]
pub(crate) fn extension(basename: &str) -> &str {
    let stem_start = basename.len() - basename.trim_start_matches('.').len();
    basename[stem_start..]
        .rfind('.')
        .map_or("", |i| &basename[stem_start + i..])
}

fn basename<'a>(path: &'a str, components: &[&'a str]) -> &'a str {
    components.last().copied().unwrap_or(path)
}

/// Returns true for architecture documents (`DDA_V*`, `MEMO_TECH_V*`).
///
/// Such files are always written to the output archive but never take part
/// in any consolidated text.
#[must_use]
pub fn is_always_included(path: &str, components: &[&str]) -> bool {
    let upper = basename(path, components).to_uppercase();
    ARCHITECTURE_DOC_PREFIXES
        .iter()
        .any(|prefix| upper.starts_with(prefix))
}

/// Returns true for lock files and binary formats, whatever the profile.
#[must_use]
pub fn is_always_ignored(path: &str, components: &[&str]) -> bool {
    let name = basename(path, components);

    if CRITICAL_IGNORED_BASENAMES.contains(name) {
        return true;
    }

    CRITICAL_IGNORED_EXTENSIONS.contains(extension(name).to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(path: &str) -> Vec<&str> {
        path.split('/').collect()
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("app.py"), ".py");
        assert_eq!(extension("archive.tar.gz"), ".gz");
        assert_eq!(extension(".replit"), "");
        assert_eq!(extension(".env.example"), ".example");
        assert_eq!(extension("Dockerfile"), "");
        assert_eq!(extension("IMAGE.PNG"), ".PNG");
    }

    #[test]
    fn test_always_ignored_lockfiles_and_binaries() {
        for path in ["poetry.lock", "frontend/yarn.lock", "image.png", "assets/Logo.PNG", "db/app.sqlite3"] {
            assert!(is_always_ignored(path, &split(path)), "{path} should be ignored");
        }
    }

    #[test]
    fn test_always_ignored_keeps_code() {
        for path in ["app.py", "src/main.tsx", "README.md", ".replit", "cargo.lock.md"] {
            assert!(!is_always_ignored(path, &split(path)), "{path} should be kept");
        }
    }

    #[test]
    fn test_lockfile_match_is_exact() {
        assert!(is_always_ignored("Cargo.lock", &["Cargo.lock"]));
        assert!(!is_always_ignored("cargo.lock", &["cargo.lock"]));
    }

    #[test]
    fn test_always_included_architecture_docs() {
        assert!(is_always_included("DDA_V2.md", &["DDA_V2.md"]));
        assert!(is_always_included("docs/dda_v3_final.md", &split("docs/dda_v3_final.md")));
        assert!(is_always_included("Memo_Tech_V1.txt", &["Memo_Tech_V1.txt"]));
        assert!(!is_always_included("DDA_mermaid.md", &["DDA_mermaid.md"]));
        assert!(!is_always_included("notes/DDA_V2/readme.md", &split("notes/DDA_V2/readme.md")));
    }
}
