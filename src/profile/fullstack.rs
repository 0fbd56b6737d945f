use super::{
    AnalysisProfile, Categories, ConsolidatedFile, is_critical_config, join_where,
    starts_with_any,
};
use crate::entry::CategorizedBlock;
use crate::rules::{CRITICAL_CONFIG_BASENAMES, extension};

const BACKEND_CORE: &str = "BACKEND_CORE";
const BACKEND_API: &str = "BACKEND_API";
const FRONTEND_CODE: &str = "FRONTEND_CODE";
const FRONTEND_API: &str = "FRONTEND_API";
const CONFIG_DOC: &str = "CONFIG_DOC";
const OTHER: &str = "OTHER";
const SOLO_FLOW: &str = "SOLO_FLOW";

/// Paths kept even when a later rule would drop them.
const ALWAYS_KEPT_PATHS: &[&str] = &[
    "backend/app/__init__.py",
    "backend/migrations/env.py",
    "frontend/src/main.tsx",
    "frontend/index.html",
];

const IGNORED_PATH_COMPONENTS: &[&str] = &[
    ".git",
    ".github",
    ".idea",
    ".vscode",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "node_modules",
    "venv",
    ".venv",
    "dist",
    "build",
    "coverage",
    "instance",
];

const IGNORED_DIRECTORIES: &[&str] = &[
    "attached_assets/",
    "docs/archive/",
    "frontend/public/",
    "backend/tests/fixtures/",
];

const MIGRATIONS_DIR: &str = "backend/migrations/";
const MIGRATION_VERSIONS_DIR: &str = "versions";

const BOILERPLATE_FILES: &[&str] = &[
    "frontend/src/vite-env.d.ts",
    "frontend/eslint.config.js",
    "backend/setup.cfg",
];

const IGNORED_SUFFIXES: &[&str] = &[".map", ".log", ".min.js", ".min.css", ".snap", ".lock"];

const BACKEND_API_PREFIXES: &[&str] = &["backend/app/api/", "backend/app/routes/"];
const SHARED_CONTRACT_PREFIXES: &[&str] = &["backend/app/schemas/"];
const FRONTEND_API_PREFIX: &str = "frontend/src/api/";

const CONFIG_DOC_EXTENSIONS: &[&str] = &[".md", ".toml", ".ini", ".cfg", ".yml", ".yaml"];

const SOLO_FLOW_MARKERS: &[&str] = &["solo_flow", "soloflow"];

/// Profile for a Flask backend paired with a React frontend.
///
/// Besides the domain labels, files belonging to the solo flow feature carry
/// an extra `SOLO_FLOW` label computed by an independent rule set.
#[derive(Debug, Default, Clone, Copy)]
pub struct FullstackProfile;

impl FullstackProfile {
    fn domain_labels(path: &str) -> Categories {
        let mut categories = Categories::new();
        let basename = path.rsplit('/').next().unwrap_or(path);
        let basename_lower = basename.to_lowercase();
        let ext = extension(&basename_lower);
        let is_api = starts_with_any(path, BACKEND_API_PREFIXES);

        if path.starts_with("backend/") && ext == ".py" && !is_api {
            categories.insert(BACKEND_CORE);
        }
        if is_api || starts_with_any(path, SHARED_CONTRACT_PREFIXES) {
            categories.insert(BACKEND_API);
        }
        if path.starts_with("frontend/src/") {
            categories.insert(FRONTEND_CODE);
        }
        if path.starts_with(FRONTEND_API_PREFIX) {
            categories.insert(FRONTEND_API);
        }
        if CONFIG_DOC_EXTENSIONS.contains(&ext)
            || is_critical_config(&basename_lower)
            || CRITICAL_CONFIG_BASENAMES.contains(basename)
        {
            categories.insert(CONFIG_DOC);
        }

        categories
    }

    fn is_solo_flow(path: &str) -> bool {
        let folded = path.to_lowercase().replace('-', "_");
        SOLO_FLOW_MARKERS.iter().any(|marker| folded.contains(marker))
    }
}

impl AnalysisProfile for FullstackProfile {
    fn id(&self) -> &'static str {
        "fullstack"
    }

    fn name(&self) -> &'static str {
        "Projet : Application Full-Stack (Flask + React)"
    }

    fn version(&self) -> &'static str {
        "1.0"
    }

    fn is_file_ignored(&self, path: &str, components: &[&str]) -> bool {
        let filename = components.last().copied().unwrap_or(path);
        let filename_lower = filename.to_lowercase();

        if CRITICAL_CONFIG_BASENAMES.contains(filename)
            || is_critical_config(&filename_lower)
            || ALWAYS_KEPT_PATHS.contains(&path)
        {
            return false;
        }

        if components.iter().any(|c| IGNORED_PATH_COMPONENTS.contains(c)) {
            return true;
        }
        if starts_with_any(path, IGNORED_DIRECTORIES) {
            return true;
        }
        // Migrations are generated scaffolding except the versioned scripts.
        if path.starts_with(MIGRATIONS_DIR) && !components.contains(&MIGRATION_VERSIONS_DIR) {
            return true;
        }
        if BOILERPLATE_FILES.contains(&path) {
            return true;
        }

        IGNORED_SUFFIXES.iter().any(|s| filename_lower.ends_with(s))
    }

    fn categorize_file(&self, path: &str) -> Categories {
        let mut categories = Self::domain_labels(path);

        if categories.is_empty() {
            categories.insert(OTHER);
        }
        if Self::is_solo_flow(path) {
            categories.insert(SOLO_FLOW);
        }
        categories
    }

    fn generate_consolidated_files(&self, blocks: &[CategorizedBlock]) -> Vec<ConsolidatedFile> {
        let mut files = vec![
            ConsolidatedFile::new(
                "__code_backend.txt",
                join_where(blocks, |b| b.has_any(&[BACKEND_CORE, BACKEND_API, CONFIG_DOC])),
            ),
            ConsolidatedFile::new(
                "__code_frontend.txt",
                join_where(blocks, |b| b.has_any(&[FRONTEND_CODE, CONFIG_DOC])),
            ),
            ConsolidatedFile::new(
                "__code_api_contract.txt",
                join_where(blocks, |b| b.has_any(&[BACKEND_API, FRONTEND_API])),
            ),
            ConsolidatedFile::new("__code_autres.txt", join_where(blocks, |b| b.has(OTHER))),
        ];

        if blocks.iter().any(|b| b.has(SOLO_FLOW)) {
            files.push(ConsolidatedFile::new(
                "__code_solo_flow.txt",
                join_where(blocks, |b| b.has(SOLO_FLOW)),
            ));
        }

        files
    }
}
