use super::{AnalysisProfile, Categories, ConsolidatedFile, is_critical_config, join_where};
use crate::entry::CategorizedBlock;

const APPLICATION: &str = "APPLICATION";

const IGNORED_PATH_COMPONENTS: &[&str] = &[
    ".git",
    ".github",
    ".ruff_cache",
    "__pycache__",
    "venv",
    "instance",
    "attached_assets",
    "node_modules",
];

const SPECIFIC_FILES_TO_IGNORE: &[&str] =
    &["poetry.lock", "database.db", "lint.md", "replit.md", ".gitignore"];

const MIGRATIONS_BOILERPLATE: &[&str] = &["README", "alembic.ini", "script.py.mako"];

const PACKAGE_MANAGER_FILES: &[&str] = &["package.json", "package-lock.json"];

const KEPT_READMES: &[&str] = &["backend/README.md", "frontend/README.md"];

const IGNORED_SUFFIXES: &[&str] = &[".png", ".ico", ".svg"];

/// Profile for the scenario builder project.
///
/// Everything that survives filtering belongs to one application-wide label.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScenarioBuilderProfile;

impl AnalysisProfile for ScenarioBuilderProfile {
    fn id(&self) -> &'static str {
        "scenario_builder"
    }

    fn name(&self) -> &'static str {
        "Projet : Scenario Builder"
    }

    fn version(&self) -> &'static str {
        "1.2"
    }

    fn is_file_ignored(&self, path: &str, components: &[&str]) -> bool {
        let filename = components.last().copied().unwrap_or(path);
        let filename_lower = filename.to_lowercase();

        if is_critical_config(&filename_lower) {
            return false;
        }

        if components.iter().any(|c| IGNORED_PATH_COMPONENTS.contains(c)) {
            return true;
        }
        if SPECIFIC_FILES_TO_IGNORE.contains(&filename_lower.as_str()) {
            return true;
        }

        // Root package manager files only matter for the frontend.
        if PACKAGE_MANAGER_FILES.contains(&filename_lower.as_str())
            && !components.contains(&"frontend")
        {
            return true;
        }

        // Alembic scaffolding; env.py and versions/ stay.
        if path.contains("backend/migrations")
            && !path.contains("versions")
            && MIGRATIONS_BOILERPLATE.contains(&filename)
        {
            return true;
        }

        if IGNORED_SUFFIXES.iter().any(|s| filename_lower.ends_with(s)) {
            return true;
        }

        filename_lower == "readme.md" && !KEPT_READMES.contains(&path)
    }

    fn categorize_file(&self, _path: &str) -> Categories {
        Categories::from([APPLICATION])
    }

    fn generate_consolidated_files(&self, blocks: &[CategorizedBlock]) -> Vec<ConsolidatedFile> {
        vec![ConsolidatedFile::new(
            "__code_scenario_builder.txt",
            join_where(blocks, |b| b.has(APPLICATION)),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::test_support::{labeled, output, split};

    fn ignored(path: &str) -> bool {
        ScenarioBuilderProfile.is_file_ignored(path, &split(path))
    }

    #[test]
    fn test_ignored_components_and_files() {
        assert!(ignored(".github/workflows/ci.yml"));
        assert!(ignored("backend/instance/config.py"));
        assert!(ignored("docs/lint.md"));
        assert!(ignored(".gitignore"));
        assert!(!ignored("backend/app/models.py"));
    }

    #[test]
    fn test_package_files_outside_frontend() {
        assert!(ignored("package-lock.json"));
        assert!(!ignored("frontend/package-lock.json"));
    }

    #[test]
    fn test_critical_config_wins_over_package_rule() {
        // package.json is critical, so the frontend-only rule never fires for it.
        assert!(!ignored("package.json"));
    }

    #[test]
    fn test_migrations_boilerplate() {
        assert!(ignored("backend/migrations/alembic.ini"));
        assert!(ignored("backend/migrations/README"));
        assert!(!ignored("backend/migrations/env.py"));
        assert!(!ignored("backend/migrations/versions/001_init.py"));
    }

    #[test]
    fn test_readme_rules() {
        assert!(ignored("docs/readme.md"));
        assert!(!ignored("backend/README.md"));
        assert!(!ignored("frontend/README.md"));
    }

    #[test]
    fn test_single_category_and_output() {
        let p = ScenarioBuilderProfile;
        assert_eq!(p.categorize_file("anything/at/all.py"), Categories::from([APPLICATION]));

        let blocks = vec![labeled("a.py", &[APPLICATION]), labeled("b.py", &[APPLICATION])];
        let files = p.generate_consolidated_files(&blocks);
        assert_eq!(files.len(), 1);
        let content = output(&files, "__code_scenario_builder.txt");
        assert_eq!(
            content,
            format!("{}\n\n{}", blocks[0].block.as_str(), blocks[1].block.as_str())
        );
    }
}
