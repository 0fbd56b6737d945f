use super::{
    AnalysisProfile, Categories, ConsolidatedFile, is_critical_config, join_where,
    starts_with_any,
};
use crate::entry::CategorizedBlock;
use crate::rules::SYNTHESIS_DOC;

const TACHES: &str = "TACHES";
const FIN_SPORTIF: &str = "FIN_SPORTIF";
const FIN_GLOBAL: &str = "FIN_GLOBAL";
const COMMUN: &str = "COMMUN";

const IGNORED_DIRECTORIES: &[&str] = &[
    "mon_application/static/assets/sports_budget/",
    "administration_scolaire_app/static/assets/sports_budget/",
    "tests/",
    "stubs/",
    "react_apps/sports_budget/src/components/ui/",
    "react_apps/sports_budget/src/hooks/",
    "react_apps/sports_budget/src/lib/",
    "attached_assets/",
    "docs/",
];

const IGNORED_PATH_COMPONENTS: &[&str] = &[
    ".git",
    ".ruff_cache",
    "__pycache__",
    "node_modules",
    ".vscode",
    "dist",
    "build",
    "venv",
];

const BOILERPLATE_FILES: &[&str] = &[
    "migrations/README",
    "migrations/alembic.ini",
    "migrations/script.py.mako",
    "administration_scolaire_app/py.typed",
    "react_apps/sports_budget/index.html",
    "eslint.config.js",
    "react_apps/sports_budget/tailwind.temp.js",
    "administration_scolaire_app/taches/routes_backup.py",
    "administration_scolaire_app/taches/routes_merged.py",
    "administration_scolaire_app/taches/routes_with_duplicate.py",
    "administration_scolaire_app/taches/admin.py",
];

const SPECIFIC_FILES_TO_IGNORE: &[&str] = &[
    "uv.lock",
    "package-lock.json",
    "dev.db",
    "dump.sql",
    "db_dump.json",
    "budgets_a_importer.json",
    "import_prod_data_final.sh",
    "generate_schema.py",
];

const IGNORED_SUFFIXES: &[&str] = &[".png", ".ico", ".svg"];

const TACHES_PREFIXES: &[&str] = &[
    "administration_scolaire_app/taches/",
    "administration_scolaire_app/templates/page_",
    "administration_scolaire_app/templates/detail_taches.html",
    "administration_scolaire_app/templates/preparation_horaire.html",
    "administration_scolaire_app/static/js/page_",
    "administration_scolaire_app/static/js/detail_taches.js",
    "administration_scolaire_app/static/js/preparation_horaire.js",
];

const FIN_SPORTIF_PREFIXES: &[&str] = &[
    "react_apps/sports_budget/",
    "shared/",
    "administration_scolaire_app/finance/api_sports.py",
    "administration_scolaire_app/finance/services_sports_budget.py",
    "administration_scolaire_app/templates/sports_budget_loader.html",
    "administration_scolaire_app/templates/_react_loader_base.html",
];

const FIN_GLOBAL_PREFIXES: &[&str] = &[
    "administration_scolaire_app/finance/",
    "administration_scolaire_app/journal_entry_service.py",
    "administration_scolaire_app/templates/finance/",
    "administration_scolaire_app/static/js/finance",
    "administration_scolaire_app/static/js/finance_report.js",
];

/// Profile for the school administration project.
///
/// Splits the code base into a tasks domain and two finance domains. Labels
/// overlap: the sports finance API also lives under the global finance tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct AdminScolaireProfile;

impl AnalysisProfile for AdminScolaireProfile {
    fn id(&self) -> &'static str {
        "admin_scolaire"
    }

    fn name(&self) -> &'static str {
        "Projet : Administration Scolaire"
    }

    fn version(&self) -> &'static str {
        "1.2"
    }

    fn is_file_ignored(&self, path: &str, components: &[&str]) -> bool {
        let filename_lower = components.last().copied().unwrap_or(path).to_lowercase();

        if is_critical_config(&filename_lower) {
            return false;
        }

        if starts_with_any(path, IGNORED_DIRECTORIES) {
            return true;
        }
        if components.iter().any(|c| IGNORED_PATH_COMPONENTS.contains(c)) {
            return true;
        }
        if BOILERPLATE_FILES.contains(&path) {
            return true;
        }
        if SPECIFIC_FILES_TO_IGNORE.contains(&filename_lower.as_str()) {
            return true;
        }
        if IGNORED_SUFFIXES.iter().any(|s| filename_lower.ends_with(s)) {
            return true;
        }

        filename_lower.ends_with(".md") && filename_lower != SYNTHESIS_DOC
    }

    fn categorize_file(&self, path: &str) -> Categories {
        let mut categories = Categories::new();

        if starts_with_any(path, TACHES_PREFIXES) {
            categories.insert(TACHES);
        }
        if starts_with_any(path, FIN_SPORTIF_PREFIXES) {
            categories.insert(FIN_SPORTIF);
        }
        if starts_with_any(path, FIN_GLOBAL_PREFIXES) {
            categories.insert(FIN_GLOBAL);
        }

        if categories.is_empty() {
            categories.insert(COMMUN);
        }
        categories
    }

    fn generate_consolidated_files(&self, blocks: &[CategorizedBlock]) -> Vec<ConsolidatedFile> {
        vec![
            ConsolidatedFile::new(
                "__code_taches_tot.txt",
                join_where(blocks, |b| !b.has_any(&[FIN_GLOBAL, FIN_SPORTIF])),
            ),
            ConsolidatedFile::new(
                "__code_fin_global.txt",
                join_where(blocks, |b| !b.has_any(&[TACHES, FIN_SPORTIF])),
            ),
            ConsolidatedFile::new(
                "__code_fin_sportif.txt",
                join_where(blocks, |b| !b.has_any(&[TACHES, FIN_GLOBAL])),
            ),
            ConsolidatedFile::new(
                "__code_financier_tot.txt",
                join_where(blocks, |b| !b.has(TACHES)),
            ),
        ]
    }
}
