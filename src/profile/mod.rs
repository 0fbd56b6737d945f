//! Analysis profiles: per-project filtering, labeling and consolidation rules.
//!
//! A profile is a stateless bundle of three decisions:
//! 1. **Ignore**: should a file that passed the global rules still be dropped?
//! 2. **Categorize**: which labels does a kept file carry?
//! 3. **Consolidate**: which named text exports are built from the labeled files?
//!
//! The set of profiles is closed. [`ProfileKind`] enumerates them and
//! [`ProfileRegistry`] maps their identifiers to shared instances.

mod admin_scolaire;
mod fullstack;
mod scenario_builder;

pub use admin_scolaire::AdminScolaireProfile;
pub use fullstack::FullstackProfile;
pub use scenario_builder::ScenarioBuilderProfile;

use crate::consolidate::join_blocks;
use crate::entry::CategorizedBlock;
use crate::error::{Error, Result};
use crate::rules::CRITICAL_CONFIG_BASENAMES;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Labels assigned to one file. Never empty once returned by a profile.
pub type Categories = BTreeSet<&'static str>;

/// One named text export produced by a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedFile {
    /// File name inside the output archive
    pub name: &'static str,
    /// Joined content blocks
    pub content: String,
}

impl ConsolidatedFile {
    /// Creates a consolidated file.
    #[must_use]
    pub const fn new(name: &'static str, content: String) -> Self {
        Self { name, content }
    }
}

/// Contract implemented by every analysis profile.
///
/// All operations are pure: the same inputs always give the same outputs and
/// no instance state changes after construction.
pub trait AnalysisProfile: Send + Sync + fmt::Debug {
    /// Unique identifier used for selection.
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Version of the rule set.
    fn version(&self) -> &'static str;

    /// Decides whether a file that passed the global rules is dropped.
    ///
    /// # Arguments
    ///
    /// * `path` - Normalized path (e.g. `backend/app/models.py`)
    /// * `components` - `path` split on `/`
    fn is_file_ignored(&self, path: &str, components: &[&str]) -> bool;

    /// Assigns one or more labels to a kept file.
    ///
    /// Falls back to the profile's default label, so the set is never empty.
    fn categorize_file(&self, path: &str) -> Categories;

    /// Builds the profile-specific exports from every labeled block,
    /// in a fixed name order.
    fn generate_consolidated_files(&self, blocks: &[CategorizedBlock]) -> Vec<ConsolidatedFile>;

    /// Summary used for listings.
    fn info(&self) -> ProfileInfo {
        ProfileInfo {
            id: self.id(),
            name: self.name(),
            version: self.version(),
        }
    }
}

/// Serializable description of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProfileInfo {
    /// Unique identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Rule set version
    pub version: &'static str,
}

/// Built-in profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// School administration project
    AdminScolaire,
    /// Scenario builder project
    ScenarioBuilder,
    /// Flask backend + React frontend project
    Fullstack,
}

impl ProfileKind {
    /// Returns the ID string for this profile.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::AdminScolaire => "admin_scolaire",
            Self::ScenarioBuilder => "scenario_builder",
            Self::Fullstack => "fullstack",
        }
    }

    /// Returns all built-in profiles.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::AdminScolaire, Self::ScenarioBuilder, Self::Fullstack]
    }

    /// Parse profile kind from string ID.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "admin_scolaire" => Some(Self::AdminScolaire),
            "scenario_builder" => Some(Self::ScenarioBuilder),
            "fullstack" => Some(Self::Fullstack),
            _ => None,
        }
    }

    /// Creates a new instance of this profile.
    #[must_use]
    pub fn create(self) -> Arc<dyn AnalysisProfile> {
        match self {
            Self::AdminScolaire => Arc::new(AdminScolaireProfile),
            Self::ScenarioBuilder => Arc::new(ScenarioBuilderProfile),
            Self::Fullstack => Arc::new(FullstackProfile),
        }
    }
}

static REGISTRY: Lazy<ProfileRegistry> = Lazy::new(ProfileRegistry::builtin);

/// Lookup from profile identifier to a shared profile instance.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<&'static str, Arc<dyn AnalysisProfile>>,
}

impl ProfileRegistry {
    /// Builds a registry holding every [`ProfileKind`].
    #[must_use]
    pub fn builtin() -> Self {
        let profiles = ProfileKind::all()
            .iter()
            .map(|kind| {
                let profile = kind.create();
                (profile.id(), profile)
            })
            .collect();

        Self { profiles }
    }

    /// Process-wide registry, built on first use and never mutated.
    #[must_use]
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    /// Looks up a profile by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn AnalysisProfile>> {
        self.profiles.get(id).cloned()
    }

    /// Looks up a profile, reporting unknown identifiers as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownProfile`] if `id` is not registered.
    pub fn resolve(&self, id: &str) -> Result<Arc<dyn AnalysisProfile>> {
        self.get(id)
            .ok_or_else(|| Error::unknown_profile(id, self.ids().map(str::to_string).collect()))
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.profiles.keys().copied()
    }

    /// Descriptions of every registered profile, sorted by identifier.
    #[must_use]
    pub fn infos(&self) -> Vec<ProfileInfo> {
        self.profiles.values().map(|p| p.info()).collect()
    }

    /// Number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns true if no profile is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Lowercased basename lookup in the critical config table.
pub(crate) fn is_critical_config(basename_lower: &str) -> bool {
    CRITICAL_CONFIG_BASENAMES.contains(basename_lower)
}

pub(crate) fn starts_with_any(path: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix))
}

/// Joins, in encounter order, the blocks accepted by `keep`.
pub(crate) fn join_where(
    blocks: &[CategorizedBlock],
    keep: impl Fn(&CategorizedBlock) -> bool,
) -> String {
    join_blocks(
        blocks
            .iter()
            .filter(|b| keep(b))
            .map(|b| b.block.as_str()),
    )
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::entry::ContentBlock;

    /// Builds a labeled block whose body is its own path.
    pub(crate) fn labeled(path: &str, labels: &[&'static str]) -> CategorizedBlock {
        let basename = path.rsplit('/').next().unwrap_or(path);
        CategorizedBlock {
            block: ContentBlock::new(path, basename, path),
            categories: labels.iter().copied().collect(),
        }
    }

    pub(crate) fn split(path: &str) -> Vec<&str> {
        path.split('/').collect()
    }

    pub(crate) fn output<'a>(files: &'a [ConsolidatedFile], name: &str) -> &'a str {
        files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.content.as_str())
            .unwrap_or_else(|| panic!("missing output {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_kind_roundtrip_ids() {
        for kind in ProfileKind::all() {
            assert_eq!(ProfileKind::from_id(kind.id()), Some(*kind));
            assert_eq!(kind.create().id(), kind.id());
        }
        assert_eq!(ProfileKind::from_id("unknown"), None);
    }

    #[test]
    fn test_registry_contains_all_profiles() {
        let registry = ProfileRegistry::builtin();
        assert_eq!(registry.len(), ProfileKind::all().len());
        assert!(!registry.is_empty());
        assert_eq!(
            registry.ids().collect::<Vec<_>>(),
            vec!["admin_scolaire", "fullstack", "scenario_builder"]
        );
    }

    #[test]
    fn test_registry_get_unknown_is_none() {
        assert!(ProfileRegistry::global().get("does_not_exist").is_none());
        assert!(ProfileRegistry::global().get("scenario_builder").is_some());
    }

    #[test]
    fn test_registry_resolve_unknown_is_error() {
        let err = ProfileRegistry::global().resolve("nope").unwrap_err();
        assert!(err.is_unknown_profile());
        assert!(err.to_string().contains("admin_scolaire"));
    }

    #[test]
    fn test_registry_shares_instances() {
        let registry = ProfileRegistry::global();
        let a = registry.get("fullstack").unwrap();
        let b = registry.get("fullstack").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_profile_infos() {
        let infos = ProfileRegistry::global().infos();
        let admin = infos.iter().find(|i| i.id == "admin_scolaire").unwrap();
        assert_eq!(admin.name, "Projet : Administration Scolaire");
        assert!(!admin.version.is_empty());
    }

    #[test]
    fn test_categorization_is_complete_and_idempotent() {
        let paths = [
            "app.py",
            "administration_scolaire_app/finance/api_sports.py",
            "backend/app/api/users.py",
            "frontend/src/solo-flow/Step.tsx",
            "misc/notes.txt",
        ];
        for kind in ProfileKind::all() {
            let profile = kind.create();
            for path in paths {
                let first = profile.categorize_file(path);
                assert!(!first.is_empty(), "{} left {path} unlabeled", kind.id());
                assert_eq!(first, profile.categorize_file(path));
            }
        }
    }
}
