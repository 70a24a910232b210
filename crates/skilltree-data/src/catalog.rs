//! Catalog resolution: turns parsed category data into validated perk trees.

use skilltree_core::{
    Catalog, CategoryInfo, Connection, Effort, LevelCurve, Perk, PerkId, PerkTree,
    PerkTreeBuilder, PerkTreeError, Position,
};
use std::path::Path;
use tracing::{debug, info};

use crate::loader::{
    CatalogFile, DataLoadError, Format, locate, parse_categories, read_categories, read_settings,
};
use crate::schema::*;

const BUILTIN_CATEGORIES: &str = include_str!("../data/categories.ron");

/// Everything loaded from a data directory.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub catalog: Catalog,
    pub curve: LevelCurve,
}

// ===========================================================================
// Resolution
// ===========================================================================

/// Resolve one category into an immutable tree.
pub fn resolve_category(data: CategoryData) -> Result<PerkTree, PerkTreeError> {
    let mut builder = PerkTreeBuilder::new(CategoryInfo {
        id: data.id.into(),
        name: data.name,
        subtitle: data.subtitle,
        icon: data.icon,
        legendary: data.legendary,
    });

    for perk in data.perks {
        builder.register(resolve_perk(perk))?;
    }
    for (from, to) in data.connections {
        builder.connect(Connection::new(from, to));
    }
    builder.build()
}

fn resolve_perk(data: PerkData) -> Perk {
    Perk {
        id: PerkId(data.id),
        name: data.name,
        reading: data.reading,
        mastery: data.mastery,
        position: Position {
            x: data.position.x,
            y: data.position.y,
        },
        requires: data.requires.into_iter().map(PerkId).collect(),
        effort: data.effort.map(|e| Effort {
            hours: e.hours,
            outcomes: e.outcomes,
        }),
    }
}

/// Resolve every category, preserving order.
pub fn build_catalog(data: Vec<CategoryData>) -> Result<Catalog, PerkTreeError> {
    let trees = data
        .into_iter()
        .map(resolve_category)
        .collect::<Result<Vec<_>, _>>()?;
    Catalog::new(trees)
}

// ===========================================================================
// Loading
// ===========================================================================

/// Load `categories.{ron,json,toml}` (required) and
/// `settings.{ron,json,toml}` (optional) from a directory.
pub fn load_catalog(dir: &Path) -> Result<CatalogConfig, DataLoadError> {
    let path = locate(dir, CatalogFile::Categories)?.ok_or_else(|| DataLoadError::Missing {
        file: CatalogFile::Categories,
        dir: dir.to_path_buf(),
    })?;
    let data = read_categories(&path)?;
    let catalog = build_catalog(data).map_err(|source| DataLoadError::Catalog {
        file: path.clone(),
        source,
    })?;

    let settings = match locate(dir, CatalogFile::Settings)? {
        Some(settings_path) => {
            debug!(file = %settings_path.display(), "loading settings");
            read_settings(&settings_path)?
        }
        None => SettingsData::default(),
    };

    info!(
        file = %path.display(),
        categories = catalog.len(),
        perks = catalog.perk_count(),
        "catalog loaded"
    );

    Ok(CatalogConfig {
        catalog,
        curve: LevelCurve {
            perks_per_level: settings.perks_per_level,
        },
    })
}

/// The six stock categories shipped with the crate.
pub fn load_builtin_catalog() -> Result<Catalog, DataLoadError> {
    let file = Path::new("builtin/categories.ron");
    let data = parse_categories(BUILTIN_CATEGORIES, Format::Ron, file)?;
    build_catalog(data).map_err(|source| DataLoadError::Catalog {
        file: file.to_path_buf(),
        source,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "skilltree_catalog_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    const CATEGORIES_JSON: &str = r#"[
        {
            "id": "cool",
            "name": "COOL",
            "legendary": "Natural influencer.",
            "perks": [
                {"id": "c1", "name": "Style & Fashion"},
                {"id": "c2", "name": "Charisma & Influence"},
                {"id": "c3", "name": "Diplomacy & Negotiation", "requires": ["c1"]}
            ],
            "connections": [["c1", "c3"]]
        }
    ]"#;

    // -----------------------------------------------------------------------
    // Built-in catalog
    // -----------------------------------------------------------------------

    #[test]
    fn builtin_catalog_has_six_categories() {
        let catalog = load_builtin_catalog().unwrap();
        let ids: Vec<&str> = catalog.trees().map(|t| t.id().as_str()).collect();
        assert_eq!(
            ids,
            vec!["technical", "matter", "intelligence", "cool", "body", "relic"]
        );
        assert_eq!(catalog.perk_count(), 42);
    }

    #[test]
    fn builtin_perks_carry_details() {
        let catalog = load_builtin_catalog().unwrap();
        let technical = catalog.get("technical").unwrap();
        assert_eq!(technical.len(), 10);

        let t10 = technical.get("t10").unwrap();
        assert_eq!(t10.requires, vec![PerkId::from("t8"), PerkId::from("t9")]);
        assert!(t10.effort.is_some());

        let body = catalog.get("body").unwrap();
        assert_eq!(body.get("b3").unwrap().requires.len(), 2);
        assert!(!body.info().legendary.is_empty());
    }

    // -----------------------------------------------------------------------
    // Resolution
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_category_rejects_unknown_prerequisite() {
        let data: CategoryData = serde_json::from_str(
            r#"{"id": "x", "name": "X", "perks": [{"id": "x2", "name": "Two", "requires": ["x1"]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            resolve_category(data),
            Err(PerkTreeError::UnknownPrerequisite { .. })
        ));
    }

    #[test]
    fn build_catalog_rejects_duplicate_categories() {
        let one: CategoryData =
            serde_json::from_str(r#"{"id": "x", "name": "X", "perks": []}"#).unwrap();
        let result = build_catalog(vec![one.clone(), one]);
        assert!(matches!(result, Err(PerkTreeError::DuplicateCategory(_))));
    }

    // -----------------------------------------------------------------------
    // Directory loading
    // -----------------------------------------------------------------------

    #[test]
    fn load_catalog_from_json_with_default_settings() {
        let dir = make_test_dir("load_json");
        fs::write(dir.join("categories.json"), CATEGORIES_JSON).unwrap();

        let config = load_catalog(&dir).unwrap();
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.curve, LevelCurve::default());
        assert_eq!(config.catalog.get("cool").unwrap().connections().len(), 1);

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_reads_settings() {
        let dir = make_test_dir("load_settings");
        fs::write(dir.join("categories.json"), CATEGORIES_JSON).unwrap();
        fs::write(dir.join("settings.toml"), "perks_per_level = 3\n").unwrap();

        let config = load_catalog(&dir).unwrap();
        assert_eq!(config.curve.perks_per_level, 3);

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_reports_file_on_invalid_graph() {
        let dir = make_test_dir("load_invalid");
        fs::write(
            dir.join("categories.json"),
            r#"[{"id": "x", "name": "X", "perks": [{"id": "x1", "name": "One"}], "connections": [["x1", "x9"]]}]"#,
        )
        .unwrap();

        let err = load_catalog(&dir).unwrap_err();
        match err {
            DataLoadError::Catalog { file, source } => {
                assert_eq!(file, dir.join("categories.json"));
                assert!(matches!(source, PerkTreeError::UnknownConnectionEndpoint { .. }));
            }
            other => panic!("expected Catalog error, got {other:?}"),
        }

        cleanup(&dir);
    }

    #[test]
    fn load_catalog_requires_categories_file() {
        let dir = make_test_dir("load_missing");
        assert!(matches!(
            load_catalog(&dir),
            Err(DataLoadError::Missing { file: CatalogFile::Categories, .. })
        ));
        cleanup(&dir);
    }
}
