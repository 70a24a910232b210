//! Serde data file structs for catalog definitions.
//!
//! These structs define the on-disk format for categories and perks. They
//! are deserialized from RON, JSON, or TOML data files and then resolved
//! into engine types by the catalog builder.

use serde::Deserialize;

// ===========================================================================
// Categories
// ===========================================================================

/// A category definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub legendary: String,
    pub perks: Vec<PerkData>,
    /// Rendered edges as `(from, to)` pairs. Derived from `requires` when
    /// omitted.
    #[serde(default)]
    pub connections: Vec<(String, String)>,
}

// ===========================================================================
// Perks
// ===========================================================================

/// A perk definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct PerkData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub mastery: String,
    #[serde(default)]
    pub position: PositionData,
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default)]
    pub effort: Option<EffortData>,
}

/// Layout position of a perk node.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PositionData {
    pub x: f32,
    pub y: f32,
}

/// Estimated effort to master a perk.
#[derive(Debug, Clone, Deserialize)]
pub struct EffortData {
    pub hours: String,
    pub outcomes: String,
}

// ===========================================================================
// Settings
// ===========================================================================

/// Optional engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsData {
    #[serde(default = "default_perks_per_level")]
    pub perks_per_level: u32,
}

fn default_perks_per_level() -> u32 {
    5
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            perks_per_level: default_perks_per_level(),
        }
    }
}

// ===========================================================================
// TOML wrappers (TOML does not support top-level arrays)
// ===========================================================================

/// Wrapper for a list of categories in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlCategories {
    pub categories: Vec<CategoryData>,
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_data_from_ron() {
        let ron = r#"
            (
                id: "relic",
                name: "RELIC",
                subtitle: "The Inner Evolution",
                icon: "✨",
                legendary: "Harmonized mind-body integration.",
                perks: [
                    (id: "r1", name: "Consciousness", position: (x: 100.0, y: 50.0)),
                    (
                        id: "r2",
                        name: "Memory",
                        requires: ["r1"],
                        effort: Some((hours: "50–70", outcomes: "Recall large sets.")),
                    ),
                ],
                connections: [("r1", "r2")],
            )
        "#;
        let category: CategoryData = ron::from_str(ron).unwrap();
        assert_eq!(category.id, "relic");
        assert_eq!(category.perks.len(), 2);
        assert_eq!(category.perks[1].requires, vec!["r1"]);
        assert_eq!(category.perks[1].effort.as_ref().unwrap().hours, "50–70");
        assert_eq!(category.perks[0].position.x, 100.0);
        assert_eq!(
            category.connections,
            vec![("r1".to_string(), "r2".to_string())]
        );
    }

    #[test]
    fn category_defaults_from_json() {
        let json = r#"{"id": "cool", "name": "COOL", "perks": [{"id": "c1", "name": "Style"}]}"#;
        let category: CategoryData = serde_json::from_str(json).unwrap();
        assert!(category.connections.is_empty());
        assert!(category.subtitle.is_empty());
        assert!(category.perks[0].requires.is_empty());
        assert!(category.perks[0].effort.is_none());
    }

    #[test]
    fn categories_from_toml_wrapper() {
        let toml = r#"
[[categories]]
id = "body"
name = "BODY"

[[categories.perks]]
id = "b1"
name = "Strength & Power"

[[categories.perks]]
id = "b3"
name = "Agility"
requires = ["b1"]
"#;
        let wrapper: TomlCategories = toml::from_str(toml).unwrap();
        assert_eq!(wrapper.categories.len(), 1);
        assert_eq!(wrapper.categories[0].perks[1].requires, vec!["b1"]);
    }

    #[test]
    fn settings_default_to_five_perks_per_level() {
        let settings: SettingsData = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.perks_per_level, 5);
        assert_eq!(SettingsData::default().perks_per_level, 5);
    }
}
