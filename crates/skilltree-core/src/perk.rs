//! Static perk and category definitions.
//!
//! These are the immutable building blocks of a catalog. They are produced
//! once at startup (usually by the data loader) and never mutated afterwards.

use crate::id::{CategoryId, PerkId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Perk
// ---------------------------------------------------------------------------

/// Layout position of a perk node. Presentation only; the engine never
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Estimated effort to master a perk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effort {
    /// Study hours as a display range, e.g. `"50–80"`.
    pub hours: String,
    /// What the user can do once the perk is mastered.
    pub outcomes: String,
}

/// A single unlockable node in a category's skill tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perk {
    /// Unique within the owning category.
    pub id: PerkId,

    /// Human-readable name.
    pub name: String,

    /// Suggested study material.
    pub reading: String,

    /// What mastery of this perk looks like.
    pub mastery: String,

    pub position: Position,

    /// Perks that must be unlocked before this one becomes available.
    /// Order is preserved from the definition.
    #[serde(default)]
    pub requires: Vec<PerkId>,

    #[serde(default)]
    pub effort: Option<Effort>,
}

impl Perk {
    /// Create a perk with empty descriptive fields. Mostly useful for tests
    /// and programmatic trees.
    pub fn new(id: impl Into<PerkId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            reading: String::new(),
            mastery: String::new(),
            position: Position::default(),
            requires: Vec::new(),
            effort: None,
        }
    }

    /// Builder-style helper that sets the prerequisite list.
    pub fn requiring<I, P>(mut self, requires: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PerkId>,
    {
        self.requires = requires.into_iter().map(Into::into).collect();
        self
    }

    /// Whether this perk has no prerequisites.
    pub fn is_root(&self) -> bool {
        self.requires.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A rendered edge between two perks of the same category. Must mirror a
/// `requires` relationship: `to` requires `from`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    pub from: PerkId,
    pub to: PerkId,
}

impl Connection {
    pub fn new(from: impl Into<PerkId>, to: impl Into<PerkId>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Display metadata for a category. The perks themselves live in the
/// category's [`PerkTree`](crate::tree::PerkTree).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: CategoryId,
    pub name: String,
    pub subtitle: String,
    pub icon: String,
    /// Reward text shown once every perk of the category is unlocked.
    pub legendary: String,
}

impl CategoryInfo {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subtitle: String::new(),
            icon: String::new(),
            legendary: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requiring_sets_prerequisites_in_order() {
        let perk = Perk::new("t6", "Loop Master").requiring(["t3", "t4"]);
        assert_eq!(perk.requires, vec![PerkId::from("t3"), PerkId::from("t4")]);
        assert!(!perk.is_root());
        assert!(Perk::new("t1", "Fabricator's Eye").is_root());
    }

    #[test]
    fn perk_deserializes_without_optional_fields() {
        let json = r#"{
            "id": "b1",
            "name": "Strength & Power",
            "reading": "Starting Strength",
            "mastery": "Lift heavy",
            "position": { "x": 200.0, "y": 100.0 }
        }"#;
        let perk: Perk = serde_json::from_str(json).unwrap();
        assert_eq!(perk.id.as_str(), "b1");
        assert!(perk.requires.is_empty());
        assert!(perk.effort.is_none());
        assert_eq!(perk.position, Position { x: 200.0, y: 100.0 });
    }
}
