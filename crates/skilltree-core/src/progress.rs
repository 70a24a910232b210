//! Process-wide progress and the level projections derived from it.

use crate::id::CategoryId;
use crate::sets::{LockSet, UnlockSet};
use crate::tree::PerkTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static NO_UNLOCKS: UnlockSet = UnlockSet::new();

// ---------------------------------------------------------------------------
// Level curve
// ---------------------------------------------------------------------------

/// How unlocked perks translate into character levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCurve {
    /// Perks needed per level. Values below 1 are treated as 1.
    pub perks_per_level: u32,
}

impl LevelCurve {
    pub const DEFAULT_PERKS_PER_LEVEL: u32 = 5;

    /// `floor(total / perks_per_level) + 1`. Never below 1.
    pub fn level_for(&self, total_unlocked: usize) -> u32 {
        let per_level = self.perks_per_level.max(1) as usize;
        let level = total_unlocked / per_level + 1;
        u32::try_from(level).unwrap_or(u32::MAX)
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            perks_per_level: Self::DEFAULT_PERKS_PER_LEVEL,
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Unlock sets for every category. Owned by the caller and passed to the
/// engine explicitly; there is no global progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress {
    categories: BTreeMap<CategoryId, UnlockSet>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock set of a category. Categories without an entry read as empty.
    pub fn unlocked(&self, category: &str) -> &UnlockSet {
        self.categories.get(category).unwrap_or(&NO_UNLOCKS)
    }

    /// Replace a category's unlock set.
    pub fn set(&mut self, category: CategoryId, unlocked: UnlockSet) {
        self.categories.insert(category, unlocked);
    }

    /// Categories with an entry, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryId, &UnlockSet)> {
        self.categories.iter()
    }

    /// Total perks unlocked across all categories.
    pub fn total_unlocked(&self) -> usize {
        self.categories.values().map(UnlockSet::len).sum()
    }

    /// Character level with the default curve (a level every five perks).
    pub fn character_level(&self) -> u32 {
        self.character_level_with(LevelCurve::default())
    }

    pub fn character_level_with(&self, curve: LevelCurve) -> u32 {
        curve.level_for(self.total_unlocked())
    }

    /// A category's level is simply its unlocked perk count.
    pub fn category_level(&self, category: &str) -> u32 {
        u32::try_from(self.unlocked(category).len()).unwrap_or(u32::MAX)
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Overview numbers for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary {
    pub unlocked: usize,
    pub total: usize,
    pub pinned: usize,
    pub fully_unlocked: bool,
}

impl CategorySummary {
    pub fn of(tree: &PerkTree, unlocked: &UnlockSet, locked: &LockSet) -> Self {
        Self {
            unlocked: unlocked.len(),
            total: tree.len(),
            pinned: locked.iter().filter(|id| unlocked.contains(id.as_str())).count(),
            fully_unlocked: tree.is_fully_unlocked(unlocked),
        }
    }
}
