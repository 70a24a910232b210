//! The immutable set of all category trees.

use crate::id::CategoryId;
use crate::progress::{CategorySummary, Progress};
use crate::sets::{LockSet, UnlockSet};
use crate::tree::{PerkTree, PerkTreeError};
use std::collections::HashMap;

/// Every category tree, in display order. Built once at startup and shared
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    trees: Vec<PerkTree>,
    index: HashMap<CategoryId, usize>,
}

impl Catalog {
    /// Assemble a catalog. Category ids must be unique.
    pub fn new(trees: Vec<PerkTree>) -> Result<Self, PerkTreeError> {
        let mut index = HashMap::with_capacity(trees.len());
        for (i, tree) in trees.iter().enumerate() {
            if index.insert(tree.id().clone(), i).is_some() {
                return Err(PerkTreeError::DuplicateCategory(tree.id().clone()));
            }
        }
        Ok(Self { trees, index })
    }

    pub fn get(&self, category: &str) -> Option<&PerkTree> {
        self.index.get(category).map(|&i| &self.trees[i])
    }

    /// Trees in display order.
    pub fn trees(&self) -> impl Iterator<Item = &PerkTree> {
        self.trees.iter()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Total perks across all categories.
    pub fn perk_count(&self) -> usize {
        self.trees.iter().map(PerkTree::len).sum()
    }

    /// Progress with an empty unlock set for every category.
    pub fn empty_progress(&self) -> Progress {
        let mut progress = Progress::new();
        for tree in &self.trees {
            progress.set(tree.id().clone(), UnlockSet::new());
        }
        progress
    }

    /// Rebuild progress from untrusted unlock sets: unknown categories are
    /// dropped, every known category is sanitized against its tree, and
    /// missing categories start empty.
    pub fn sanitize_progress(&self, raw: &Progress) -> Progress {
        let mut progress = Progress::new();
        for tree in &self.trees {
            progress.set(tree.id().clone(), tree.sanitize(raw.unlocked(tree.id().as_str())));
        }
        progress
    }

    /// Summary of one category. `None` for unknown categories.
    pub fn summary(
        &self,
        category: &str,
        progress: &Progress,
        locked: &LockSet,
    ) -> Option<CategorySummary> {
        let tree = self.get(category)?;
        Some(CategorySummary::of(tree, progress.unlocked(category), locked))
    }
}
