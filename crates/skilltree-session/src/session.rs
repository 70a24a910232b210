//! The owner of live progress.
//!
//! A [`Session`] holds the catalog, the current [`Progress`], one
//! [`LockSet`] per category and a [`ProgressStore`]. Every transition goes
//! through the pure engine in `skilltree-core`; the session installs the
//! result, writes the full snapshot to the store whenever progress changed,
//! and buffers [`PerkEvent`]s for the presentation layer.
//!
//! Store failures are logged and otherwise ignored: the in-memory state
//! stays authoritative for the rest of the session. Lock sets are not
//! persisted; every session starts with nothing pinned.

use skilltree_core::{
    Catalog, CategoryId, CategorySummary, LevelCurve, LockSet, PerkEvent, PerkState, Progress,
    Rejection, Toggle,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::codec::{decode_progress, encode_progress};
use crate::store::{ProgressStore, StoreError};

static NO_LOCKS: LockSet = LockSet::new();

/// Live progress bound to a store.
#[derive(Debug)]
pub struct Session<S: ProgressStore> {
    catalog: Catalog,
    curve: LevelCurve,
    progress: Progress,
    locks: HashMap<CategoryId, LockSet>,
    store: S,
    /// Events emitted since last drain.
    events: Vec<PerkEvent>,
}

impl<S: ProgressStore> Session<S> {
    /// Open a session, restoring whatever the store holds. A missing,
    /// unreadable or malformed blob yields empty progress.
    pub fn open(catalog: Catalog, curve: LevelCurve, store: S) -> Self {
        let progress = match store.load() {
            Ok(Some(blob)) => decode_progress(&blob, &catalog),
            Ok(None) => {
                debug!("no saved progress, starting fresh");
                catalog.empty_progress()
            }
            Err(e) => {
                warn!(error = %e, "failed to read saved progress, starting fresh");
                catalog.empty_progress()
            }
        };

        info!(
            categories = catalog.len(),
            unlocked = progress.total_unlocked(),
            "session opened"
        );

        Self {
            catalog,
            curve,
            progress,
            locks: HashMap::new(),
            store,
            events: Vec::new(),
        }
    }

    // -- Accessors --

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pinned perks of a category. Empty for unknown categories.
    pub fn locks(&self, category: &str) -> &LockSet {
        self.locks.get(category).unwrap_or(&NO_LOCKS)
    }

    // -- Projections --

    pub fn character_level(&self) -> u32 {
        self.progress.character_level_with(self.curve)
    }

    pub fn category_level(&self, category: &str) -> u32 {
        self.progress.category_level(category)
    }

    pub fn summary(&self, category: &str) -> Option<CategorySummary> {
        self.catalog
            .summary(category, &self.progress, self.locks(category))
    }

    pub fn is_available(&self, category: &str, perk: &str) -> bool {
        self.catalog
            .get(category)
            .is_some_and(|tree| tree.is_available(perk, self.progress.unlocked(category)))
    }

    /// One-hop check, for a "this will also remove..." confirmation.
    pub fn can_unselect(&self, category: &str, perk: &str) -> bool {
        self.catalog
            .get(category)
            .is_none_or(|tree| tree.can_unselect(perk, self.progress.unlocked(category)))
    }

    pub fn perk_state(&self, category: &str, perk: &str) -> Option<PerkState> {
        self.catalog.get(category)?.perk_state(
            perk,
            self.progress.unlocked(category),
            self.locks(category),
        )
    }

    // -- Transitions --

    /// Toggle a perk and persist the result. Returns the engine's outcome.
    pub fn toggle_perk(&mut self, category: &str, perk: &str) -> Toggle {
        let Some(tree) = self.catalog.get(category) else {
            return Toggle::Unchanged(Rejection::UnknownCategory);
        };

        let toggle = tree.toggle_perk(perk, self.progress.unlocked(category), self.locks(category));
        if let Toggle::Unchanged(reason) = toggle {
            debug!(category, perk, ?reason, "toggle ignored");
            return toggle;
        }
        let category_id = tree.id().clone();

        match &toggle {
            Toggle::Unlocked {
                unlocked,
                fully_unlocked,
            } => {
                let perk_id = tree.get(perk).map(|p| p.id.clone());
                self.events.extend(perk_id.map(|perk| PerkEvent::PerkUnlocked {
                    category: category_id.clone(),
                    perk,
                }));
                if *fully_unlocked {
                    info!(category = %category_id, "category fully unlocked");
                    self.events.push(PerkEvent::LegendaryUnlocked {
                        category: category_id.clone(),
                        legendary: tree.info().legendary.clone(),
                    });
                }
                self.progress.set(category_id, unlocked.clone());
            }
            Toggle::Unselected { unlocked, removed } => {
                if let Some((perk, cascade)) = removed.split_last() {
                    self.events.push(PerkEvent::PerkUnselected {
                        category: category_id.clone(),
                        perk: perk.clone(),
                        cascade: cascade.to_vec(),
                    });
                }
                let locks = tree.release_locks(self.locks(category), unlocked);
                self.locks.insert(category_id.clone(), locks);
                self.progress.set(category_id, unlocked.clone());
            }
            Toggle::Unchanged(_) => {}
        }

        self.persist();
        toggle
    }

    /// Flip a perk's pin. Returns whether it is pinned afterwards, or
    /// `None` if the category or perk is unknown.
    pub fn toggle_lock(&mut self, category: &str, perk: &str) -> Option<bool> {
        let tree = self.catalog.get(category)?;
        let perk_id = tree.get(perk)?.id.clone();
        let next = tree.toggle_lock(perk, self.locks(category));
        let pinned = next.contains(perk);

        self.events.push(PerkEvent::LockToggled {
            category: tree.id().clone(),
            perk: perk_id,
            pinned,
        });
        self.locks.insert(tree.id().clone(), next);
        Some(pinned)
    }

    // -- Event API --

    /// Drain all pending events. Returns events and clears the internal list.
    pub fn drain_events(&mut self) -> Vec<PerkEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get a read-only view of pending events.
    pub fn pending_events(&self) -> &[PerkEvent] {
        &self.events
    }

    // -- Internal helpers --

    /// Write the full snapshot. Failures are logged, never surfaced.
    fn persist(&mut self) {
        if let Err(e) = self.try_persist() {
            warn!(error = %e, "failed to save progress; keeping in-memory state");
        }
    }

    fn try_persist(&mut self) -> Result<(), StoreError> {
        let blob = encode_progress(&self.progress)?;
        self.store.save(&blob)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
