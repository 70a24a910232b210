//! A single category's perk graph and the unlock state machine over it.
//!
//! # Lifecycle
//!
//! A [`PerkTreeBuilder`] collects perks and rendered connections, then
//! [`PerkTreeBuilder::build`] validates every reference and freezes the
//! result into an immutable [`PerkTree`]. Perks are stored in an arena with
//! precomputed forward (`requires`) and reverse (`dependents`) edges, so
//! every query below is a hash lookup plus a walk over direct neighbours.
//!
//! # State machine
//!
//! Per perk, given an [`UnlockSet`] and a [`LockSet`]:
//!
//! - **LockedOut** -> **Available** automatically, once all prerequisites
//!   are unlocked.
//! - **Available** -> **Unlocked** via [`PerkTree::toggle_perk`].
//! - **Unlocked** -> removed via [`PerkTree::toggle_perk`], taking every
//!   unlocked perk that transitively depends on it along (the cascade).
//! - **Unlocked** <-> **Pinned** via [`PerkTree::toggle_lock`]. A pinned
//!   perk rejects toggles. A pin on a perk that is not unlocked has no
//!   effect; [`PerkTree::release_locks`] drops such pins after a cascade.
//!
//! None of the transitions mutate their inputs. Invalid requests come back
//! as [`Toggle::Unchanged`] with a [`Rejection`], never as errors.

use crate::id::{CategoryId, PerkId, PerkKey};
use crate::perk::{CategoryInfo, Connection, Perk};
use crate::sets::{LockSet, UnlockSet};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while building a perk tree or a catalog. Runtime
/// transitions never fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PerkTreeError {
    #[error("duplicate perk id '{perk}' in category '{category}'")]
    DuplicatePerk { category: CategoryId, perk: PerkId },

    #[error("perk '{perk}' in category '{category}' requires unknown perk '{prereq}'")]
    UnknownPrerequisite {
        category: CategoryId,
        perk: PerkId,
        prereq: PerkId,
    },

    #[error("connection {from} -> {to} in category '{category}' references an unknown perk")]
    UnknownConnectionEndpoint {
        category: CategoryId,
        from: PerkId,
        to: PerkId,
    },

    #[error("connection {from} -> {to} in category '{category}' has no matching requirement")]
    ConnectionWithoutRequirement {
        category: CategoryId,
        from: PerkId,
        to: PerkId,
    },

    #[error("requirement {to} -> {from} in category '{category}' has no matching connection")]
    MissingConnection {
        category: CategoryId,
        from: PerkId,
        to: PerkId,
    },

    #[error("duplicate category id '{0}'")]
    DuplicateCategory(CategoryId),
}

// ---------------------------------------------------------------------------
// Transition results
// ---------------------------------------------------------------------------

/// Why a toggle left the unlock set untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The perk is pinned in the lock set.
    Pinned,
    /// At least one prerequisite is not unlocked.
    MissingPrerequisites,
    /// The id does not name a perk of this category.
    UnknownPerk,
    /// The category id is not in the catalog. Only produced by callers that
    /// route requests by category.
    UnknownCategory,
}

/// Outcome of [`PerkTree::toggle_perk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    /// The perk was added.
    Unlocked {
        unlocked: UnlockSet,
        /// Every perk of the category is now unlocked.
        fully_unlocked: bool,
    },

    /// The perk was removed together with its unlocked dependents.
    Unselected {
        unlocked: UnlockSet,
        /// Removed ids: dependents first, the toggled perk last.
        removed: Vec<PerkId>,
    },

    Unchanged(Rejection),
}

impl Toggle {
    /// The new unlock set, if the toggle changed anything.
    pub fn unlocked(&self) -> Option<&UnlockSet> {
        match self {
            Toggle::Unlocked { unlocked, .. } | Toggle::Unselected { unlocked, .. } => {
                Some(unlocked)
            }
            Toggle::Unchanged(_) => None,
        }
    }

    pub fn is_changed(&self) -> bool {
        !matches!(self, Toggle::Unchanged(_))
    }
}

/// The derived state of one perk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerkState {
    /// Some prerequisite is missing.
    LockedOut,
    /// All prerequisites are unlocked; the perk itself is not.
    Available,
    Unlocked,
    /// Unlocked and pinned in the lock set.
    Pinned,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects perks for one category. Registration order is preserved and
/// becomes the tree's display order.
#[derive(Debug)]
pub struct PerkTreeBuilder {
    info: CategoryInfo,
    perks: SlotMap<PerkKey, Perk>,
    order: Vec<PerkKey>,
    index: HashMap<PerkId, PerkKey>,
    connections: Vec<Connection>,
}

impl PerkTreeBuilder {
    pub fn new(info: CategoryInfo) -> Self {
        Self {
            info,
            perks: SlotMap::with_key(),
            order: Vec::new(),
            index: HashMap::new(),
            connections: Vec::new(),
        }
    }

    /// Register a perk. Prerequisites may name perks registered later; they
    /// are resolved in [`build`](Self::build).
    pub fn register(&mut self, perk: Perk) -> Result<PerkKey, PerkTreeError> {
        if self.index.contains_key(&perk.id) {
            return Err(PerkTreeError::DuplicatePerk {
                category: self.info.id.clone(),
                perk: perk.id,
            });
        }

        let id = perk.id.clone();
        let key = self.perks.insert(perk);
        self.order.push(key);
        self.index.insert(id, key);
        Ok(key)
    }

    /// Declare a rendered connection. `to` must require `from`.
    pub fn connect(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Validate references and freeze the tree.
    ///
    /// If no connections were declared they are derived from the `requires`
    /// lists. Otherwise connections and requirements must match one to one.
    pub fn build(self) -> Result<PerkTree, PerkTreeError> {
        let category = self.info.id.clone();

        let mut requires: SecondaryMap<PerkKey, Vec<PerkKey>> = SecondaryMap::new();
        let mut dependents: SecondaryMap<PerkKey, Vec<PerkKey>> = SecondaryMap::new();
        for &key in &self.order {
            requires.insert(key, Vec::new());
            dependents.insert(key, Vec::new());
        }

        // Walk in display order so reverse edges come out in display order too.
        for &key in &self.order {
            let perk = &self.perks[key];
            for prereq in &perk.requires {
                let Some(&prereq_key) = self.index.get(prereq) else {
                    return Err(PerkTreeError::UnknownPrerequisite {
                        category,
                        perk: perk.id.clone(),
                        prereq: prereq.clone(),
                    });
                };
                requires[key].push(prereq_key);
                dependents[prereq_key].push(key);
            }
        }

        let connections = if self.connections.is_empty() {
            self.order
                .iter()
                .flat_map(|&key| {
                    let perk = &self.perks[key];
                    perk.requires
                        .iter()
                        .map(|prereq| Connection::new(prereq.clone(), perk.id.clone()))
                })
                .collect()
        } else {
            validate_connections(&category, &self.perks, &self.index, &self.connections)?;
            self.connections
        };

        Ok(PerkTree {
            info: self.info,
            perks: self.perks,
            order: self.order,
            index: self.index,
            requires,
            dependents,
            connections,
        })
    }
}

fn validate_connections(
    category: &CategoryId,
    perks: &SlotMap<PerkKey, Perk>,
    index: &HashMap<PerkId, PerkKey>,
    connections: &[Connection],
) -> Result<(), PerkTreeError> {
    let mut declared = HashSet::new();
    for conn in connections {
        let (Some(_), Some(&to_key)) = (index.get(&conn.from), index.get(&conn.to)) else {
            return Err(PerkTreeError::UnknownConnectionEndpoint {
                category: category.clone(),
                from: conn.from.clone(),
                to: conn.to.clone(),
            });
        };
        if !perks[to_key].requires.contains(&conn.from) {
            return Err(PerkTreeError::ConnectionWithoutRequirement {
                category: category.clone(),
                from: conn.from.clone(),
                to: conn.to.clone(),
            });
        }
        declared.insert((&conn.from, &conn.to));
    }

    for perk in perks.values() {
        for prereq in &perk.requires {
            if !declared.contains(&(prereq, &perk.id)) {
                return Err(PerkTreeError::MissingConnection {
                    category: category.clone(),
                    from: prereq.clone(),
                    to: perk.id.clone(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// PerkTree
// ---------------------------------------------------------------------------

/// Immutable perk graph of one category.
#[derive(Debug, Clone)]
pub struct PerkTree {
    info: CategoryInfo,
    perks: SlotMap<PerkKey, Perk>,
    /// Display order (registration order).
    order: Vec<PerkKey>,
    index: HashMap<PerkId, PerkKey>,
    requires: SecondaryMap<PerkKey, Vec<PerkKey>>,
    /// Reverse of `requires`: who lists this perk as a prerequisite.
    dependents: SecondaryMap<PerkKey, Vec<PerkKey>>,
    connections: Vec<Connection>,
}

impl PerkTree {
    // -- Definition access --

    pub fn info(&self) -> &CategoryInfo {
        &self.info
    }

    pub fn id(&self) -> &CategoryId {
        &self.info.id
    }

    /// Number of perks in the category.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Perks in display order.
    pub fn perks(&self) -> impl Iterator<Item = &Perk> {
        self.order.iter().map(|&key| &self.perks[key])
    }

    pub fn get(&self, id: &str) -> Option<&Perk> {
        self.key(id).map(|key| &self.perks[key])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Rendered connections, either as declared or derived from `requires`.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Direct prerequisites of a perk, resolved. Empty for unknown ids.
    pub fn prerequisites(&self, id: &str) -> impl Iterator<Item = &Perk> {
        self.key(id)
            .into_iter()
            .flat_map(|key| self.requires[key].iter().map(|&k| &self.perks[k]))
    }

    fn key(&self, id: &str) -> Option<PerkKey> {
        self.index.get(id).copied()
    }

    // -- Queries --

    /// A perk is available when it is not yet unlocked and every
    /// prerequisite is. Unknown ids are never available.
    pub fn is_available(&self, id: &str, unlocked: &UnlockSet) -> bool {
        match self.key(id) {
            Some(key) => self.is_available_key(key, unlocked),
            None => false,
        }
    }

    fn is_available_key(&self, key: PerkKey, unlocked: &UnlockSet) -> bool {
        if unlocked.contains(self.perks[key].id.as_str()) {
            return false;
        }
        self.requires[key]
            .iter()
            .all(|&req| unlocked.contains(self.perks[req].id.as_str()))
    }

    /// All unlocked perks that transitively require `id`, in discovery
    /// order. Never contains `id` itself, even if the data has a cycle.
    pub fn find_dependents(&self, id: &str, unlocked: &UnlockSet) -> Vec<PerkId> {
        let Some(root) = self.key(id) else {
            return Vec::new();
        };

        let mut visited: HashSet<PerkKey> = HashSet::from([root]);
        let mut stack = vec![root];
        let mut found = Vec::new();

        while let Some(current) = stack.pop() {
            for &dep in &self.dependents[current] {
                let dep_id = &self.perks[dep].id;
                if unlocked.contains(dep_id.as_str()) && visited.insert(dep) {
                    found.push(dep_id.clone());
                    stack.push(dep);
                }
            }
        }
        found
    }

    /// One-hop check: `false` if any unlocked perk directly requires `id`.
    ///
    /// [`toggle_perk`](Self::toggle_perk) does not consult this; it always
    /// cascades. Use it to decide whether to ask for confirmation first.
    pub fn can_unselect(&self, id: &str, unlocked: &UnlockSet) -> bool {
        let Some(key) = self.key(id) else {
            return true;
        };
        !self.dependents[key]
            .iter()
            .any(|&dep| unlocked.contains(self.perks[dep].id.as_str()))
    }

    /// Whether every perk of the category is unlocked.
    pub fn is_fully_unlocked(&self, unlocked: &UnlockSet) -> bool {
        !self.is_empty() && self.perks().all(|perk| unlocked.contains(perk.id.as_str()))
    }

    /// A connection is lit when it is one of this tree's connections and
    /// both of its endpoints are unlocked.
    pub fn is_connection_unlocked(&self, from: &str, to: &str, unlocked: &UnlockSet) -> bool {
        self.connections
            .iter()
            .any(|c| c.from.as_str() == from && c.to.as_str() == to)
            && unlocked.contains(from)
            && unlocked.contains(to)
    }

    /// `None` for unknown ids.
    pub fn perk_state(&self, id: &str, unlocked: &UnlockSet, locked: &LockSet) -> Option<PerkState> {
        let key = self.key(id)?;
        let state = if unlocked.contains(id) {
            if locked.contains(id) {
                PerkState::Pinned
            } else {
                PerkState::Unlocked
            }
        } else if self.is_available_key(key, unlocked) {
            PerkState::Available
        } else {
            PerkState::LockedOut
        };
        Some(state)
    }

    /// Perks that could be unlocked right now, in display order.
    pub fn available(&self, unlocked: &UnlockSet) -> Vec<&Perk> {
        self.order
            .iter()
            .filter(|&&key| self.is_available_key(key, unlocked))
            .map(|&key| &self.perks[key])
            .collect()
    }

    // -- Transitions --

    /// Toggle a perk's unlock state.
    ///
    /// Pinned unlocked perks are left alone. Other unlocked perks are
    /// removed along with every unlocked perk that transitively depends on
    /// them, pinned or not. Available perks are added. Anything else is a
    /// no-op.
    pub fn toggle_perk(&self, id: &str, unlocked: &UnlockSet, locked: &LockSet) -> Toggle {
        let Some(key) = self.key(id) else {
            return Toggle::Unchanged(Rejection::UnknownPerk);
        };

        let perk_id = &self.perks[key].id;

        if unlocked.contains(id) {
            if locked.contains(id) {
                return Toggle::Unchanged(Rejection::Pinned);
            }
            let mut removed = self.find_dependents(id, unlocked);
            let mut next = unlocked.clone();
            for dep in &removed {
                next.remove(dep.as_str());
            }
            next.remove(id);
            removed.push(perk_id.clone());
            return Toggle::Unselected {
                unlocked: next,
                removed,
            };
        }

        if !self.is_available_key(key, unlocked) {
            return Toggle::Unchanged(Rejection::MissingPrerequisites);
        }

        let mut next = unlocked.clone();
        next.insert(perk_id.clone());
        let fully_unlocked = self.is_fully_unlocked(&next);
        Toggle::Unlocked {
            unlocked: next,
            fully_unlocked,
        }
    }

    /// Flip a perk's pin. Ids outside the category are ignored.
    pub fn toggle_lock(&self, id: &str, locked: &LockSet) -> LockSet {
        let mut next = locked.clone();
        if let Some(key) = self.key(id)
            && !next.remove(id)
        {
            next.insert(self.perks[key].id.clone());
        }
        next
    }

    /// Keep only the pins of perks that are still unlocked.
    pub fn release_locks(&self, locked: &LockSet, unlocked: &UnlockSet) -> LockSet {
        locked
            .iter()
            .filter(|id| unlocked.contains(id.as_str()))
            .cloned()
            .collect()
    }

    /// Repair an unlock set that did not come from this tree's transitions.
    ///
    /// Drops unknown ids, then keeps only perks whose prerequisites are
    /// themselves kept, so the result satisfies the prerequisite invariant.
    pub fn sanitize(&self, unlocked: &UnlockSet) -> UnlockSet {
        let mut kept = UnlockSet::new();
        loop {
            let mut grew = false;
            for &key in &self.order {
                let id = &self.perks[key].id;
                if unlocked.contains(id.as_str()) && self.is_available_key(key, &kept) {
                    kept.insert(id.clone());
                    grew = true;
                }
            }
            if !grew {
                return kept;
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
