//! Per-category membership sets: which perks are unlocked and which are
//! pinned against change.
//!
//! Both are plain value types. Transitions on [`PerkTree`](crate::tree::PerkTree)
//! take a set by reference and return a new one, so callers always hold a
//! complete snapshot.

use crate::id::PerkId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Perk ids the user has unlocked in one category. Iteration is ordered by
/// id so serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockSet(BTreeSet<PerkId>);

/// Perk ids pinned in one category. Pinning only restricts changes to the
/// unlock state; it never implies the perk is unlocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockSet(BTreeSet<PerkId>);

macro_rules! id_set {
    ($ty:ident) => {
        impl $ty {
            pub const fn new() -> Self {
                Self(BTreeSet::new())
            }

            pub fn contains(&self, id: &str) -> bool {
                self.0.contains(id)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            pub fn iter(&self) -> impl Iterator<Item = &PerkId> {
                self.0.iter()
            }

            /// Returns `true` if the id was not already present.
            pub(crate) fn insert(&mut self, id: PerkId) -> bool {
                self.0.insert(id)
            }

            /// Returns `true` if the id was present.
            pub(crate) fn remove(&mut self, id: &str) -> bool {
                self.0.remove(id)
            }
        }

        impl<P: Into<PerkId>> FromIterator<P> for $ty {
            fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
                Self(iter.into_iter().map(Into::into).collect())
            }
        }

        impl<'a> IntoIterator for &'a $ty {
            type Item = &'a PerkId;
            type IntoIter = std::collections::btree_set::Iter<'a, PerkId>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

id_set!(UnlockSet);
id_set!(LockSet);
