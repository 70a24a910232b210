//! Skill Tree Core -- the perk progress engine.
//!
//! Users progress through categories of self-improvement attributes. Each
//! category is a directed acyclic graph of perks with prerequisites. This
//! crate decides which perks are available, applies unlock, unselect and
//! pin transitions, and derives progress metrics. It performs no I/O.
//!
//! # Ownership
//!
//! Definitions are immutable: a [`catalog::Catalog`] of [`tree::PerkTree`]s
//! is built once. State is plain values owned by the caller: a
//! [`progress::Progress`] (one [`sets::UnlockSet`] per category) and one
//! [`sets::LockSet`] per category. Transitions take state by reference and
//! return the new state:
//!
//! ```rust,ignore
//! let toggle = tree.toggle_perk("t1", progress.unlocked("technical"), &locks);
//! if let Some(next) = toggle.unlocked() {
//!     progress.set(tree.id().clone(), next.clone());
//! }
//! ```
//!
//! # Key Types
//!
//! - [`tree::PerkTreeBuilder`] / [`tree::PerkTree`] -- one category's perk
//!   arena with queries (`is_available`, `find_dependents`, `can_unselect`)
//!   and transitions (`toggle_perk`, `toggle_lock`).
//! - [`tree::Toggle`] -- outcome of a toggle, including the cascade and the
//!   "category fully unlocked" flag.
//! - [`progress::Progress`] -- per-category unlock sets with the character
//!   level projection (`floor(total / 5) + 1`).
//! - [`event::PerkEvent`] -- change notifications for the presentation layer.

pub mod catalog;
pub mod event;
pub mod id;
pub mod perk;
pub mod progress;
pub mod sets;
pub mod tree;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use catalog::Catalog;
pub use event::PerkEvent;
pub use id::{CategoryId, PerkId, PerkKey};
pub use perk::{CategoryInfo, Connection, Effort, Perk, Position};
pub use progress::{CategorySummary, LevelCurve, Progress};
pub use sets::{LockSet, UnlockSet};
pub use tree::{PerkState, PerkTree, PerkTreeBuilder, PerkTreeError, Rejection, Toggle};
