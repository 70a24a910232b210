//! Skill Tree Session -- live progress with persistence.
//!
//! Wraps the pure engine from `skilltree-core` in a [`Session`] that owns
//! the current progress and pins, writes a full snapshot to a
//! [`ProgressStore`] after every change, and restores it on open.
//!
//! The persisted form is a JSON object of category id to unlocked perk ids
//! (see [`codec`]). Reading it back is lenient: malformed or stale data
//! degrades to empty or trimmed sets instead of failing.

pub mod codec;
pub mod session;
pub mod store;

pub use codec::{decode_progress, encode_progress};
pub use session::Session;
pub use store::{FileStore, MemoryStore, ProgressStore, StoreError};
