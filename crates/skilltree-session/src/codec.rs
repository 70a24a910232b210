//! The persisted progress blob: a JSON object mapping category ids to
//! arrays of unlocked perk ids.
//!
//! ```json
//! { "technical": ["t1", "t3"], "body": [] }
//! ```
//!
//! Decoding never fails. Anything unusable degrades to empty sets, one
//! category at a time, and is logged.

use serde_json::Value;
use skilltree_core::{Catalog, PerkId, Progress, UnlockSet};
use tracing::{debug, warn};

/// Serialize the full progress snapshot.
pub fn encode_progress(progress: &Progress) -> Result<String, serde_json::Error> {
    serde_json::to_string(progress)
}

/// Rebuild progress from a blob against the catalog.
///
/// - unparseable blob or non-object top level: every category empty
/// - an entry that is not an array of strings: that category empty
/// - unknown categories and unknown perk ids: dropped
/// - perks whose prerequisites did not survive: dropped
pub fn decode_progress(blob: &str, catalog: &Catalog) -> Progress {
    let entries = match serde_json::from_str::<Value>(blob) {
        Ok(Value::Object(entries)) => entries,
        Ok(other) => {
            warn!(kind = json_kind(&other), "saved progress is not an object, starting fresh");
            return catalog.empty_progress();
        }
        Err(e) => {
            warn!(error = %e, "saved progress is unreadable, starting fresh");
            return catalog.empty_progress();
        }
    };

    let mut raw = Progress::new();
    for (category, entry) in &entries {
        if catalog.get(category).is_none() {
            debug!(category = %category, "ignoring saved progress for unknown category");
            continue;
        }
        match decode_entry(entry) {
            Some(unlocked) => raw.set(category.clone().into(), unlocked),
            None => warn!(category = %category, "saved progress entry is malformed, resetting category"),
        }
    }

    let progress = catalog.sanitize_progress(&raw);
    for (category, unlocked) in progress.iter() {
        let saved = raw.unlocked(category.as_str()).len();
        if saved > unlocked.len() {
            warn!(
                category = %category,
                dropped = saved - unlocked.len(),
                "dropped saved perks that are unknown or missing prerequisites"
            );
        }
    }
    progress
}

fn decode_entry(entry: &Value) -> Option<UnlockSet> {
    entry
        .as_array()?
        .iter()
        .map(|id| id.as_str().map(PerkId::from))
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
