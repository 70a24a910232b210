//! End-to-end tests over the stock six-category catalog.
//!
//! Drives a [`Session`] backed by an in-memory or on-disk store through the
//! user-facing flows: unlocking, cascading unselects, pinning, leveling and
//! restoring progress across sessions.

use std::fs;
use std::path::{Path, PathBuf};

use skilltree_core::{Catalog, LevelCurve, PerkEvent, PerkId, PerkState, Rejection, Toggle};
use skilltree_data::load_builtin_catalog;
use skilltree_session::{FileStore, MemoryStore, ProgressStore, Session};

fn catalog() -> Catalog {
    load_builtin_catalog().expect("builtin catalog")
}

fn session() -> Session<MemoryStore> {
    Session::open(catalog(), LevelCurve::default(), MemoryStore::new())
}

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "skilltree_integration_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

// ---------------------------------------------------------------------------
// Catalog shape
// ---------------------------------------------------------------------------

#[test]
fn builtin_catalog_has_six_categories() {
    let catalog = catalog();
    let ids: Vec<_> = catalog.trees().map(|t| t.id().to_string()).collect();
    assert_eq!(
        ids,
        ["technical", "matter", "intelligence", "cool", "body", "relic"]
    );
    assert_eq!(catalog.perk_count(), 42);
    for tree in catalog.trees() {
        assert!(!tree.info().legendary.is_empty(), "{} has no legendary", tree.id());
        assert!(tree.perks().any(|p| p.is_root()), "{} has no root", tree.id());
    }
}

#[test]
fn every_builtin_perk_is_reachable() {
    // Unlocking in display order must eventually take every category to
    // completion; a stuck perk means an unreachable prerequisite.
    let mut session = session();
    let catalog = catalog();
    for tree in catalog.trees() {
        for _ in 0..tree.len() {
            for perk in tree.perks() {
                if session.is_available(tree.id().as_str(), perk.id.as_str()) {
                    session.toggle_perk(tree.id().as_str(), perk.id.as_str());
                }
            }
        }
        assert!(
            session.summary(tree.id().as_str()).unwrap().fully_unlocked,
            "{} could not be completed",
            tree.id()
        );
    }
    assert_eq!(session.character_level(), 42 / 5 + 1);
}

// ---------------------------------------------------------------------------
// User flows
// ---------------------------------------------------------------------------

#[test]
fn fresh_session_is_level_one() {
    let session = session();
    assert_eq!(session.character_level(), 1);
    for tree in session.catalog().trees() {
        assert_eq!(session.category_level(tree.id().as_str()), 0);
    }
}

#[test]
fn five_perks_across_categories_reach_level_two() {
    let mut session = session();
    for (category, perk) in [
        ("technical", "t1"),
        ("matter", "m1"),
        ("body", "b2"),
        ("relic", "r1"),
        ("cool", "c1"),
    ] {
        assert!(session.toggle_perk(category, perk).is_changed());
    }
    assert_eq!(session.character_level(), 2);
    assert_eq!(session.store().saves(), 5);
}

#[test]
fn completing_technical_emits_its_legendary() {
    let mut session = session();
    let order = ["t1", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9"];
    for perk in order {
        let toggle = session.toggle_perk("technical", perk);
        assert!(matches!(toggle, Toggle::Unlocked { fully_unlocked: false, .. }));
    }
    let last = session.toggle_perk("technical", "t10");
    assert!(matches!(last, Toggle::Unlocked { fully_unlocked: true, .. }));

    let events = session.drain_events();
    let legendary = events.iter().find_map(|e| match e {
        PerkEvent::LegendaryUnlocked { legendary, .. } => Some(legendary.as_str()),
        _ => None,
    });
    assert!(legendary.is_some_and(|text| text.starts_with("Design, build")));
}

#[test]
fn locked_out_perk_cannot_be_unlocked() {
    let mut session = session();
    assert_eq!(
        session.perk_state("technical", "t3"),
        Some(PerkState::LockedOut)
    );
    assert_eq!(
        session.toggle_perk("technical", "t3"),
        Toggle::Unchanged(Rejection::MissingPrerequisites)
    );
    assert!(session.progress().unlocked("technical").is_empty());
}

#[test]
fn pinned_perk_blocks_unselect() {
    let mut session = session();
    session.toggle_perk("technical", "t1");
    session.toggle_perk("technical", "t3");
    session.toggle_lock("technical", "t3");
    assert_eq!(
        session.toggle_perk("technical", "t3"),
        Toggle::Unchanged(Rejection::Pinned)
    );
    assert!(session.progress().unlocked("technical").contains("t3"));
}

#[test]
fn pinned_dependent_can_be_unlocked_again_after_cascade() {
    let mut session = session();
    for perk in ["b1", "b6", "b3"] {
        session.toggle_perk("body", perk);
    }
    session.toggle_lock("body", "b3");
    session.toggle_perk("body", "b1");
    assert_eq!(session.perk_state("body", "b3"), Some(PerkState::LockedOut));

    session.toggle_perk("body", "b1");
    assert_eq!(session.perk_state("body", "b3"), Some(PerkState::Available));
    assert!(session.toggle_perk("body", "b3").is_changed());
    assert_eq!(session.perk_state("body", "b3"), Some(PerkState::Unlocked));
    assert_eq!(session.summary("body").unwrap().pinned, 0);
}

#[test]
fn unselect_cascades_through_dependents() {
    let mut session = session();
    for perk in ["b1", "b6", "b3"] {
        session.toggle_perk("body", perk);
    }
    let toggle = session.toggle_perk("body", "b1");
    let Toggle::Unselected { unlocked, removed } = toggle else {
        panic!("expected b1 to be unselected");
    };
    assert_eq!(removed, vec![PerkId::from("b3"), PerkId::from("b1")]);
    assert!(unlocked.contains("b6"));
    assert_eq!(unlocked.len(), 1);
}

#[test]
fn deep_cascade_in_matter() {
    // m1 <- m3 <- m5 <- m6 <- m7, with m5 also needing m4 <- m2.
    let mut session = session();
    for perk in ["m1", "m2", "m3", "m4", "m5", "m6", "m7"] {
        session.toggle_perk("matter", perk);
    }
    session.toggle_perk("matter", "m1");
    let left: Vec<_> = session
        .progress()
        .unlocked("matter")
        .iter()
        .map(|id| id.to_string())
        .collect();
    assert_eq!(left, vec!["m2", "m4"]);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn progress_survives_reopen_on_disk() {
    let dir = make_test_dir("reopen");
    let path = dir.join("progress.json");

    {
        let mut session = Session::open(catalog(), LevelCurve::default(), FileStore::new(&path));
        for perk in ["i1", "i2", "i3"] {
            session.toggle_perk("intelligence", perk);
        }
        session.toggle_lock("intelligence", "i3");
    }

    let session = Session::open(catalog(), LevelCurve::default(), FileStore::new(&path));
    assert_eq!(session.category_level("intelligence"), 3);
    // Pins are per-session.
    assert_eq!(
        session.perk_state("intelligence", "i3"),
        Some(PerkState::Unlocked)
    );
    cleanup(&dir);
}

#[test]
fn stale_blob_is_repaired_on_open() {
    let blob = r#"{"cool": ["c1", "c3", "c6"], "retired": ["x1"], "relic": "oops"}"#;
    let session = Session::open(
        catalog(),
        LevelCurve::default(),
        MemoryStore::with_blob(blob),
    );
    assert_eq!(session.category_level("cool"), 2);
    assert_eq!(session.category_level("relic"), 0);
    assert!(session.progress().unlocked("retired").is_empty());
}

#[test]
fn saved_blob_is_plain_json() {
    let mut session = session();
    session.toggle_perk("relic", "r1");
    let blob = session.store().load().unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value["relic"], serde_json::json!(["r1"]));
    assert_eq!(value["body"], serde_json::json!([]));
}
