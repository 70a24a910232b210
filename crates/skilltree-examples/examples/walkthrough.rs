//! Walkthrough: the stock catalog, a persisted session, and a cascade.
//!
//! Loads the built-in six categories, opens a session that saves to a
//! temporary file, unlocks a few body perks, pins one, then unselects a
//! root to show the cascade. Finally reopens the file to show that
//! progress persisted and pins did not.
//!
//! Run with: `cargo run -p skilltree-examples --example walkthrough`
//! Set `RUST_LOG=debug` to see engine logging.

use skilltree_core::{LevelCurve, PerkEvent, Toggle};
use skilltree_data::load_builtin_catalog;
use skilltree_session::{FileStore, ProgressStore, Session};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let catalog = load_builtin_catalog().expect("builtin catalog");
    let path = std::env::temp_dir().join("skilltree-walkthrough").join("progress.json");
    let _ = std::fs::remove_file(&path);
    tracing::info!(path = %path.display(), "progress file");

    // --- Categories ---

    println!("Categories:");
    for tree in catalog.trees() {
        let info = tree.info();
        println!("  {} {:<14} {:>2} perks  {}", info.icon, info.name, tree.len(), info.subtitle);
    }

    let mut session = Session::open(catalog, LevelCurve::default(), FileStore::new(&path));

    // --- Unlocking ---

    println!("\nUnlocking body perks:");
    for perk in ["b3", "b1", "b6", "b3", "b2", "b4"] {
        let outcome = match session.toggle_perk("body", perk) {
            Toggle::Unlocked { .. } => "unlocked".to_string(),
            Toggle::Unselected { .. } => "unselected".to_string(),
            Toggle::Unchanged(reason) => format!("rejected ({reason:?})"),
        };
        println!("  {perk}: {outcome}");
    }
    println!("  available now: {:?}", available(&session, "body"));
    println!("  character level: {}", session.character_level());

    // --- Pinning ---

    session.toggle_lock("body", "b4");
    println!("\nPinned b4. Unselecting it: {:?}", session.toggle_perk("body", "b4"));

    // --- Cascade ---

    println!("\nUnselecting b1 (b3 depends on it):");
    session.drain_events();
    session.toggle_perk("body", "b1");
    for event in session.drain_events() {
        if let PerkEvent::PerkUnselected { perk, cascade, .. } = event {
            println!("  removed {perk}, cascade {cascade:?}");
        }
    }
    if let Some(summary) = session.summary("body") {
        println!(
            "  body: {}/{} unlocked, {} pinned",
            summary.unlocked, summary.total, summary.pinned
        );
    }

    // --- Persistence ---

    let blob = session.store().load().ok().flatten().unwrap_or_default();
    println!("\nSaved blob: {blob}");

    let catalog = load_builtin_catalog().expect("builtin catalog");
    let reopened = Session::open(catalog, LevelCurve::default(), FileStore::new(&path));
    println!(
        "Reopened: body level {}, b4 state {:?}",
        reopened.category_level("body"),
        reopened.perk_state("body", "b4")
    );

    let _ = std::fs::remove_file(&path);
}

fn available<S: ProgressStore>(session: &Session<S>, category: &str) -> Vec<String> {
    session
        .catalog()
        .get(category)
        .map(|tree| {
            tree.available(session.progress().unlocked(category))
                .into_iter()
                .map(|perk| perk.id.to_string())
                .collect()
        })
        .unwrap_or_default()
}
