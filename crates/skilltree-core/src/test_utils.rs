//! Small hand-built trees shared by unit tests, property tests and
//! downstream crates (enable the `test-utils` feature).

use crate::perk::{CategoryInfo, Connection, Perk};
use crate::tree::{PerkTree, PerkTreeBuilder};

/// Build a tree from `(id, requires)` pairs, with connections derived.
pub fn make_tree(category: &str, perks: &[(&str, &[&str])]) -> PerkTree {
    let mut builder = PerkTreeBuilder::new(CategoryInfo::new(category, category.to_uppercase()));
    for (id, requires) in perks {
        builder
            .register(Perk::new(*id, *id).requiring(requires.iter().copied()))
            .expect("unique perk ids");
    }
    builder.build().expect("valid tree")
}

/// `a <- b <- c`: c requires b, b requires a.
pub fn chain_tree() -> PerkTree {
    make_tree("chain", &[("a", &[]), ("b", &["a"]), ("c", &["b"])])
}

/// The ten-perk "technical" tree, with declared connections.
pub fn technical_tree() -> PerkTree {
    let perks: &[(&str, &[&str])] = &[
        ("t1", &[]),
        ("t2", &[]),
        ("t3", &["t1"]),
        ("t4", &["t2"]),
        ("t5", &["t2"]),
        ("t6", &["t3", "t4"]),
        ("t7", &["t4", "t5"]),
        ("t8", &["t6"]),
        ("t9", &["t7"]),
        ("t10", &["t8", "t9"]),
    ];
    let mut builder = PerkTreeBuilder::new(CategoryInfo::new("technical", "TECHNICAL ABILITY"));
    for (id, requires) in perks {
        builder
            .register(Perk::new(*id, *id).requiring(requires.iter().copied()))
            .expect("unique perk ids");
        for from in *requires {
            builder.connect(Connection::new(*from, *id));
        }
    }
    builder.build().expect("valid tree")
}

/// The six-perk "body" tree. `b6` is listed before `b3` on purpose.
pub fn body_tree() -> PerkTree {
    make_tree(
        "body",
        &[
            ("b1", &[]),
            ("b2", &[]),
            ("b6", &[]),
            ("b3", &["b1", "b6"]),
            ("b4", &["b2", "b6"]),
            ("b5", &["b3", "b4"]),
        ],
    )
}

/// Two perks requiring each other. Never unlockable; only useful for
/// checking that traversals terminate.
pub fn cyclic_tree() -> PerkTree {
    make_tree("cyclic", &[("x", &["y"]), ("y", &["x"])])
}
