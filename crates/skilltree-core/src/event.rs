use crate::id::{CategoryId, PerkId};

/// State changes worth telling the presentation layer about. The engine
/// never presents anything itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerkEvent {
    PerkUnlocked {
        category: CategoryId,
        perk: PerkId,
    },

    /// A perk was unselected. `cascade` lists the dependents removed with
    /// it, in removal order.
    PerkUnselected {
        category: CategoryId,
        perk: PerkId,
        cascade: Vec<PerkId>,
    },

    LockToggled {
        category: CategoryId,
        perk: PerkId,
        pinned: bool,
    },

    /// The unlock that completed a category. Emitted once per completion.
    LegendaryUnlocked {
        category: CategoryId,
        legendary: String,
    },
}

impl PerkEvent {
    pub fn category(&self) -> &CategoryId {
        match self {
            PerkEvent::PerkUnlocked { category, .. }
            | PerkEvent::PerkUnselected { category, .. }
            | PerkEvent::LockToggled { category, .. }
            | PerkEvent::LegendaryUnlocked { category, .. } => category,
        }
    }
}
