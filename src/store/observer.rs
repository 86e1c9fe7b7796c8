//! Subscribe/notify plumbing for store observers
//!
//! Observers are called synchronously after each applied mutation, with the
//! event that happened and the fully updated state.

use super::types::{StoreState, ViewMode};

/// What a mutation changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    PromptAdded {
        id: String,
    },
    PromptUpdated {
        id: String,
        version: u32,
        history_appended: bool,
    },
    PromptDeleted {
        id: String,
    },
    PromptDuplicated {
        source_id: String,
        id: String,
    },
    FavoriteToggled {
        id: String,
        is_favorite: bool,
    },
    FolderAdded {
        id: String,
    },
    FolderUpdated {
        id: String,
    },
    FolderDeleted {
        id: String,
        /// Prompts whose folder reference was cleared
        detached: usize,
    },
    TagAdded {
        id: String,
    },
    TagUpdated {
        id: String,
    },
    TagDeleted {
        id: String,
        name: String,
        /// Prompts the tag name was removed from
        untagged: usize,
    },
    SelectionChanged,
    SearchChanged,
    DarkModeToggled {
        is_dark_mode: bool,
    },
    ViewModeChanged {
        mode: ViewMode,
    },
    Hydrated,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn Fn(&StoreEvent, &StoreState) + Send + Sync>;

/// Ordered list of observers; notification order is subscription order
#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent, &StoreState) + Send + Sync + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn notify(&self, event: &StoreEvent, state: &StoreState) {
        for (_, observer) in &self.observers {
            observer(event, state);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}
