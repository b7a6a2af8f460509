//! Host hook registry
//!
//! Challenge kinds subscribe to host extension points when the first
//! challenge of that kind joins the board and unsubscribe when the last one
//! leaves. Events are only fanned out for hooked extension points.

use std::collections::{BTreeMap, BTreeSet};

use crate::challenge::ChallengeKind;
use crate::game::EventKind;

/// Subscriptions of challenge kinds to host events
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    /// Number of live challenges per kind
    installed: BTreeMap<ChallengeKind, usize>,
    /// Kinds listening on each event
    subscribers: BTreeMap<EventKind, BTreeSet<ChallengeKind>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one challenge of `kind`. Hooks are installed once per kind.
    pub fn add_hooks(&mut self, kind: ChallengeKind) {
        let count = self.installed.entry(kind).or_insert(0);
        *count += 1;
        if *count > 1 {
            return;
        }

        for &event in kind.hooks() {
            self.subscribers.entry(event).or_default().insert(kind);
            log::debug!("Hooked {event:?} for {}", kind.type_name());
        }
    }

    /// Unregister one challenge of `kind`. Removing an unregistered kind is a no-op.
    pub fn remove_hooks(&mut self, kind: ChallengeKind) {
        let Some(count) = self.installed.get_mut(&kind) else {
            return;
        };
        *count -= 1;
        if *count > 0 {
            return;
        }
        self.installed.remove(&kind);

        for &event in kind.hooks() {
            if let Some(kinds) = self.subscribers.get_mut(&event) {
                kinds.remove(&kind);
                if kinds.is_empty() {
                    self.subscribers.remove(&event);
                }
            }
            log::debug!("Unhooked {event:?} for {}", kind.type_name());
        }
    }

    /// Drop every subscription
    pub fn clear(&mut self) {
        self.installed.clear();
        self.subscribers.clear();
    }

    /// Check if anything listens on `event`
    pub fn is_hooked(&self, event: EventKind) -> bool {
        self.subscribers.contains_key(&event)
    }

    /// Kinds listening on `event`
    pub fn subscribers(&self, event: EventKind) -> impl Iterator<Item = ChallengeKind> + '_ {
        self.subscribers
            .get(&event)
            .into_iter()
            .flat_map(|kinds| kinds.iter().copied())
    }

    /// Number of live challenges registered for `kind`
    pub fn count(&self, kind: ChallengeKind) -> usize {
        self.installed.get(&kind).copied().unwrap_or(0)
    }
}
