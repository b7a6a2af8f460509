//! Host game events
//!
//! Callbacks from the host are reported as [`GameEvent`]s carrying only
//! primitive values. Each event knows its own trigger condition and reduces
//! to a [`ChallengeEvent`] when the condition holds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a creature/object in the host world
///
/// Displayed as `ID.<spawner>.<number>` with an optional `.<alt_seed>` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId {
    pub spawner: i32,
    pub number: i32,
    pub alt_seed: Option<i32>,
}

impl EntityId {
    /// Create an entity id without an alternate seed
    pub fn new(spawner: i32, number: i32) -> Self {
        Self {
            spawner,
            number,
            alt_seed: None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID.{}.{}", self.spawner, self.number)?;
        if let Some(seed) = self.alt_seed {
            write!(f, ".{seed}")?;
        }
        Ok(())
    }
}

impl FromStr for EntityId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() < 3 || parts.len() > 4 || parts[0] != "ID" {
            return Err(format!("malformed entity id '{s}'"));
        }

        let parse = |part: &str| {
            part.parse::<i32>()
                .map_err(|e| format!("malformed entity id '{s}': {e}"))
        };

        Ok(Self {
            spawner: parse(parts[1])?,
            number: parse(parts[2])?,
            alt_seed: parts.get(3).map(|p| parse(p)).transpose()?,
        })
    }
}

/// Named host extension points a challenge kind can hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    /// A world/region finished loading
    WorldLoaded,
    /// A pole mimic is being climbed on
    PoleMimicClimbed,
    /// A spear hit a lizard
    LizardSpeared,
}

/// Raw host callback data, already reduced to primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// World loader finished for `world_name`
    WorldLoaded {
        world_name: String,
        /// Whether the game actually has a live world attached
        world_present: bool,
    },
    /// A pole mimic was climbed on by some creature
    PoleMimicClimbed {
        mimic: EntityId,
        region: String,
        by_player: bool,
    },
    /// A weapon struck a lizard
    LizardSpeared {
        /// Whether the spear stuck in the lizard
        stuck: bool,
        /// Body chunk that was hit (0 = head)
        chunk_index: u32,
        hit_in_mouth: bool,
        region: String,
    },
}

impl GameEvent {
    /// Extension point this event comes from
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::WorldLoaded { .. } => EventKind::WorldLoaded,
            GameEvent::PoleMimicClimbed { .. } => EventKind::PoleMimicClimbed,
            GameEvent::LizardSpeared { .. } => EventKind::LizardSpeared,
        }
    }

    /// Apply the hook trigger condition
    ///
    /// Returns `None` when the outcome of the host behavior is irrelevant to
    /// challenges (no world, climbed by a non-player, spear missed the mouth).
    pub fn trigger(&self) -> Option<ChallengeEvent> {
        match self {
            GameEvent::WorldLoaded {
                world_name,
                world_present,
            } => world_present.then(|| ChallengeEvent::Entered {
                region: world_name.clone(),
            }),
            GameEvent::PoleMimicClimbed {
                mimic,
                region,
                by_player,
            } => by_player.then(|| ChallengeEvent::Grabbed {
                id: *mimic,
                region: region.clone(),
            }),
            GameEvent::LizardSpeared {
                stuck,
                chunk_index,
                hit_in_mouth,
                region,
            } => (*stuck && *chunk_index == 0 && *hit_in_mouth).then(|| ChallengeEvent::Speared {
                region: region.clone(),
            }),
        }
    }
}

/// Progress-relevant event delivered to challenges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeEvent {
    /// The player entered a region
    Entered { region: String },
    /// The player grabbed a pole mimic
    Grabbed { id: EntityId, region: String },
    /// The player speared a lizard in the mouth
    Speared { region: String },
}

impl ChallengeEvent {
    /// Extension point this event is delivered through
    pub fn kind(&self) -> EventKind {
        match self {
            ChallengeEvent::Entered { .. } => EventKind::WorldLoaded,
            ChallengeEvent::Grabbed { .. } => EventKind::PoleMimicClimbed,
            ChallengeEvent::Speared { .. } => EventKind::LizardSpeared,
        }
    }
}

/// Per-tick signal from the host update loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSignal {
    /// The current cycle is ending (shelter door closing)
    pub cycle_closing: bool,
}

impl TickSignal {
    /// A tick during which the cycle is closing
    pub fn cycle_closing() -> Self {
        Self {
            cycle_closing: true,
        }
    }
}
