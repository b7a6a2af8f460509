//! Host game interface module
//!
//! This module contains the data exchanged with the host game: reduced event
//! payloads, tick signals, teams and the session context.

pub mod events;
pub mod state;

pub use events::{ChallengeEvent, EntityId, EventKind, GameEvent, TickSignal};
pub use state::{Session, Team, TeamState, TEAM_COUNT};
