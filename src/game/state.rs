//! Team and session state
//!
//! Tracks which team is acting, per-team completion/failure flags for a
//! challenge, and the non-owning session context handed to challenges.

use serde::{Deserialize, Serialize};

use crate::config::RegionCatalog;

/// Number of competing teams in multiplayer mode
pub const TEAM_COUNT: usize = 8;

/// A competing team (0-7), or the "no team" sentinel (8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Team(u8);

impl Team {
    /// Spectator / not on any team
    pub const NONE: Team = Team(TEAM_COUNT as u8);

    /// Create a team from its raw id. Anything out of range becomes [`Team::NONE`].
    pub fn new(id: u8) -> Self {
        if (id as usize) < TEAM_COUNT {
            Team(id)
        } else {
            Team::NONE
        }
    }

    /// Raw team id as used by the host (8 = no team)
    pub fn id(&self) -> u8 {
        self.0
    }

    /// Index into per-team flag arrays, `None` for the sentinel
    pub fn index(&self) -> Option<usize> {
        let idx = self.0 as usize;
        (idx < TEAM_COUNT).then_some(idx)
    }

    /// Check if this is the "no team" sentinel
    pub fn is_none(&self) -> bool {
        self.index().is_none()
    }
}

impl Default for Team {
    fn default() -> Self {
        Team(0)
    }
}

/// Per-team completed/failed flags for a single challenge
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamState {
    /// Teams that completed the challenge
    pub completed: [bool; TEAM_COUNT],
    /// Teams that failed the challenge
    pub failed: [bool; TEAM_COUNT],
}

impl TeamState {
    /// Create a fresh team state with no flags set
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the team completed the challenge
    pub fn is_completed(&self, team: Team) -> bool {
        team.index().is_some_and(|i| self.completed[i])
    }

    /// Check if the team failed the challenge
    pub fn is_failed(&self, team: Team) -> bool {
        team.index().is_some_and(|i| self.failed[i])
    }

    /// Mark the team as having completed the challenge
    pub fn mark_completed(&mut self, team: Team) {
        if let Some(i) = team.index() {
            self.completed[i] = true;
        }
    }

    /// Mark the team as failed. A failed team no longer counts as completed.
    pub fn mark_failed(&mut self, team: Team) {
        if let Some(i) = team.index() {
            self.completed[i] = false;
            self.failed[i] = true;
        }
    }

    /// Clear all flags
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Session context passed into challenge operations
///
/// Challenges never hold on to this; it is borrowed for the duration of a
/// single callback.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    /// Team of the local player
    pub team: Team,
    /// Region code to display name lookup
    pub regions: &'a RegionCatalog,
}

impl<'a> Session<'a> {
    /// Create a session for the given team
    pub fn new(team: Team, regions: &'a RegionCatalog) -> Self {
        Self { team, regions }
    }
}
