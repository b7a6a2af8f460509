//! Shared challenge lifecycle
//!
//! Every challenge kind embeds a [`ChallengeCore`] holding the flags the
//! board and other teams care about, and reports the outcome of each event as
//! a [`StateDelta`].

use serde::{Deserialize, Serialize};

use super::error::{ChallengeError, Result};
use crate::game::{Team, TeamState};

/// Separates the type name from the fields in the flat form
pub const TYPE_SEPARATOR: char = '~';
/// Separates fields in the flat form
pub const FIELD_SEPARATOR: &str = "><";
/// Separates entries of a list-valued field
pub const LIST_SEPARATOR: char = '|';

/// Lifecycle status of a challenge as seen by one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeStatus {
    Active,
    Completed,
    Failed,
}

/// What an event or tick did to a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateDelta {
    /// Event did not apply (filtered, hidden, terminal, wrong team)
    Ignored,
    /// Progress changed but no transition happened
    Progressed,
    /// The challenge was completed
    Completed,
    /// The team went over the limit after completing
    Failed(Team),
    /// Progress was discarded at the end of a cycle
    Expired,
}

impl StateDelta {
    /// Check if anything changed
    pub fn is_change(&self) -> bool {
        !matches!(self, StateDelta::Ignored)
    }
}

/// State shared by every challenge kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeCore {
    /// Completed by the local player
    pub completed: bool,
    /// Completion is locked in and visible to other teams
    pub revealed: bool,
    /// Hidden from the local team; suppresses all progress
    pub hidden: bool,
    /// Cached user-facing description
    pub description: String,
    /// Per-team completed/failed flags
    pub teams: TeamState,
}

impl ChallengeCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the guards every progress method shares
    pub fn accepts_progress(&self, team: Team) -> bool {
        !team.is_none() && !self.hidden && !self.teams.is_failed(team)
    }

    /// Check if the challenge is already done for this team
    pub fn is_done_for(&self, team: Team) -> bool {
        self.completed || self.teams.is_completed(team)
    }

    /// Transition to completed
    pub fn complete(&mut self, team: Team) {
        self.completed = true;
        self.teams.mark_completed(team);
        log::debug!("Challenge completed for team {}", team.id());
    }

    /// Transition to failed for a team
    pub fn fail(&mut self, team: Team) {
        self.completed = false;
        self.teams.mark_failed(team);
        log::debug!("Challenge failed for team {}", team.id());
    }

    /// Base reset policy. Visibility is owned by the board and kept.
    pub fn reset(&mut self) {
        self.completed = false;
        self.revealed = false;
        self.teams.clear();
    }

    /// Status for the given team
    pub fn status(&self, team: Team) -> ChallengeStatus {
        if self.teams.is_failed(team) {
            ChallengeStatus::Failed
        } else if self.is_done_for(team) {
            ChallengeStatus::Completed
        } else {
            ChallengeStatus::Active
        }
    }
}

/// Split flat-form fields, requiring exactly `expected` of them
pub fn split_fields<'a>(
    args: &'a str,
    challenge: &'static str,
    expected: usize,
) -> Result<Vec<&'a str>> {
    let fields: Vec<&str> = args.split(FIELD_SEPARATOR).collect();
    if fields.len() != expected {
        return Err(ChallengeError::FieldCount {
            challenge,
            expected,
            found: fields.len(),
        });
    }
    Ok(fields)
}

/// Parse an integer field
pub fn parse_int(raw: &str, challenge: &'static str, field: &'static str) -> Result<i32> {
    raw.trim()
        .parse()
        .map_err(|_| ChallengeError::InvalidNumber {
            challenge,
            field,
            value: raw.to_string(),
        })
}

/// Flat form of a flag
pub fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

pub fn parse_flag(raw: &str) -> bool {
    raw == "1"
}

/// Split a list field, dropping empty entries
pub fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(LIST_SEPARATOR).filter(|entry| !entry.is_empty())
}

/// Log a parse failure before handing it back to the caller
pub fn log_parse_error(challenge: &str, err: ChallengeError) -> ChallengeError {
    log::error!("{challenge} from_flat() encountered an error: {err}");
    err
}
