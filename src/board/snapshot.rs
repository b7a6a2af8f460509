//! Versioned board snapshots
//!
//! Snapshots wrap each challenge's flat form in a JSON record so extra
//! per-challenge state can be added without touching the flat format.

use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeKind;

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One saved challenge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub kind: ChallengeKind,
    /// Flat form, including the type prefix
    pub state: String,
    #[serde(default)]
    pub hidden: bool,
}

/// A saved board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub version: u32,
    pub challenges: Vec<ChallengeRecord>,
}

impl BoardSnapshot {
    pub fn new(challenges: Vec<ChallengeRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            challenges,
        }
    }
}
