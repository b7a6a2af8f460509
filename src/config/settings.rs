//! Board and generation settings
//!
//! Defines all configurable options for generating and tracking challenges.

use serde::{Deserialize, Serialize};

use crate::challenge::ChallengeKind;
use crate::game::Team;

/// Main settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Team of the local player
    pub team: Team,
    /// Known regions and their display names
    pub regions: RegionCatalog,
    /// Randomized generation tuning
    pub generation: GenerationSettings,
    /// Board layout
    pub board: BoardSettings,
    /// Which challenges may not share a board
    pub duplication_rules: Vec<DuplicationRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            team: Team::default(),
            regions: RegionCatalog::default(),
            generation: GenerationSettings::default(),
            board: BoardSettings::default(),
            duplication_rules: DuplicationRule::defaults(),
        }
    }
}

impl Settings {
    /// Settings for a single player without a team
    pub fn solo() -> Self {
        Self::default()
    }

    /// Settings for a multiplayer session on the given team
    pub fn multiplayer(team: Team) -> Self {
        Self {
            team,
            ..Default::default()
        }
    }

    /// Load settings from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Save settings as pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Check if a challenge of `kind` may share the board with a challenge
    /// whose type name is `other`
    pub fn allows_together(&self, kind: ChallengeKind, other: &str) -> bool {
        self.duplication_rules
            .iter()
            .filter(|rule| rule.kind == kind)
            .all(|rule| !rule.forbidden_with.iter().any(|name| name == other))
    }
}

/// A region the player can visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Short region code (e.g. "SU")
    pub code: String,
    /// Display name (e.g. "Outskirts")
    pub name: String,
}

/// Region code to display name catalogue, also the pool for random picks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCatalog {
    pub regions: Vec<RegionInfo>,
}

impl Default for RegionCatalog {
    fn default() -> Self {
        let regions = [
            ("SU", "Outskirts"),
            ("HI", "Industrial Complex"),
            ("DS", "Drainage System"),
            ("CC", "Chimney Canopy"),
            ("GW", "Garbage Wastes"),
            ("SH", "Shaded Citadel"),
            ("SL", "Shoreline"),
            ("SI", "Sky Islands"),
            ("LF", "Farm Arrays"),
            ("UW", "The Exterior"),
            ("SB", "Subterranean"),
            ("SS", "Five Pebbles"),
        ];

        Self {
            regions: regions
                .into_iter()
                .map(|(code, name)| RegionInfo {
                    code: code.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

impl RegionCatalog {
    /// Display name for a region code, falling back to the code itself
    pub fn full_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.regions
            .iter()
            .find(|r| r.code == code)
            .map(|r| r.name.as_str())
            .unwrap_or(code)
    }

    /// All region codes in catalogue order
    pub fn codes(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.code.as_str()).collect()
    }

    /// Check if the catalogue is empty
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Tuning for randomized challenge generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Probability that a region challenge targets any region
    pub any_region_chance: f64,
    /// Probability that a counting challenge must be done in one cycle
    pub one_cycle_chance: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            any_region_chance: 0.5,
            one_cycle_chance: 0.2,
        }
    }
}

/// Board layout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSettings {
    /// Number of challenges on a generated board
    pub size: usize,
    /// Relative weight of each kind when generating
    pub kind_weights: Vec<KindWeight>,
    /// Attempts per slot before giving up on a compatible kind
    pub max_attempts: u32,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            size: 25,
            kind_weights: ChallengeKind::ALL
                .iter()
                .map(|&kind| KindWeight { kind, weight: 1 })
                .collect(),
            max_attempts: 20,
        }
    }
}

/// Generation weight for a challenge kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KindWeight {
    pub kind: ChallengeKind,
    pub weight: u32,
}

/// Compatibility rule: `kind` refuses to share a board with any of
/// `forbidden_with` (challenge type names, which may include kinds this
/// crate does not implement)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicationRule {
    pub kind: ChallengeKind,
    pub forbidden_with: Vec<String>,
}

impl DuplicationRule {
    /// Default compatibility matrix
    pub fn defaults() -> Vec<Self> {
        vec![
            DuplicationRule {
                kind: ChallengeKind::EnterRegionsTimes,
                forbidden_with: vec!["BingoAllRegionsExcept".to_string()],
            },
            DuplicationRule {
                kind: ChallengeKind::GrabPoleMimic,
                forbidden_with: vec![ChallengeKind::GrabPoleMimic.type_name().to_string()],
            },
            DuplicationRule {
                kind: ChallengeKind::MouthSpear,
                forbidden_with: vec![ChallengeKind::MouthSpear.type_name().to_string()],
            },
        ]
    }
}
