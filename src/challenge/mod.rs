//! Bingo challenge types
//!
//! Each challenge kind pairs a challenge (live progress plus settings) with a
//! randomizer preset that can produce it. Kinds share their lifecycle through
//! [`ChallengeCore`] and expose it through [`ChallengeBehavior`]; the
//! [`Challenge`] enum is what boards hold.

pub mod enter_regions_times;
pub mod error;
pub mod grab_pole_mimic;
pub mod lifecycle;
pub mod mouth_spear;
pub mod phrase;
pub mod randomizer;
pub mod setting;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{RegionCatalog, Settings};
use crate::game::{ChallengeEvent, EventKind, Session, Team, TickSignal};

pub use enter_regions_times::{EnterRegionsTimesChallenge, EnterRegionsTimesRandomizer};
pub use error::{ChallengeError, Result};
pub use grab_pole_mimic::{GrabPoleMimicChallenge, GrabPoleMimicRandomizer};
pub use lifecycle::{ChallengeCore, ChallengeStatus, StateDelta};
pub use mouth_spear::{MouthSpearChallenge, MouthSpearRandomizer};
pub use phrase::{Phrase, Word};
pub use randomizer::Randomizer;
pub use setting::{SettingBox, SettingRef};

/// Region filter value that matches every region
pub const ANY_REGION: &str = "Any Region";

/// The implemented challenge kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChallengeKind {
    EnterRegionsTimes,
    GrabPoleMimic,
    MouthSpear,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 3] = [
        ChallengeKind::EnterRegionsTimes,
        ChallengeKind::GrabPoleMimic,
        ChallengeKind::MouthSpear,
    ];

    /// Stable name used as the flat-form prefix
    pub fn type_name(&self) -> &'static str {
        match self {
            ChallengeKind::EnterRegionsTimes => EnterRegionsTimesChallenge::NAME,
            ChallengeKind::GrabPoleMimic => GrabPoleMimicChallenge::NAME,
            ChallengeKind::MouthSpear => MouthSpearChallenge::NAME,
        }
    }

    /// Tag used on randomizer preset blocks
    pub fn preset_tag(&self) -> &'static str {
        match self {
            ChallengeKind::EnterRegionsTimes => "EnterRegionsTimes",
            ChallengeKind::GrabPoleMimic => "GrabPoleMimic",
            ChallengeKind::MouthSpear => "MouthSpear",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }

    pub fn from_preset_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.preset_tag() == tag)
    }

    /// Host extension points this kind listens on
    pub fn hooks(&self) -> &'static [EventKind] {
        match self {
            ChallengeKind::EnterRegionsTimes => &[EventKind::WorldLoaded],
            ChallengeKind::GrabPoleMimic => &[EventKind::PoleMimicClimbed],
            ChallengeKind::MouthSpear => &[EventKind::LizardSpeared],
        }
    }
}

/// Operations every challenge kind supports
pub trait ChallengeBehavior {
    fn core(&self) -> &ChallengeCore;

    fn core_mut(&mut self) -> &mut ChallengeCore;

    fn kind(&self) -> ChallengeKind;

    /// Human-readable name of the challenge kind
    fn display_name(&self) -> &'static str;

    /// Recompute the cached description from the current state
    fn update_description(&mut self, regions: &RegionCatalog);

    /// Build the presentation phrase from the current state
    fn phrase(&self) -> Phrase;

    /// Apply an event for the session's team
    fn handle(&mut self, event: &ChallengeEvent, session: &Session<'_>) -> StateDelta;

    /// Per-tick update
    fn update(&mut self, _tick: TickSignal, _regions: &RegionCatalog) -> StateDelta {
        StateDelta::Ignored
    }

    /// Return to the active state with all progress cleared
    fn reset(&mut self, regions: &RegionCatalog);

    /// Settings in declaration order
    fn settings(&self) -> Vec<SettingRef<'_>>;

    /// Flat save/sync form, including the type prefix
    fn to_flat(&self) -> String;

    fn points(&self) -> i32 {
        20
    }

    fn combat_required(&self) -> bool;

    /// Check if the challenge can be played as the given character
    fn valid_for(&self, _character: &str) -> bool {
        true
    }
}

/// A challenge of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum Challenge {
    EnterRegionsTimes(EnterRegionsTimesChallenge),
    GrabPoleMimic(GrabPoleMimicChallenge),
    MouthSpear(MouthSpearChallenge),
}

impl Challenge {
    /// Generate a random challenge of the given kind
    pub fn generate<R: Rng + ?Sized>(kind: ChallengeKind, rng: &mut R, settings: &Settings) -> Self {
        match kind {
            ChallengeKind::EnterRegionsTimes => {
                Challenge::EnterRegionsTimes(EnterRegionsTimesChallenge::generate(rng, settings))
            }
            ChallengeKind::GrabPoleMimic => {
                Challenge::GrabPoleMimic(GrabPoleMimicChallenge::generate(rng, settings))
            }
            ChallengeKind::MouthSpear => {
                Challenge::MouthSpear(MouthSpearChallenge::generate(rng, settings))
            }
        }
    }

    /// Restore a challenge from its flat form, dispatching on the type prefix
    pub fn from_flat(text: &str, regions: &RegionCatalog) -> Result<Self> {
        let (name, args) = text
            .split_once(lifecycle::TYPE_SEPARATOR)
            .ok_or_else(|| ChallengeError::UnknownChallenge(text.to_string()))?;

        match ChallengeKind::from_type_name(name) {
            Some(ChallengeKind::EnterRegionsTimes) => {
                EnterRegionsTimesChallenge::from_flat(args, regions).map(Challenge::EnterRegionsTimes)
            }
            Some(ChallengeKind::GrabPoleMimic) => {
                GrabPoleMimicChallenge::from_flat(args, regions).map(Challenge::GrabPoleMimic)
            }
            Some(ChallengeKind::MouthSpear) => {
                MouthSpearChallenge::from_flat(args, regions).map(Challenge::MouthSpear)
            }
            None => {
                log::error!("Unknown challenge type '{name}'");
                Err(ChallengeError::UnknownChallenge(name.to_string()))
            }
        }
    }

    pub fn behavior(&self) -> &dyn ChallengeBehavior {
        match self {
            Challenge::EnterRegionsTimes(c) => c,
            Challenge::GrabPoleMimic(c) => c,
            Challenge::MouthSpear(c) => c,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn ChallengeBehavior {
        match self {
            Challenge::EnterRegionsTimes(c) => c,
            Challenge::GrabPoleMimic(c) => c,
            Challenge::MouthSpear(c) => c,
        }
    }

    pub fn kind(&self) -> ChallengeKind {
        self.behavior().kind()
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    pub fn description(&self) -> &str {
        &self.behavior().core().description
    }

    pub fn status(&self, team: Team) -> ChallengeStatus {
        self.behavior().core().status(team)
    }

    pub fn handle(&mut self, event: &ChallengeEvent, session: &Session<'_>) -> StateDelta {
        self.behavior_mut().handle(event, session)
    }

    pub fn update(&mut self, tick: TickSignal, regions: &RegionCatalog) -> StateDelta {
        self.behavior_mut().update(tick, regions)
    }

    pub fn reset(&mut self, regions: &RegionCatalog) {
        self.behavior_mut().reset(regions);
    }

    pub fn to_flat(&self) -> String {
        self.behavior().to_flat()
    }

    pub fn phrase(&self) -> Phrase {
        self.behavior().phrase()
    }

    /// Hide or show progress for the local team
    pub fn set_hidden(&mut self, hidden: bool) {
        self.behavior_mut().core_mut().hidden = hidden;
    }

    /// Lock in the completion so other teams can see it
    pub fn reveal(&mut self) {
        self.behavior_mut().core_mut().revealed = true;
    }

    /// Check if this challenge may share a board with `other`
    pub fn duplicable(&self, other: &Challenge, settings: &Settings) -> bool {
        settings.allows_together(self.kind(), other.type_name())
            && settings.allows_together(other.kind(), self.type_name())
    }
}

/// A randomizer preset of any kind
#[derive(Debug, Clone, PartialEq)]
pub enum ChallengeRandomizer {
    EnterRegionsTimes(EnterRegionsTimesRandomizer),
    GrabPoleMimic(GrabPoleMimicRandomizer),
    MouthSpear(MouthSpearRandomizer),
}

impl ChallengeRandomizer {
    /// Preset that mirrors [`Challenge::generate`] for the kind
    pub fn preset(kind: ChallengeKind, settings: &Settings) -> Self {
        match kind {
            ChallengeKind::EnterRegionsTimes => {
                ChallengeRandomizer::EnterRegionsTimes(EnterRegionsTimesRandomizer::preset(settings))
            }
            ChallengeKind::GrabPoleMimic => {
                ChallengeRandomizer::GrabPoleMimic(GrabPoleMimicRandomizer::preset(settings))
            }
            ChallengeKind::MouthSpear => {
                ChallengeRandomizer::MouthSpear(MouthSpearRandomizer::preset(settings))
            }
        }
    }

    pub fn kind(&self) -> ChallengeKind {
        match self {
            ChallengeRandomizer::EnterRegionsTimes(_) => ChallengeKind::EnterRegionsTimes,
            ChallengeRandomizer::GrabPoleMimic(_) => ChallengeKind::GrabPoleMimic,
            ChallengeRandomizer::MouthSpear(_) => ChallengeKind::MouthSpear,
        }
    }

    /// Draw a challenge from this preset
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R, regions: &RegionCatalog) -> Result<Challenge> {
        match self {
            ChallengeRandomizer::EnterRegionsTimes(r) => {
                r.random(rng, regions).map(Challenge::EnterRegionsTimes)
            }
            ChallengeRandomizer::GrabPoleMimic(r) => r.random(rng, regions).map(Challenge::GrabPoleMimic),
            ChallengeRandomizer::MouthSpear(r) => r.random(rng, regions).map(Challenge::MouthSpear),
        }
    }

    /// Serialize as a preset block at the given indentation
    pub fn serialize(&self, indent: &str) -> String {
        match self {
            ChallengeRandomizer::EnterRegionsTimes(r) => r.serialize(indent),
            ChallengeRandomizer::GrabPoleMimic(r) => r.serialize(indent),
            ChallengeRandomizer::MouthSpear(r) => r.serialize(indent),
        }
    }

    /// Restore a preset block, dispatching on its type tag
    pub fn deserialize(block: &str) -> Result<Self> {
        let tag = randomizer::block_type(block)
            .ok_or_else(|| ChallengeError::InvalidRandomizer(block.to_string()))?;

        match ChallengeKind::from_preset_tag(tag) {
            Some(ChallengeKind::EnterRegionsTimes) => {
                EnterRegionsTimesRandomizer::deserialize(block).map(ChallengeRandomizer::EnterRegionsTimes)
            }
            Some(ChallengeKind::GrabPoleMimic) => {
                GrabPoleMimicRandomizer::deserialize(block).map(ChallengeRandomizer::GrabPoleMimic)
            }
            Some(ChallengeKind::MouthSpear) => {
                MouthSpearRandomizer::deserialize(block).map(ChallengeRandomizer::MouthSpear)
            }
            None => Err(ChallengeError::UnknownChallenge(tag.to_string())),
        }
    }
}

/// ` in <region name>` for a specific region, empty for any region
pub(crate) fn location_suffix(region: &str, regions: &RegionCatalog) -> String {
    if region == ANY_REGION {
        String::new()
    } else {
        format!(" in {}", regions.full_name(region))
    }
}

pub(crate) fn one_cycle_suffix(one_cycle: bool) -> &'static str {
    if one_cycle {
        " in one cycle"
    } else {
        ""
    }
}

/// Draw a value or report which preset field could not produce one
pub(crate) fn draw<T, R>(randomizer: &Randomizer<T>, rng: &mut R, field: &str) -> Result<T>
where
    T: randomizer::RandomValue,
    R: Rng + ?Sized,
{
    randomizer
        .random(rng)
        .ok_or_else(|| ChallengeError::InvalidRandomizer(format!("{field}: no values to draw from")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ChallengeKind::ALL {
            assert_eq!(ChallengeKind::from_type_name(kind.type_name()), Some(kind));
            assert_eq!(ChallengeKind::from_preset_tag(kind.preset_tag()), Some(kind));
        }
        assert_eq!(ChallengeKind::from_type_name("BingoAllRegionsExcept"), None);
    }

    #[test]
    fn test_flat_dispatch() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(3);

        for kind in ChallengeKind::ALL {
            let challenge = Challenge::generate(kind, &mut rng, &settings);
            let flat = challenge.to_flat();
            assert!(flat.starts_with(kind.type_name()));

            let restored = Challenge::from_flat(&flat, &settings.regions).unwrap();
            assert_eq!(restored.kind(), kind);
            assert_eq!(restored.to_flat(), flat);
            assert_eq!(restored.description(), challenge.description());
        }
    }

    #[test]
    fn test_flat_dispatch_rejects_unknown() {
        let regions = RegionCatalog::default();
        assert!(matches!(
            Challenge::from_flat("BingoAllRegionsExcept~x", &regions),
            Err(ChallengeError::UnknownChallenge(_))
        ));
        assert!(Challenge::from_flat("no separator", &regions).is_err());
    }

    #[test]
    fn test_preset_dispatch() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(5);

        for kind in ChallengeKind::ALL {
            let preset = ChallengeRandomizer::preset(kind, &settings);
            let block = preset.serialize("");
            let restored = ChallengeRandomizer::deserialize(&block).unwrap();
            assert_eq!(restored, preset);
            assert_eq!(restored.random(&mut rng, &settings.regions).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_duplicable_uses_rules() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mimic = Challenge::generate(ChallengeKind::GrabPoleMimic, &mut rng, &settings);
        let other_mimic = Challenge::generate(ChallengeKind::GrabPoleMimic, &mut rng, &settings);
        let regions = Challenge::generate(ChallengeKind::EnterRegionsTimes, &mut rng, &settings);
        let other_regions = Challenge::generate(ChallengeKind::EnterRegionsTimes, &mut rng, &settings);

        assert!(!mimic.duplicable(&other_mimic, &settings));
        assert!(mimic.duplicable(&regions, &settings));
        assert!(regions.duplicable(&other_regions, &settings));
    }

    #[test]
    fn test_hidden_and_reveal() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut challenge = Challenge::generate(ChallengeKind::MouthSpear, &mut rng, &settings);

        challenge.set_hidden(true);
        assert!(challenge.behavior().core().hidden);
        challenge.reveal();
        assert!(challenge.behavior().core().revealed);
    }
}
