//! Enter a region (or distinct regions) between a minimum and maximum number
//! of times
//!
//! Reaching the minimum completes the challenge; going over the maximum after
//! completing fails it for the acting team.

use rand::Rng;

use super::lifecycle::{
    flag, log_parse_error, parse_flag, parse_int, split_fields, split_list, ChallengeCore,
    StateDelta, FIELD_SEPARATOR, LIST_SEPARATOR, TYPE_SEPARATOR,
};
use super::phrase::{Color, Phrase, Word};
use super::randomizer::{self, Randomizer, INDENT_INCREMENT};
use super::setting::{SettingBox, SettingRef};
use super::{draw, ChallengeBehavior, ChallengeKind, Result, ANY_REGION};
use crate::config::{RegionCatalog, Settings};
use crate::game::{ChallengeEvent, Session};

/// Option list the region picker draws from
const REGION_OPTIONS: &str = "regionsreal";

/// Option list recorded on generated challenges
const GENERATED_REGION_OPTIONS: &str = "regions";

/// Preset for [`EnterRegionsTimesChallenge`]
#[derive(Debug, Clone, PartialEq)]
pub struct EnterRegionsTimesRandomizer {
    pub region: Randomizer<String>,
    pub min: Randomizer<i32>,
    pub max: Randomizer<i32>,
}

impl EnterRegionsTimesRandomizer {
    /// Preset matching [`EnterRegionsTimesChallenge::generate`], without the
    /// doubled maximum for any-region challenges
    pub fn preset(settings: &Settings) -> Self {
        let codes = settings.regions.codes();
        let any = settings.generation.any_region_chance;
        let each = if codes.is_empty() {
            0.0
        } else {
            (1.0 - any) / codes.len() as f64
        };

        let mut regions = vec![(any, ANY_REGION.to_string())];
        regions.extend(codes.into_iter().map(|code| (each, code.to_string())));

        Self {
            region: Randomizer::Weighted(regions),
            min: Randomizer::Range { min: 1, max: 2 },
            max: Randomizer::Range { min: 3, max: 5 },
        }
    }

    pub fn random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        regions: &RegionCatalog,
    ) -> Result<EnterRegionsTimesChallenge> {
        let mut challenge = EnterRegionsTimesChallenge::new();
        challenge.region.value = draw(&self.region, rng, "region")?;
        challenge.min.value = draw(&self.min, rng, "min")?;
        challenge.max.value = draw(&self.max, rng, "max")?;
        challenge.update_description(regions);
        Ok(challenge)
    }

    pub fn serialize(&self, indent: &str) -> String {
        let surindent = format!("{indent}{INDENT_INCREMENT}");
        randomizer::write_block(
            ChallengeKind::EnterRegionsTimes.preset_tag(),
            indent,
            &[
                ("region", self.region.serialize(&surindent)),
                ("min", self.min.serialize(&surindent)),
                ("max", self.max.serialize(&surindent)),
            ],
        )
    }

    pub fn deserialize(block: &str) -> Result<Self> {
        let tag = ChallengeKind::EnterRegionsTimes.preset_tag();
        let dict = randomizer::to_dict(block)?;
        Ok(Self {
            region: randomizer::field(&dict, tag, "region")?,
            min: randomizer::field(&dict, tag, "min")?,
            max: randomizer::field(&dict, tag, "max")?,
        })
    }
}

/// Enter regions a limited amount of times
#[derive(Debug, Clone, PartialEq)]
pub struct EnterRegionsTimesChallenge {
    pub core: ChallengeCore,
    /// Region code, or [`ANY_REGION`] to count distinct regions
    pub region: SettingBox<String>,
    pub min: SettingBox<i32>,
    pub max: SettingBox<i32>,
    /// Regions already counted (any-region mode only)
    pub entered_regions: Vec<String>,
    pub current: i32,
}

impl Default for EnterRegionsTimesChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl EnterRegionsTimesChallenge {
    pub const NAME: &'static str = "BingoEnterRegionsTimesChallenge";

    pub fn new() -> Self {
        Self::with_values(String::new(), 0, 0)
    }

    /// Build a challenge with explicit tunables and no progress
    pub fn with_values(region: String, min: i32, max: i32) -> Self {
        Self {
            core: ChallengeCore::new(),
            region: SettingBox::new(region, "Region", 0).with_options(REGION_OPTIONS),
            min: SettingBox::new(min, "Minimum", 1),
            max: SettingBox::new(max, "Maximum", 2),
            entered_regions: Vec::new(),
            current: 0,
        }
    }

    /// Random challenge: any region half the time, otherwise a random region
    /// from the catalogue. Any-region challenges get twice the maximum.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, settings: &Settings) -> Self {
        let codes = settings.regions.codes();
        let any_region =
            codes.is_empty() || rng.gen_bool(settings.generation.any_region_chance.clamp(0.0, 1.0));
        let region = if any_region {
            ANY_REGION.to_string()
        } else {
            codes[rng.gen_range(0..codes.len())].to_string()
        };

        let mut max = rng.gen_range(3..6);
        let min = rng.gen_range(1..3);
        if any_region {
            max *= 2;
        }

        let mut challenge = Self::with_values(region, min, max);
        challenge.region.options = Some(GENERATED_REGION_OPTIONS.to_string());
        challenge.update_description(&settings.regions);
        challenge
    }

    /// Restore from the flat fields following the type prefix
    pub fn from_flat(args: &str, regions: &RegionCatalog) -> Result<Self> {
        Self::parse_fields(args, regions).map_err(|e| log_parse_error(Self::NAME, e))
    }

    fn parse_fields(args: &str, regions: &RegionCatalog) -> Result<Self> {
        let fields = split_fields(args, Self::NAME, 7)?;

        let mut challenge = Self {
            core: ChallengeCore::new(),
            region: SettingBox::parse(fields[0], Self::NAME)?,
            entered_regions: split_list(fields[1]).map(str::to_string).collect(),
            current: parse_int(fields[2], Self::NAME, "current")?,
            min: SettingBox::parse(fields[3], Self::NAME)?,
            max: SettingBox::parse(fields[4], Self::NAME)?,
        };
        challenge.core.completed = parse_flag(fields[5]);
        challenge.core.revealed = parse_flag(fields[6]);
        challenge.update_description(regions);
        Ok(challenge)
    }

    fn entered(&mut self, region: &str, session: &Session<'_>) -> StateDelta {
        let team = session.team;
        if !self.core.accepts_progress(team) {
            return StateDelta::Ignored;
        }

        if self.region.value == ANY_REGION {
            if self.entered_regions.iter().any(|r| r == region) {
                return StateDelta::Ignored;
            }
            self.entered_regions.push(region.to_string());
        } else if self.region.value != region {
            return StateDelta::Ignored;
        }
        self.current = self.current.saturating_add(1);

        self.update_description(session.regions);
        if self.core.is_done_for(team) {
            if self.current > self.max.value {
                self.core.fail(team);
                return StateDelta::Failed(team);
            }
            return StateDelta::Progressed;
        }

        if !self.core.revealed && self.current >= self.min.value {
            self.core.complete(team);
            return StateDelta::Completed;
        }
        StateDelta::Progressed
    }
}

impl ChallengeBehavior for EnterRegionsTimesChallenge {
    fn core(&self) -> &ChallengeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ChallengeCore {
        &mut self.core
    }

    fn kind(&self) -> ChallengeKind {
        ChallengeKind::EnterRegionsTimes
    }

    fn display_name(&self) -> &'static str {
        "Entering regions for a limited amount of times"
    }

    fn update_description(&mut self, regions: &RegionCatalog) {
        let target = if self.region.value == ANY_REGION {
            "unvisited regions"
        } else {
            regions.full_name(&self.region.value)
        };

        self.core.description = format!("Enter {target} <min><<current><<max> times")
            .replace("<min>", &self.min.value.to_string())
            .replace("<current>", &self.current.to_string())
            .replace("<max>", &self.max.value.to_string());
    }

    fn phrase(&self) -> Phrase {
        let mut phrase = Phrase::new(vec![
            vec![
                Word::Icon {
                    name: "keyShiftA".to_string(),
                    scale: 1.0,
                    color: Color::CYAN,
                    rotation: 90,
                },
                Word::verse("<>"),
            ],
            vec![Word::Range {
                min: self.min.value,
                current: self.current,
                max: self.max.value,
            }],
        ]);

        phrase.push_word(if self.region.value == ANY_REGION {
            Word::icon("TravellerA")
        } else {
            Word::verse(&self.region.value)
        });
        phrase
    }

    fn handle(&mut self, event: &ChallengeEvent, session: &Session<'_>) -> StateDelta {
        match event {
            ChallengeEvent::Entered { region } => self.entered(region, session),
            _ => StateDelta::Ignored,
        }
    }

    fn reset(&mut self, regions: &RegionCatalog) {
        self.core.reset();
        self.current = 0;
        self.entered_regions.clear();
        self.update_description(regions);
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![
            SettingRef::Text(&self.region),
            SettingRef::Int(&self.min),
            SettingRef::Int(&self.max),
        ]
    }

    fn to_flat(&self) -> String {
        let entered = self.entered_regions.join(&LIST_SEPARATOR.to_string());
        [
            format!("{}{TYPE_SEPARATOR}{}", Self::NAME, self.region),
            entered,
            self.current.to_string(),
            self.min.to_string(),
            self.max.to_string(),
            flag(self.core.completed).to_string(),
            flag(self.core.revealed).to_string(),
        ]
        .join(FIELD_SEPARATOR)
    }

    fn combat_required(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeStatus;
    use crate::game::Team;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entered(region: &str) -> ChallengeEvent {
        ChallengeEvent::Entered {
            region: region.to_string(),
        }
    }

    #[test]
    fn test_specific_region_scenario() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = EnterRegionsTimesChallenge::with_values("SU".to_string(), 1, 4);

        assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Completed);
        assert_eq!(challenge.current, 1);
        assert!(challenge.core.completed);

        assert_eq!(challenge.handle(&entered("HI"), &session), StateDelta::Ignored);
        assert_eq!(challenge.current, 1);

        for _ in 0..3 {
            assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Progressed);
        }
        assert_eq!(challenge.current, 4);

        assert_eq!(
            challenge.handle(&entered("SU"), &session),
            StateDelta::Failed(Team::new(0))
        );
        assert_eq!(challenge.current, 5);
        assert_eq!(challenge.core.status(Team::new(0)), ChallengeStatus::Failed);

        // Failed teams stop counting
        assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Ignored);
        assert_eq!(challenge.current, 5);
    }

    #[test]
    fn test_completes_exactly_once() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = EnterRegionsTimesChallenge::with_values("SU".to_string(), 2, 10);

        let deltas: Vec<StateDelta> = (0..5)
            .map(|_| challenge.handle(&entered("SU"), &session))
            .collect();
        let completions = deltas.iter().filter(|d| **d == StateDelta::Completed).count();
        assert_eq!(completions, 1);
        assert_eq!(deltas[1], StateDelta::Completed);
    }

    #[test]
    fn test_revealed_does_not_complete() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = EnterRegionsTimesChallenge::with_values("SU".to_string(), 1, 4);
        challenge.core.revealed = true;

        assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Progressed);
        assert!(!challenge.core.completed);
    }

    #[test]
    fn test_any_region_counts_distinct() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = EnterRegionsTimesChallenge::with_values(ANY_REGION.to_string(), 3, 6);

        challenge.handle(&entered("SU"), &session);
        challenge.handle(&entered("SU"), &session);
        assert_eq!(challenge.current, 1);
        assert_eq!(challenge.entered_regions, vec!["SU".to_string()]);

        challenge.handle(&entered("HI"), &session);
        assert_eq!(challenge.current, 2);
    }

    #[test]
    fn test_guards_leave_state_untouched() {
        let regions = RegionCatalog::default();
        let mut challenge = EnterRegionsTimesChallenge::with_values(ANY_REGION.to_string(), 1, 4);
        let before = challenge.clone();

        let spectator = Session::new(Team::NONE, &regions);
        assert_eq!(challenge.handle(&entered("SU"), &spectator), StateDelta::Ignored);
        assert_eq!(challenge, before);

        let session = Session::new(Team::new(2), &regions);
        challenge.core.hidden = true;
        assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Ignored);
        assert_eq!(challenge.current, 0);
        assert!(challenge.entered_regions.is_empty());

        challenge.core.hidden = false;
        challenge.core.teams.mark_failed(Team::new(2));
        assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Ignored);
        assert_eq!(challenge.current, 0);
        assert!(!challenge.core.completed);
    }

    #[test]
    fn test_reset_clears_progress() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = EnterRegionsTimesChallenge::with_values(ANY_REGION.to_string(), 1, 4);

        challenge.handle(&entered("SU"), &session);
        assert!(challenge.core.completed);

        challenge.reset(&regions);
        assert_eq!(challenge.current, 0);
        assert!(challenge.entered_regions.is_empty());
        assert!(!challenge.core.completed);
        assert_eq!(challenge.core.description, "Enter unvisited regions 1<0<4 times");

        assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Completed);
        assert_eq!(challenge.current, 1);
    }

    #[test]
    fn test_description() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = EnterRegionsTimesChallenge::with_values("SU".to_string(), 2, 4);
        challenge.update_description(&regions);
        assert_eq!(challenge.core.description, "Enter Outskirts 2<0<4 times");

        challenge.handle(&entered("SU"), &session);
        assert_eq!(challenge.core.description, "Enter Outskirts 2<1<4 times");
    }

    #[test]
    fn test_phrase() {
        let any = EnterRegionsTimesChallenge::with_values(ANY_REGION.to_string(), 1, 6);
        assert_eq!(any.phrase().to_string(), "(keyShiftA) <> (TravellerA)\n[1<0<6]");

        let specific = EnterRegionsTimesChallenge::with_values("SU".to_string(), 1, 4);
        assert_eq!(specific.phrase().to_string(), "(keyShiftA) <> SU\n[1<0<4]");
    }

    #[test]
    fn test_flat_format() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = EnterRegionsTimesChallenge::with_values(ANY_REGION.to_string(), 1, 6);
        challenge.handle(&entered("SU"), &session);
        challenge.handle(&entered("HI"), &session);

        let flat = challenge.to_flat();
        assert_eq!(
            flat,
            "BingoEnterRegionsTimesChallenge~System.String|Any Region|Region|0|regionsreal\
             ><SU|HI><2><System.Int32|1|Minimum|1|NULL><System.Int32|6|Maximum|2|NULL><1><0>"
        );

        let args = flat.split_once('~').unwrap().1;
        let restored = EnterRegionsTimesChallenge::from_flat(args, &regions).unwrap();
        assert_eq!(restored.to_flat(), flat);
        assert_eq!(restored.entered_regions, challenge.entered_regions);
        assert_eq!(restored.core.description, challenge.core.description);
    }

    #[test]
    fn test_flat_empty_seen_set() {
        let regions = RegionCatalog::default();
        let challenge = EnterRegionsTimesChallenge::with_values("SU".to_string(), 1, 4);
        let flat = challenge.to_flat();
        let args = flat.split_once('~').unwrap().1;

        let restored = EnterRegionsTimesChallenge::from_flat(args, &regions).unwrap();
        assert!(restored.entered_regions.is_empty());
        assert_eq!(restored.to_flat(), flat);
    }

    #[test]
    fn test_generated_flat_form() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(21);
        let challenge = EnterRegionsTimesChallenge::generate(&mut rng, &settings);

        let flat = challenge.to_flat();
        assert_eq!(
            flat,
            format!(
                "BingoEnterRegionsTimesChallenge~System.String|{}|Region|0|regions\
                 ><><0><System.Int32|{}|Minimum|1|NULL><System.Int32|{}|Maximum|2|NULL><0><0>",
                challenge.region.value, challenge.min.value, challenge.max.value
            )
        );

        let args = flat.split_once('~').unwrap().1;
        let restored = EnterRegionsTimesChallenge::from_flat(args, &settings.regions).unwrap();
        assert_eq!(restored.region.options.as_deref(), Some("regions"));
        assert_eq!(
            EnterRegionsTimesChallenge::new().region.options.as_deref(),
            Some("regionsreal")
        );
    }

    #[test]
    fn test_counter_saturates_at_max() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let args = "System.String|SU|Region|0|regionsreal><><2147483647\
                    ><System.Int32|1|Minimum|1|NULL><System.Int32|4|Maximum|2|NULL><0><0>";
        let mut challenge = EnterRegionsTimesChallenge::from_flat(args, &regions).unwrap();

        assert_eq!(challenge.handle(&entered("SU"), &session), StateDelta::Completed);
        assert_eq!(challenge.current, i32::MAX);
        assert_eq!(
            challenge.handle(&entered("SU"), &session),
            StateDelta::Failed(Team::new(0))
        );
        assert_eq!(challenge.current, i32::MAX);
    }

    #[test]
    fn test_from_flat_errors() {
        let regions = RegionCatalog::default();
        assert!(EnterRegionsTimesChallenge::from_flat("a><b", &regions).is_err());

        let bad_count = "System.String|SU|Region|0|regionsreal><><x><System.Int32|1|Minimum|1|NULL>\
                         <System.Int32|4|Maximum|2|NULL><0><0>";
        assert!(EnterRegionsTimesChallenge::from_flat(bad_count, &regions).is_err());
    }

    #[test]
    fn test_generate_ranges() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let challenge = EnterRegionsTimesChallenge::generate(&mut rng, &settings);
            assert!((1..3).contains(&challenge.min.value));
            if challenge.region.value == ANY_REGION {
                assert!([6, 8, 10].contains(&challenge.max.value));
            } else {
                assert!((3..6).contains(&challenge.max.value));
                assert!(settings.regions.codes().contains(&challenge.region.value.as_str()));
            }
            assert!(!challenge.core.description.is_empty());
        }
    }

    #[test]
    fn test_randomizer_block() {
        let settings = Settings::default();
        let preset = EnterRegionsTimesRandomizer::preset(&settings);
        let block = preset.serialize("");
        assert!(block.starts_with("EnterRegionsTimes {\n    region-weighted {\n        0.5 Any Region\n"));
        assert!(block.contains("\n    min-range 1 2\n    max-range 3 5\n}"));

        let restored = EnterRegionsTimesRandomizer::deserialize(&block).unwrap();
        assert_eq!(restored, preset);
    }

    #[test]
    fn test_randomizer_block_is_order_independent() {
        let block = "EnterRegionsTimes {\n    max-fixed 4\n    region-fixed SU\n    min-fixed 1\n}";
        let preset = EnterRegionsTimesRandomizer::deserialize(block).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let challenge = preset.random(&mut rng, &RegionCatalog::default()).unwrap();

        assert_eq!(challenge.region.value, "SU");
        assert_eq!(challenge.min.value, 1);
        assert_eq!(challenge.max.value, 4);
        assert_eq!(challenge.core.description, "Enter Outskirts 1<0<4 times");
    }

    #[test]
    fn test_randomizer_missing_field() {
        let block = "EnterRegionsTimes {\n    region-fixed SU\n    min-fixed 1\n}";
        assert!(EnterRegionsTimesRandomizer::deserialize(block).is_err());
    }

    #[test]
    fn test_settings_positions() {
        let challenge = EnterRegionsTimesChallenge::new();
        let positions: Vec<u32> = challenge.settings().iter().map(|s| s.position()).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(challenge.points(), 20);
        assert!(!challenge.combat_required());
    }
}
