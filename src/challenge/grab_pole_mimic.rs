//! Grab a number of distinct pole mimics, optionally in one region or within
//! a single cycle

use rand::Rng;

use super::lifecycle::{
    flag, log_parse_error, parse_flag, parse_int, split_fields, split_list, ChallengeCore,
    StateDelta, FIELD_SEPARATOR, LIST_SEPARATOR, TYPE_SEPARATOR,
};
use super::phrase::{Phrase, Word};
use super::randomizer::{self, chance, Randomizer, INDENT_INCREMENT};
use super::setting::{SettingBox, SettingRef};
use super::{
    draw, location_suffix, one_cycle_suffix, ChallengeBehavior, ChallengeError, ChallengeKind,
    Result, ANY_REGION,
};
use crate::config::{RegionCatalog, Settings};
use crate::game::{ChallengeEvent, EntityId, Session, TickSignal};

/// Preset for [`GrabPoleMimicChallenge`]
#[derive(Debug, Clone, PartialEq)]
pub struct GrabPoleMimicRandomizer {
    pub amount: Randomizer<i32>,
    pub region: Randomizer<String>,
    pub one_cycle: Randomizer<bool>,
}

impl GrabPoleMimicRandomizer {
    pub fn preset(settings: &Settings) -> Self {
        Self {
            amount: Randomizer::Range { min: 1, max: 4 },
            region: Randomizer::Fixed(ANY_REGION.to_string()),
            one_cycle: chance(settings.generation.one_cycle_chance),
        }
    }

    pub fn random<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        regions: &RegionCatalog,
    ) -> Result<GrabPoleMimicChallenge> {
        let mut challenge = GrabPoleMimicChallenge::new();
        challenge.amount.value = draw(&self.amount, rng, "amount")?;
        challenge.region.value = draw(&self.region, rng, "region")?;
        challenge.one_cycle.value = draw(&self.one_cycle, rng, "oneCycle")?;
        challenge.update_description(regions);
        Ok(challenge)
    }

    pub fn serialize(&self, indent: &str) -> String {
        let surindent = format!("{indent}{INDENT_INCREMENT}");
        randomizer::write_block(
            ChallengeKind::GrabPoleMimic.preset_tag(),
            indent,
            &[
                ("amount", self.amount.serialize(&surindent)),
                ("region", self.region.serialize(&surindent)),
                ("oneCycle", self.one_cycle.serialize(&surindent)),
            ],
        )
    }

    pub fn deserialize(block: &str) -> Result<Self> {
        let tag = ChallengeKind::GrabPoleMimic.preset_tag();
        let dict = randomizer::to_dict(block)?;
        Ok(Self {
            amount: randomizer::field(&dict, tag, "amount")?,
            region: randomizer::field(&dict, tag, "region")?,
            one_cycle: randomizer::field(&dict, tag, "oneCycle")?,
        })
    }
}

/// Grab pole mimics, each one counted once
#[derive(Debug, Clone, PartialEq)]
pub struct GrabPoleMimicChallenge {
    pub core: ChallengeCore,
    pub amount: SettingBox<i32>,
    pub one_cycle: SettingBox<bool>,
    pub region: SettingBox<String>,
    pub current: i32,
    pub grabbed_poles: Vec<EntityId>,
}

impl Default for GrabPoleMimicChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl GrabPoleMimicChallenge {
    pub const NAME: &'static str = "BingoGrabPoleMimicChallenge";

    pub fn new() -> Self {
        Self::with_values(0, String::new(), false)
    }

    pub fn with_values(amount: i32, region: String, one_cycle: bool) -> Self {
        Self {
            core: ChallengeCore::new(),
            amount: SettingBox::new(amount, "Amount", 0),
            one_cycle: SettingBox::new(one_cycle, "In one Cycle", 3),
            region: SettingBox::new(region, "Region", 5).with_options("regions"),
            current: 0,
            grabbed_poles: Vec::new(),
        }
    }

    /// Random challenge in any region; one-cycle challenges ask for a single mimic
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, settings: &Settings) -> Self {
        let one_cycle = rng.gen_bool(settings.generation.one_cycle_chance.clamp(0.0, 1.0));
        let amount = rng.gen_range(1..if one_cycle { 2 } else { 5 });

        let mut challenge = Self::with_values(amount, ANY_REGION.to_string(), one_cycle);
        challenge.update_description(&settings.regions);
        challenge
    }

    pub fn from_flat(args: &str, regions: &RegionCatalog) -> Result<Self> {
        Self::parse_fields(args, regions).map_err(|e| log_parse_error(Self::NAME, e))
    }

    fn parse_fields(args: &str, regions: &RegionCatalog) -> Result<Self> {
        let fields = split_fields(args, Self::NAME, 7)?;

        let grabbed_poles = split_list(fields[6])
            .map(|raw| {
                raw.parse::<EntityId>()
                    .map_err(|reason| ChallengeError::InvalidSetting {
                        challenge: Self::NAME,
                        reason,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut challenge = Self {
            core: ChallengeCore::new(),
            amount: SettingBox::parse(fields[0], Self::NAME)?,
            current: parse_int(fields[1], Self::NAME, "current")?,
            region: SettingBox::parse(fields[2], Self::NAME)?,
            one_cycle: SettingBox::parse(fields[3], Self::NAME)?,
            grabbed_poles,
        };
        challenge.core.completed = parse_flag(fields[4]);
        challenge.core.revealed = parse_flag(fields[5]);
        challenge.update_description(regions);
        Ok(challenge)
    }

    fn grabbed(&mut self, id: EntityId, region: &str, session: &Session<'_>) -> StateDelta {
        let team = session.team;
        if !self.core.accepts_progress(team)
            || self.core.is_done_for(team)
            || self.core.revealed
            || self.grabbed_poles.contains(&id)
            || (self.region.value != ANY_REGION && self.region.value != region)
        {
            return StateDelta::Ignored;
        }

        self.grabbed_poles.push(id);
        self.current = self.current.saturating_add(1);
        self.update_description(session.regions);

        if self.current >= self.amount.value {
            self.core.complete(team);
            StateDelta::Completed
        } else {
            StateDelta::Progressed
        }
    }
}

impl ChallengeBehavior for GrabPoleMimicChallenge {
    fn core(&self) -> &ChallengeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ChallengeCore {
        &mut self.core
    }

    fn kind(&self) -> ChallengeKind {
        ChallengeKind::GrabPoleMimic
    }

    fn display_name(&self) -> &'static str {
        "Grabbing Pole Mimics"
    }

    fn update_description(&mut self, regions: &RegionCatalog) {
        // <location> supplies its own leading space
        self.core.description = "Grab [<current>/<amount>] Pole Mimics<location><onecycle>"
            .replace("<current>", &self.current.to_string())
            .replace("<amount>", &self.amount.value.to_string())
            .replace("<location>", &location_suffix(&self.region.value, regions))
            .replace("<onecycle>", one_cycle_suffix(self.one_cycle.value));
    }

    fn phrase(&self) -> Phrase {
        let mut phrase = Phrase::new(vec![vec![
            Word::icon("steal_item"),
            Word::entity_icon("PoleMimic"),
        ]]);

        let mut last_line = 1;
        if self.region.value != ANY_REGION {
            phrase.insert_word(Word::verse(&self.region.value), 1);
            last_line = 2;
        }

        phrase.insert_word(
            Word::Counter {
                current: self.current,
                max: self.amount.value,
            },
            last_line,
        );
        if self.one_cycle.value {
            phrase.insert_word(Word::icon("cycle_limit"), last_line);
        }
        phrase
    }

    fn handle(&mut self, event: &ChallengeEvent, session: &Session<'_>) -> StateDelta {
        match event {
            ChallengeEvent::Grabbed { id, region } => self.grabbed(*id, region, session),
            _ => StateDelta::Ignored,
        }
    }

    /// One-cycle progress is lost when the cycle closes before completion
    fn update(&mut self, tick: TickSignal, regions: &RegionCatalog) -> StateDelta {
        if self.core.completed || !self.one_cycle.value || !tick.cycle_closing || self.current == 0 {
            return StateDelta::Ignored;
        }

        self.current = 0;
        self.grabbed_poles.clear();
        self.update_description(regions);
        StateDelta::Expired
    }

    fn reset(&mut self, regions: &RegionCatalog) {
        self.current = 0;
        self.grabbed_poles.clear();
        self.core.reset();
        self.update_description(regions);
    }

    fn settings(&self) -> Vec<SettingRef<'_>> {
        vec![
            SettingRef::Int(&self.amount),
            SettingRef::Text(&self.region),
            SettingRef::Flag(&self.one_cycle),
        ]
    }

    fn to_flat(&self) -> String {
        let grabbed: Vec<String> = self.grabbed_poles.iter().map(ToString::to_string).collect();
        [
            format!("{}{TYPE_SEPARATOR}{}", Self::NAME, self.amount),
            self.current.to_string(),
            self.region.to_string(),
            self.one_cycle.to_string(),
            flag(self.core.completed).to_string(),
            flag(self.core.revealed).to_string(),
            grabbed.join(&LIST_SEPARATOR.to_string()),
        ]
        .join(FIELD_SEPARATOR)
    }

    fn combat_required(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Team;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grabbed(number: i32, region: &str) -> ChallengeEvent {
        ChallengeEvent::Grabbed {
            id: EntityId::new(-1, number),
            region: region.to_string(),
        }
    }

    #[test]
    fn test_each_mimic_counts_once() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(3, ANY_REGION.to_string(), false);

        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Progressed);
        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Ignored);
        assert_eq!(challenge.current, 1);

        assert_eq!(challenge.handle(&grabbed(2, "HI"), &session), StateDelta::Progressed);
        assert_eq!(challenge.handle(&grabbed(3, "SU"), &session), StateDelta::Completed);
        assert!(challenge.core.completed);

        // Completed challenges stop counting
        assert_eq!(challenge.handle(&grabbed(4, "SU"), &session), StateDelta::Ignored);
        assert_eq!(challenge.current, 3);
    }

    #[test]
    fn test_region_filter() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(2, "SU".to_string(), false);

        assert_eq!(challenge.handle(&grabbed(1, "HI"), &session), StateDelta::Ignored);
        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Progressed);
        assert_eq!(challenge.core.description, "Grab [1/2] Pole Mimics in Outskirts");
    }

    #[test]
    fn test_ignores_other_events() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(2, ANY_REGION.to_string(), false);
        let event = ChallengeEvent::Speared {
            region: "SU".to_string(),
        };
        assert_eq!(challenge.handle(&event, &session), StateDelta::Ignored);
    }

    #[test]
    fn test_hidden_and_revealed_are_suppressed() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(1), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(2, ANY_REGION.to_string(), false);

        challenge.core.hidden = true;
        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Ignored);
        challenge.core.hidden = false;
        challenge.core.revealed = true;
        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Ignored);

        assert_eq!(challenge.current, 0);
        assert!(challenge.grabbed_poles.is_empty());
    }

    #[test]
    fn test_one_cycle_expires() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(2, ANY_REGION.to_string(), true);

        challenge.handle(&grabbed(1, "SU"), &session);
        assert_eq!(challenge.update(TickSignal::default(), &regions), StateDelta::Ignored);
        assert_eq!(challenge.current, 1);

        assert_eq!(challenge.update(TickSignal::cycle_closing(), &regions), StateDelta::Expired);
        assert_eq!(challenge.current, 0);
        assert!(challenge.grabbed_poles.is_empty());
        assert_eq!(
            challenge.core.description,
            "Grab [0/2] Pole Mimics in one cycle"
        );

        // The same mimic counts again next cycle
        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Progressed);
    }

    #[test]
    fn test_completed_one_cycle_keeps_progress() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(1, ANY_REGION.to_string(), true);

        challenge.handle(&grabbed(1, "SU"), &session);
        assert_eq!(challenge.update(TickSignal::cycle_closing(), &regions), StateDelta::Ignored);
        assert_eq!(challenge.current, 1);
    }

    #[test]
    fn test_reset() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(1, ANY_REGION.to_string(), false);

        challenge.handle(&grabbed(1, "SU"), &session);
        challenge.reset(&regions);
        assert_eq!(challenge.current, 0);
        assert!(challenge.grabbed_poles.is_empty());
        assert!(!challenge.core.completed);
        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Completed);
    }

    #[test]
    fn test_phrase() {
        let any = GrabPoleMimicChallenge::with_values(3, ANY_REGION.to_string(), false);
        assert_eq!(any.phrase().to_string(), "(steal_item) (PoleMimic)\n[0/3]");

        let specific = GrabPoleMimicChallenge::with_values(1, "SU".to_string(), true);
        assert_eq!(
            specific.phrase().to_string(),
            "(steal_item) (PoleMimic)\nSU\n[0/1] (cycle_limit)"
        );
    }

    #[test]
    fn test_flat_format() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let mut challenge = GrabPoleMimicChallenge::with_values(3, ANY_REGION.to_string(), false);
        challenge.handle(&grabbed(10, "SU"), &session);
        challenge.handle(&grabbed(11, "SU"), &session);

        let flat = challenge.to_flat();
        assert_eq!(
            flat,
            "BingoGrabPoleMimicChallenge~System.Int32|3|Amount|0|NULL><2\
             ><System.String|Any Region|Region|5|regions><System.Boolean|false|In one Cycle|3|NULL\
             ><0><0><ID.-1.10|ID.-1.11"
        );

        let args = flat.split_once('~').unwrap().1;
        let restored = GrabPoleMimicChallenge::from_flat(args, &regions).unwrap();
        assert_eq!(restored.to_flat(), flat);
        assert_eq!(restored.grabbed_poles, challenge.grabbed_poles);
    }

    #[test]
    fn test_counter_saturates_at_max() {
        let regions = RegionCatalog::default();
        let session = Session::new(Team::new(0), &regions);
        let args = "System.Int32|5|Amount|0|NULL><2147483647><System.String|Any Region|Region|5|regions\
                    ><System.Boolean|false|In one Cycle|3|NULL><0><0><";
        let mut challenge = GrabPoleMimicChallenge::from_flat(args, &regions).unwrap();

        assert_eq!(challenge.handle(&grabbed(1, "SU"), &session), StateDelta::Completed);
        assert_eq!(challenge.current, i32::MAX);
    }

    #[test]
    fn test_from_flat_rejects_bad_entity() {
        let regions = RegionCatalog::default();
        let args = "System.Int32|3|Amount|0|NULL><0><System.String|Any Region|Region|5|regions\
                    ><System.Boolean|false|In one Cycle|3|NULL><0><0><garbage";
        assert!(GrabPoleMimicChallenge::from_flat(args, &regions).is_err());
    }

    #[test]
    fn test_generate() {
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(8);

        for _ in 0..100 {
            let challenge = GrabPoleMimicChallenge::generate(&mut rng, &settings);
            assert_eq!(challenge.region.value, ANY_REGION);
            if challenge.one_cycle.value {
                assert_eq!(challenge.amount.value, 1);
            } else {
                assert!((1..5).contains(&challenge.amount.value));
            }
        }
    }

    #[test]
    fn test_randomizer_block() {
        let preset = GrabPoleMimicRandomizer::preset(&Settings::default());
        let block = preset.serialize("");
        assert!(block.starts_with(
            "GrabPoleMimic {\n    amount-range 1 4\n    region-fixed Any Region\n    oneCycle-weighted {\n        0.2 true\n"
        ));
        assert!(block.ends_with(" false\n    }\n}"));
        assert_eq!(GrabPoleMimicRandomizer::deserialize(&block).unwrap(), preset);
    }
}
