//! Spear lizards in the mouth a number of times

use rand::Rng;

use super::lifecycle::{
    flag, log_parse_error, parse_flag, parse_int, split_fields, ChallengeCore, StateDelta,
    FIELD_SEPARATOR, TYPE_SEPARATOR,
};
use super::phrase::{Phrase, Word};
use super::randomizer::{self, chance, Randomizer, INDENT_INCREMENT};
use super::setting::{SettingBox, SettingRef};
use super::{
    draw, location_suffix, one_cycle_suffix, ChallengeBehavior, ChallengeKind, Result, ANY_REGION,
};
use crate::config::{RegionCatalog, Settings};
use crate::game::{ChallengeEvent, Session, TickSignal};

/// Preset for [`MouthSpearChallenge`]
#[derive(Debug, Clone, PartialEq)]
pub struct MouthSpearRandomizer {
    pub amount: Randomizer<i32>,
    pub region: Randomizer<String>,
    pub one_cycle: Randomizer<bool>,
}

impl MouthSpearRandomizer {
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
    ) -> Result<MouthSpearChallenge> {
        let mut challenge = MouthSpearChallenge::new();
        challenge.amount.value = draw(&self.amount, rng, "amount")?;
        challenge.region.value = draw(&self.region, rng, "region")?;
        challenge.one_cycle.value = draw(&self.one_cycle, rng, "oneCycle")?;
        challenge.update_description(regions);
        Ok(challenge)
    }

    pub fn serialize(&self, indent: &str) -> String {
        let surindent = format!("{indent}{INDENT_INCREMENT}");
        randomizer::write_block(
            ChallengeKind::MouthSpear.preset_tag(),
            indent,
            &[
                ("amount", self.amount.serialize(&surindent)),
                ("region", self.region.serialize(&surindent)),
                ("oneCycle", self.one_cycle.serialize(&surindent)),
            ],
        )
    }

    pub fn deserialize(block: &str) -> Result<Self> {
        let tag = ChallengeKind::MouthSpear.preset_tag();
        let dict = randomizer::to_dict(block)?;
        Ok(Self {
            amount: randomizer::field(&dict, tag, "amount")?,
            region: randomizer::field(&dict, tag, "region")?,
            one_cycle: randomizer::field(&dict, tag, "oneCycle")?,
        })
    }
}

/// Spear lizards in the mouth
#[derive(Debug, Clone, PartialEq)]
pub struct MouthSpearChallenge {
    pub core: ChallengeCore,
    pub amount: SettingBox<i32>,
    pub one_cycle: SettingBox<bool>,
    pub region: SettingBox<String>,
    pub current: i32,
}

impl Default for MouthSpearChallenge {
    fn default() -> Self {
        Self::new()
    }
}

impl MouthSpearChallenge {
    pub const NAME: &'static str = "BingoMouthSpearChallenge";

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
        }
    }

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
        let fields = split_fields(args, Self::NAME, 6)?;

        let mut challenge = Self {
            core: ChallengeCore::new(),
            amount: SettingBox::parse(fields[0], Self::NAME)?,
            current: parse_int(fields[1], Self::NAME, "current")?,
            region: SettingBox::parse(fields[2], Self::NAME)?,
            one_cycle: SettingBox::parse(fields[3], Self::NAME)?,
        };
        challenge.core.completed = parse_flag(fields[4]);
        challenge.core.revealed = parse_flag(fields[5]);
        challenge.update_description(regions);
        Ok(challenge)
    }

    fn speared(&mut self, region: &str, session: &Session<'_>) -> StateDelta {
        let team = session.team;
        if !self.core.accepts_progress(team)
            || self.core.is_done_for(team)
            || self.core.revealed
            || (self.region.value != ANY_REGION && self.region.value != region)
        {
            return StateDelta::Ignored;
        }

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

impl ChallengeBehavior for MouthSpearChallenge {
    fn core(&self) -> &ChallengeCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ChallengeCore {
        &mut self.core
    }

    fn kind(&self) -> ChallengeKind {
        ChallengeKind::MouthSpear
    }

    fn display_name(&self) -> &'static str {
        "Spearing lizards in the mouth"
    }

    fn update_description(&mut self, regions: &RegionCatalog) {
        // <location> supplies its own leading space
        self.core.description = "Spear [<current>/<amount>] lizards in the mouth<location><onecycle>"
            .replace("<current>", &self.current.to_string())
            .replace("<amount>", &self.amount.value.to_string())
            .replace("<location>", &location_suffix(&self.region.value, regions))
            .replace("<onecycle>", one_cycle_suffix(self.one_cycle.value));
    }

    fn phrase(&self) -> Phrase {
        let mut phrase = Phrase::new(vec![vec![Word::icon("lizlick"), Word::entity_icon("Spear")]]);

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
            ChallengeEvent::Speared { region } => self.speared(region, session),
            _ => StateDelta::Ignored,
        }
    }

    fn update(&mut self, tick: TickSignal, regions: &RegionCatalog) -> StateDelta {
        if self.core.completed || !self.one_cycle.value || !tick.cycle_closing || self.current == 0 {
            return StateDelta::Ignored;
        }

        self.current = 0;
        self.update_description(regions);
        StateDelta::Expired
    }

    fn reset(&mut self, regions: &RegionCatalog) {
        self.current = 0;
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
        [
            format!("{}{TYPE_SEPARATOR}{}", Self::NAME, self.amount),
            self.current.to_string(),
            self.region.to_string(),
            self.one_cycle.to_string(),
            flag(self.core.completed).to_string(),
            flag(self.core.revealed).to_string(),
        ]
        .join(FIELD_SEPARATOR)
    }

    fn combat_required(&self) -> bool {
        true
    }
}
