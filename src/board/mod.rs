//! Bingo board
//!
//! The board owns the ordered list of live challenges, keeps the hook
//! registry in sync with it, and routes host events and ticks to every
//! challenge of a subscribed kind.

pub mod hooks;
pub mod snapshot;

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

use crate::challenge::{Challenge, ChallengeError, ChallengeKind, Result, StateDelta};
use crate::config::{RegionCatalog, Settings};
use crate::game::{GameEvent, Session, TickSignal};

pub use hooks::HookRegistry;
pub use snapshot::{BoardSnapshot, ChallengeRecord, SNAPSHOT_VERSION};

/// Ordered collection of live challenges
#[derive(Debug, Clone, Default)]
pub struct Board {
    challenges: Vec<Challenge>,
    hooks: HookRegistry,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board from existing challenges, installing their hooks
    pub fn with_challenges(challenges: Vec<Challenge>) -> Self {
        let mut board = Self::new();
        for challenge in challenges {
            board.push(challenge);
        }
        board
    }

    /// Generate a random board respecting the duplication rules
    ///
    /// A slot is skipped when no compatible kind turns up within the
    /// configured number of attempts.
    pub fn generate<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Self {
        let mut board = Self::new();
        let weights = &settings.board.kind_weights;

        let picker = match WeightedIndex::new(weights.iter().map(|w| w.weight)) {
            Ok(picker) => picker,
            Err(e) => {
                log::warn!("Cannot generate board: {e}");
                return board;
            }
        };

        for slot in 0..settings.board.size {
            let mut placed = false;
            for _ in 0..settings.board.max_attempts {
                let kind = weights[picker.sample(rng)].kind;
                let candidate = Challenge::generate(kind, rng, settings);
                if board
                    .challenges
                    .iter()
                    .all(|existing| candidate.duplicable(existing, settings))
                {
                    board.push(candidate);
                    placed = true;
                    break;
                }
            }
            if !placed {
                log::warn!("No compatible challenge for slot {slot}");
            }
        }

        log::info!("Generated board with {} challenges", board.len());
        board
    }

    /// Add a challenge to the end of the board
    pub fn push(&mut self, challenge: Challenge) {
        self.hooks.add_hooks(challenge.kind());
        self.challenges.push(challenge);
    }

    /// Remove the challenge at `index`
    pub fn remove(&mut self, index: usize) -> Option<Challenge> {
        if index >= self.challenges.len() {
            return None;
        }
        let challenge = self.challenges.remove(index);
        self.hooks.remove_hooks(challenge.kind());
        Some(challenge)
    }

    /// Discard every challenge and hook
    pub fn clear(&mut self) {
        self.challenges.clear();
        self.hooks.clear();
    }

    pub fn challenges(&self) -> &[Challenge] {
        &self.challenges
    }

    pub fn get(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Challenge> {
        self.challenges.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Route a host event to every challenge of a subscribed kind
    ///
    /// Returns the index and delta of each challenge the event changed.
    pub fn dispatch(&mut self, event: &GameEvent, session: &Session<'_>) -> Vec<(usize, StateDelta)> {
        let hook = event.kind();
        if !self.hooks.is_hooked(hook) {
            return Vec::new();
        }
        let Some(challenge_event) = event.trigger() else {
            return Vec::new();
        };

        let kinds: Vec<ChallengeKind> = self.hooks.subscribers(hook).collect();
        let mut changes = Vec::new();
        for (index, challenge) in self.challenges.iter_mut().enumerate() {
            if !kinds.contains(&challenge.kind()) {
                continue;
            }
            let delta = challenge.handle(&challenge_event, session);
            if delta.is_change() {
                log::debug!("{} #{index}: {delta:?}", challenge.type_name());
                changes.push((index, delta));
            }
        }
        changes
    }

    /// Per-tick update for every challenge
    pub fn update(&mut self, tick: TickSignal, regions: &RegionCatalog) -> Vec<(usize, StateDelta)> {
        self.challenges
            .iter_mut()
            .enumerate()
            .filter_map(|(index, challenge)| {
                let delta = challenge.update(tick, regions);
                delta.is_change().then_some((index, delta))
            })
            .collect()
    }

    /// Start a new attempt on the same board
    pub fn reset(&mut self, regions: &RegionCatalog) {
        for challenge in &mut self.challenges {
            challenge.reset(regions);
        }
        log::info!("Board reset");
    }

    /// Flat form of every challenge, in board order
    pub fn to_flat_lines(&self) -> Vec<String> {
        self.challenges.iter().map(Challenge::to_flat).collect()
    }

    /// Restore a board from flat lines. Any corrupt line aborts the load.
    pub fn from_flat_lines<S: AsRef<str>>(lines: &[S], regions: &RegionCatalog) -> Result<Self> {
        let challenges = lines
            .iter()
            .map(|line| Challenge::from_flat(line.as_ref(), regions))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::with_challenges(challenges))
    }

    /// Versioned snapshot of the board
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::new(
            self.challenges
                .iter()
                .map(|c| ChallengeRecord {
                    kind: c.kind(),
                    state: c.to_flat(),
                    hidden: c.behavior().core().hidden,
                })
                .collect(),
        )
    }

    /// Restore a board from a snapshot
    pub fn restore(snapshot: &BoardSnapshot, regions: &RegionCatalog) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            log::error!("Unsupported board snapshot version {}", snapshot.version);
            return Err(ChallengeError::UnsupportedVersion(snapshot.version));
        }

        let mut board = Self::new();
        for record in &snapshot.challenges {
            let mut challenge = Challenge::from_flat(&record.state, regions)?;
            if challenge.kind() != record.kind {
                log::error!(
                    "Snapshot record says {:?} but state is {:?}",
                    record.kind,
                    challenge.kind()
                );
                return Err(ChallengeError::UnknownChallenge(record.state.clone()));
            }
            challenge.set_hidden(record.hidden);
            board.push(challenge);
        }
        Ok(board)
    }

    /// Snapshot as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }

    /// Restore from snapshot JSON
    pub fn from_json(json: &str, regions: &RegionCatalog) -> Result<Self> {
        let snapshot: BoardSnapshot = serde_json::from_str(json)?;
        Self::restore(&snapshot, regions)
    }
}
