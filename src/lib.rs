//! Bingo Extras - extra challenge types for a team bingo game mode
//!
//! This library provides the challenge types, their randomizer presets and
//! the board that routes host game events to them.
//!
//! ## Persistence
//!
//! Challenges serialize to a compact flat string for the host's board
//! export and to a versioned JSON snapshot for local saves. Randomizer
//! presets use an indented block format.

pub mod board;
pub mod challenge;
pub mod config;
pub mod game;

use once_cell::sync::OnceCell;
use rand::Rng;
use std::sync::Mutex;

use crate::board::Board;
use crate::challenge::{Result, StateDelta};
use crate::config::Settings;
use crate::game::{GameEvent, Session, TickSignal};

/// Global mod state
#[derive(Debug, Clone)]
pub struct BingoExtras {
    pub board: Board,
    pub settings: Settings,
}

impl BingoExtras {
    /// Create an instance with an empty board
    pub fn new(settings: Settings) -> Self {
        Self {
            board: Board::new(),
            settings,
        }
    }

    /// Session context for the local team
    pub fn session(&self) -> Session<'_> {
        Session::new(self.settings.team, &self.settings.regions)
    }

    /// Route a host event to the board
    pub fn handle_event(&mut self, event: &GameEvent) -> Vec<(usize, StateDelta)> {
        let session = Session::new(self.settings.team, &self.settings.regions);
        self.board.dispatch(event, &session)
    }

    /// Per-frame update
    pub fn tick(&mut self, tick: TickSignal) -> Vec<(usize, StateDelta)> {
        self.board.update(tick, &self.settings.regions)
    }

    /// Replace the board with a freshly generated one
    pub fn new_board<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.board = Board::generate(&self.settings, rng);
    }

    /// Start a new attempt on the current board
    pub fn reset(&mut self) {
        self.board.reset(&self.settings.regions);
    }

    /// Save the board as a JSON snapshot
    pub fn save(&self) -> Result<String> {
        self.board.to_json()
    }

    /// Load a board from a JSON snapshot, keeping the current one on error
    pub fn load(&mut self, json: &str) -> Result<()> {
        self.board = Board::from_json(json, &self.settings.regions)?;
        log::info!("Loaded board with {} challenges", self.board.len());
        Ok(())
    }
}

/// Global instance for host callbacks
static BINGO_INSTANCE: OnceCell<Mutex<BingoExtras>> = OnceCell::new();

/// Initialize the global instance
pub fn init_bingo(settings: Settings) {
    if BINGO_INSTANCE
        .set(Mutex::new(BingoExtras::new(settings)))
        .is_err()
    {
        log::warn!("Bingo instance already initialized, ignoring new settings");
    }
}

/// Get a reference to the global instance
pub fn get_bingo() -> Option<&'static Mutex<BingoExtras>> {
    BINGO_INSTANCE.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{Challenge, ChallengeStatus, MouthSpearChallenge, ANY_REGION};
    use crate::game::Team;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn spear(region: &str) -> GameEvent {
        GameEvent::LizardSpeared {
            stuck: true,
            chunk_index: 0,
            hit_in_mouth: true,
            region: region.to_string(),
        }
    }

    #[test]
    fn test_handle_event_uses_local_team() {
        let mut bingo = BingoExtras::new(Settings::multiplayer(Team::new(3)));
        bingo.board.push(Challenge::MouthSpear(MouthSpearChallenge::with_values(
            1,
            ANY_REGION.to_string(),
            false,
        )));

        let changes = bingo.handle_event(&spear("SU"));
        assert_eq!(changes, vec![(0, StateDelta::Completed)]);

        let challenge = bingo.board.get(0).unwrap();
        assert_eq!(challenge.status(Team::new(3)), ChallengeStatus::Completed);
        let teams = &challenge.behavior().core().teams;
        assert!(teams.is_completed(Team::new(3)));
        assert!(!teams.is_completed(Team::new(0)));
    }

    #[test]
    fn test_save_and_load() {
        let mut bingo = BingoExtras::new(Settings::solo());
        let mut rng = StdRng::seed_from_u64(7);
        bingo.new_board(&mut rng);
        bingo.handle_event(&spear("HI"));

        let json = bingo.save().unwrap();
        let mut other = BingoExtras::new(Settings::solo());
        other.load(&json).unwrap();
        assert_eq!(other.board.to_flat_lines(), bingo.board.to_flat_lines());
    }

    #[test]
    fn test_failed_load_keeps_board() {
        let mut bingo = BingoExtras::new(Settings::solo());
        bingo.board.push(Challenge::MouthSpear(MouthSpearChallenge::new()));

        assert!(bingo.load("not json").is_err());
        assert_eq!(bingo.board.len(), 1);
    }

    #[test]
    fn test_global_instance() {
        init_bingo(Settings::solo());
        init_bingo(Settings::multiplayer(Team::new(5)));
        let bingo = get_bingo().expect("initialized");
        let guard = bingo.lock().unwrap();
        assert_eq!(guard.settings.team, Team::new(0));
    }
}
