//! Game state and core simulation types
//!
//! One mutable state object owned by the session; every timer callback reads
//! it synchronously, so nothing needs mirrored snapshots.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::WIN_FOOD_COUNT;

use super::corruption::CorruptionState;
use super::food::{FoodField, Freshness};
use super::grid::{self, Direction, GridPosition};
use super::snake::Snake;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed but not yet started
    Idle,
    /// Active gameplay
    Running,
    /// Ticks suspended; direction input ignored
    Paused,
    /// Run ended; terminal
    GameOver,
}

/// How a finished session is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionResult {
    /// Won the run without ending super-corrupted
    Victory,
    /// Crashed into a wall or itself, still clean
    Defeat,
    /// Ended the run super-corrupted, win or crash
    Corrupted,
}

impl SessionResult {
    pub(crate) fn classify(won: bool, super_corrupted: bool) -> Self {
        if super_corrupted {
            SessionResult::Corrupted
        } else if won {
            SessionResult::Victory
        } else {
            SessionResult::Defeat
        }
    }
}

/// Terminal snapshot delivered to the score collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub score: u64,
    pub total_food_eaten: u32,
    pub rotten_food_eaten: u32,
    pub super_corrupted: bool,
    pub corruption_percent: f32,
    pub result: SessionResult,
}

/// Events emitted by the tick engine for the session layer to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A food item was consumed at `position`
    AteFood {
        freshness: Freshness,
        position: GridPosition,
    },
    /// Corruption crossed up through the super threshold
    BecameSuperCorrupted,
    /// Fresh-food dilution dropped corruption back below the threshold
    RecoveredFromSuperCorrupted,
    /// The session entered `GameOver`; emitted exactly once
    GameEnded { outcome: SessionOutcome },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub snake: Snake,
    /// Direction currently in effect
    pub direction: Direction,
    pub foods: FoodField,
    pub corruption: CorruptionState,
    pub score: u64,
    /// Committed simulation ticks
    pub ticks: u64,
    /// Set when the phase becomes `GameOver`
    pub result: Option<SessionResult>,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// A fresh `Idle` session: snake of length 1 at the grid center, one
    /// food already on the board, score 0.
    pub fn new(seed: u64, now: u64) -> Self {
        let mut state = Self {
            seed,
            phase: GamePhase::Idle,
            snake: Snake::new(grid::center()),
            direction: Direction::Right,
            foods: FoodField::new(),
            corruption: CorruptionState::default(),
            score: 0,
            ticks: 0,
            result: None,
            rng: Pcg32::seed_from_u64(seed),
        };
        let _ = state.foods.spawn(&state.snake, &mut state.rng, now);
        state
    }

    /// `Idle` -> `Running`; a no-op in any other phase
    pub fn start(&mut self) {
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::Running;
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Whether the win threshold has been reached
    pub fn has_won(&self) -> bool {
        self.corruption.total_food_eaten >= WIN_FOOD_COUNT
    }

    /// Snapshot for the score collaborator. Meaningful once the session is
    /// over; earlier calls classify as if the run crashed now.
    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            score: self.score,
            total_food_eaten: self.corruption.total_food_eaten,
            rotten_food_eaten: self.corruption.rotten_food_eaten,
            super_corrupted: self.corruption.super_corrupted,
            corruption_percent: self.corruption.corruption_percent,
            result: self
                .result
                .unwrap_or(SessionResult::classify(false, self.corruption.super_corrupted)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_matches_the_idle_contract() {
        let state = GameState::new(42, 0);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.snake.head(), grid::center());
        assert_eq!(state.foods.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn start_only_leaves_idle() {
        let mut state = GameState::new(42, 0);
        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        state.phase = GamePhase::GameOver;
        state.start();
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn same_seed_spawns_the_same_food() {
        let a = GameState::new(7, 0);
        let b = GameState::new(7, 0);
        assert_eq!(a.foods.items()[0].position, b.foods.items()[0].position);
    }

    #[test]
    fn result_classification() {
        assert_eq!(SessionResult::classify(true, false), SessionResult::Victory);
        assert_eq!(SessionResult::classify(false, false), SessionResult::Defeat);
        assert_eq!(SessionResult::classify(true, true), SessionResult::Corrupted);
        assert_eq!(SessionResult::classify(false, true), SessionResult::Corrupted);
    }
}
