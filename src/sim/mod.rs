//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick period only
//! - Seeded RNG only
//! - Time passed in by the caller, never read from a clock
//! - No rendering or platform dependencies

pub mod corruption;
pub mod food;
pub mod grid;
pub mod snake;
pub mod state;
pub mod tick;

pub use corruption::{CorruptionEdges, CorruptionState};
pub use food::{FoodField, FoodItem, Freshness, classify};
pub use grid::{Direction, GridPosition, in_bounds};
pub use snake::Snake;
pub use state::{GameEvent, GamePhase, GameState, SessionOutcome, SessionResult};
pub use tick::{TickInput, tick};
