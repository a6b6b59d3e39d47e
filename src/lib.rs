//! Existential Snake - a grid snake simulation with a corruption mechanic
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, snake, food, corruption, tick)
//! - `scheduler`: Cancellable timers behind the cooperative event loop
//! - `narrative`: Thought stream, de-duplication, corruption styling
//! - `remote`: Quote/score collaborator boundary
//! - `scores`: Score ledger persistence
//! - `session`: Wires everything into a running session

pub mod narrative;
pub mod remote;
pub mod scheduler;
pub mod scores;
pub mod session;
pub mod sim;

pub use narrative::{Thought, ThoughtKind, ThoughtLog};
pub use remote::{LookupKind, QuoteSource, ScoreSink};
pub use session::Session;
pub use sim::{Direction, GamePhase, GameState, GridPosition, SessionOutcome, SessionResult};

/// Game configuration constants
///
/// Process-wide and fixed for the lifetime of a session; there is no
/// runtime reconfiguration.
pub mod consts {
    /// Grid side length in cells (the board is square)
    pub const GRID_SIZE: i32 = 20;
    /// Fixed simulation tick period in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 150;
    /// Maximum timer catch-up rounds per pump to prevent spiral of death
    pub const MAX_CATCHUP_ROUNDS: u32 = 8;

    /// Time before a food item can start rotting
    pub const FRESH_DURATION_MS: u64 = 10_000;
    /// Window before `FRESH_DURATION_MS` in which food reads as about-to-rot
    pub const ROT_WARNING_WINDOW_MS: u64 = 2_000;
    /// Rot is impossible until this many foods have been eaten in total
    pub const ROTTEN_FOOD_START: u32 = 2;
    /// Upper bound on concurrently live food items
    pub const MAX_FOOD_ITEMS: usize = 3;
    /// Initial period of the food spawn timer
    pub const FOOD_SPAWN_INTERVAL_MS: u64 = 5_000;
    /// Floor for the spawn interval as escalation shrinks it
    pub const MIN_FOOD_SPAWN_INTERVAL_MS: u64 = 1_500;
    /// Spawn-interval decrement for a timer spawn or fresh consumption
    pub const SPAWN_DECREMENT_FRESH_MS: u64 = 150;
    /// Spawn-interval decrement for a rotten consumption
    pub const SPAWN_DECREMENT_ROTTEN_MS: u64 = 400;
    /// Random placement attempts before falling back to a grid scan
    pub const SPAWN_ATTEMPTS: u32 = 64;

    /// Total foods eaten that ends the session in a win
    pub const WIN_FOOD_COUNT: u32 = 10;
    /// Points for eating fresh food
    pub const SCORE_FRESH: u64 = 3;
    /// Points for eating rotten food
    pub const SCORE_ROTTEN: u64 = 1;

    /// Corruption percent ceiling; reaching it flips super-corruption
    pub const SUPER_THRESHOLD: f32 = 200.0;
    /// Scale factor applied to the rotten/total ratio
    pub const CORRUPTION_SCALE: f32 = 400.0;

    /// Period of the existential-thought timer
    pub const EXISTENTIAL_INTERVAL_MS: u64 = 12_000;
    /// Share of existential lookups vs philosophical ones
    pub const EXISTENTIAL_SPLIT: f64 = 0.6;
    /// Extra gate on each existential-timer firing, to reduce chatter
    pub const THOUGHT_CHANCE: f64 = 0.75;
    /// Chance of a satisfied thought when eating fresh food
    pub const SATISFIED_THOUGHT_CHANCE: f64 = 0.25;

    /// Period of the idle counter timer
    pub const IDLE_TICK_MS: u64 = 1_000;
    /// Idle periods without a direction change before the idle thought
    pub const IDLE_THOUGHT_THRESHOLD: u32 = 5;

    /// Display duration of a blocking rotten-food message
    pub const MESSAGE_DURATION_MS: u64 = 3_000;
    /// Rolling window of recent texts used for duplicate suppression
    pub const RECENT_TEXT_WINDOW: usize = 5;
    /// Number of narrative events retained for presentation
    pub const THOUGHT_LOG_CAPACITY: usize = 8;
}
