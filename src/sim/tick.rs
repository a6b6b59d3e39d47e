//! Fixed timestep simulation tick
//!
//! One call advances the simulation by one discrete step, in a fixed order:
//! direction, candidate head, bounds/self-collision, food resolution,
//! corruption, commit. The step is atomic with respect to every other timer.

use crate::consts::{SCORE_FRESH, SCORE_ROTTEN, SPAWN_DECREMENT_FRESH_MS, SPAWN_DECREMENT_ROTTEN_MS};

use super::corruption;
use super::food;
use super::grid::{self, Direction};
use super::state::{GameEvent, GamePhase, GameState, SessionResult};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Latest validated direction request, if any arrived since last tick
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one tick. Returns the events this step
/// produced, in the order they happened.
pub fn tick(state: &mut GameState, input: &TickInput, now: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Handle pause toggle; entering pause suspends this tick too
    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                return events;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
            }
            _ => {}
        }
    }

    // Only Running ticks; Idle, Paused and GameOver all suspend
    if state.phase != GamePhase::Running {
        return events;
    }

    // 1. Latest validated direction wins; reversal was rejected upstream but
    //    the rule is enforced again here at the state boundary.
    if let Some(requested) = input.direction {
        if requested != state.direction.opposite() {
            state.direction = requested;
        }
    }

    state.ticks += 1;

    // 2. Candidate head
    let candidate = state.snake.compute_head(state.direction);

    // 3. Bounds and self-collision are fatal; the snake stays where it was
    if !grid::in_bounds(candidate) || state.snake.will_collide_with_self(candidate) {
        end_session(state, false, &mut events);
        return events;
    }

    // 4. Food resolution: first match wins
    match state.foods.take_at(candidate) {
        None => {
            state.snake.advance(candidate, false);
        }
        Some(eaten) => {
            // classify at the moment of consumption, against the pre-eat
            // counter that gates rot
            let freshness = food::classify(&eaten, state.corruption.total_food_eaten, now);
            let rotten = freshness.is_rotten();

            let total = state.corruption.total_food_eaten + 1;
            let rotten_total = state.corruption.rotten_food_eaten + u32::from(rotten);

            state.score += if rotten { SCORE_ROTTEN } else { SCORE_FRESH };

            if rotten_total > 0 {
                // full recomputation; fresh food dilutes the ratio
                let (next, edges) = corruption::update(&state.corruption, total, rotten_total);
                state.corruption = next;
                if edges.became_super_corrupted {
                    events.push(GameEvent::BecameSuperCorrupted);
                }
                if edges.recovered_from_super_corrupted {
                    events.push(GameEvent::RecoveredFromSuperCorrupted);
                }
            } else {
                // nothing rotten yet: the percent cannot move, only count
                state.corruption.total_food_eaten = total;
            }

            state.foods.shrink_interval(if rotten {
                SPAWN_DECREMENT_ROTTEN_MS
            } else {
                SPAWN_DECREMENT_FRESH_MS
            });

            // 5. Commit: grow onto the food cell, then replace the food
            state.snake.advance(candidate, true);
            let _ = state.foods.spawn(&state.snake, &mut state.rng, now);

            events.push(GameEvent::AteFood {
                freshness,
                position: candidate,
            });

            // win is evaluated after committing this tick's state
            if state.has_won() {
                end_session(state, true, &mut events);
            }
        }
    }

    events
}

fn end_session(state: &mut GameState, won: bool, events: &mut Vec<GameEvent>) {
    state.phase = GamePhase::GameOver;
    state.result = Some(SessionResult::classify(won, state.corruption.super_corrupted));
    events.push(GameEvent::GameEnded {
        outcome: state.outcome(),
    });
}
