//! Existential Snake entry point
//!
//! Headless driver: wires the engine to in-process collaborators, steers the
//! snake with a greedy pilot and logs the narrative stream. Exists to
//! exercise the full session wiring end to end; rendering lives elsewhere.

use existential_snake::consts::TICK_INTERVAL_MS;
use existential_snake::remote::CannedQuoteSource;
use existential_snake::scores::FileScoreSink;
use existential_snake::sim::{Direction, GridPosition};
use existential_snake::Session;

/// Pump granularity; finer than the tick so timers fire close to on time
const PUMP_STEP_MS: u64 = 50;
/// Hard stop for a driver run
const MAX_SESSION_MS: u64 = 5 * 60 * 1_000;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xD1CE);
    log::info!("starting session with seed {seed}");

    let quotes = Box::new(CannedQuoteSource::new(seed));
    let scores = Box::new(FileScoreSink::new("scores.json"));
    let mut session = Session::new(seed, 0, quotes, scores);
    session.start(0);

    let mut now = 0;
    let mut narrated = 0;
    while !session.is_over() && now < MAX_SESSION_MS {
        now += PUMP_STEP_MS;
        if now % TICK_INTERVAL_MS == 0 {
            steer(&mut session, now);
        }
        session.pump(now);

        // print thoughts as they appear
        let emitted = session.thoughts().emitted();
        if emitted > narrated {
            let fresh = (emitted - narrated) as usize;
            let retained = session.thoughts().len();
            for thought in session
                .thoughts()
                .entries()
                .skip(retained.saturating_sub(fresh))
            {
                match &thought.author {
                    Some(author) => log::info!("[{:?}] {} - {author}", thought.kind, thought.text),
                    None => log::info!("[{:?}] {}", thought.kind, thought.text),
                }
            }
            narrated = emitted;
        }
    }

    let outcome = session.state().outcome();
    log::info!(
        "finished: {:?}, score {}, food {}/{} rotten, corruption {:.0}%",
        outcome.result,
        outcome.score,
        outcome.rotten_food_eaten,
        outcome.total_food_eaten,
        outcome.corruption_percent
    );
}

/// Greedy pilot: walk toward the nearest food, avoiding reversals and
/// obvious suicide. Good enough to finish most runs.
fn steer(session: &mut Session, now: u64) {
    let chosen = {
        let state = session.state();
        let head = state.snake.head();
        state
            .foods
            .items()
            .iter()
            .map(|f| f.position)
            .min_by_key(|p| (p.x - head.x).abs() + (p.y - head.y).abs())
            .and_then(|target| {
                preferred_directions(head, target, state.direction)
                    .into_iter()
                    .find(|&direction| {
                        let next = head.step(direction);
                        existential_snake::sim::in_bounds(next)
                            && !state.snake.will_collide_with_self(next)
                    })
            })
    };
    if let Some(direction) = chosen {
        session.request_direction(direction, now);
    }
}

fn preferred_directions(head: GridPosition, target: GridPosition, current: Direction) -> Vec<Direction> {
    let mut order = Vec::with_capacity(4);
    if target.x > head.x {
        order.push(Direction::Right);
    } else if target.x < head.x {
        order.push(Direction::Left);
    }
    if target.y > head.y {
        order.push(Direction::Down);
    } else if target.y < head.y {
        order.push(Direction::Up);
    }
    // fall back to anything that is not a reversal
    for candidate in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ] {
        if !order.contains(&candidate) && candidate != current.opposite() {
            order.push(candidate);
        }
    }
    order.retain(|d| *d != current.opposite());
    order
}
