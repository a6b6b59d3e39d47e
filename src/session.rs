//! Session wiring
//!
//! One cooperative pump drives every timer against a single mutable state
//! object: the fixed simulation tick, the food spawn timer, the
//! existential-thought timer and the idle counter. Remote lookups are issued
//! non-blocking and their replies applied on a later pump; nothing here can
//! stall a tick. Stopping or dropping the session cancels every timer.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{
    EXISTENTIAL_INTERVAL_MS, EXISTENTIAL_SPLIT, FOOD_SPAWN_INTERVAL_MS, IDLE_THOUGHT_THRESHOLD,
    IDLE_TICK_MS, MAX_CATCHUP_ROUNDS, MESSAGE_DURATION_MS, SATISFIED_THOUGHT_CHANCE,
    SPAWN_DECREMENT_FRESH_MS, THOUGHT_CHANCE, TICK_INTERVAL_MS,
};
use crate::narrative::{
    CorruptionTier, IDLE_THOUGHTS, SATISFIED_THOUGHTS, SUPER_ONSET_LINE, SUPER_RECEDE_LINE,
    Thought, ThoughtKind, ThoughtLog, corrupt_text,
};
use crate::remote::{LookupKind, LookupReply, QuoteSource, ScoreSink};
use crate::scheduler::{Scheduler, TimerId};
use crate::sim::{self, Direction, GameEvent, GamePhase, GameState, SessionOutcome, TickInput};

/// A running game session: simulation state plus the timers and
/// collaborators around it.
pub struct Session {
    state: GameState,
    scheduler: Scheduler,
    thoughts: ThoughtLog,
    quotes: Box<dyn QuoteSource>,
    scores: Box<dyn ScoreSink>,

    tick_timer: TimerId,
    spawn_timer: TimerId,
    existential_timer: TimerId,
    idle_timer: TimerId,

    /// Latest valid direction request since the last tick
    pending_direction: Option<Direction>,
    pending_pause: bool,
    /// End of the blocking message currently showing, if any
    modal_until: Option<u64>,
    /// Idle periods since the last direction change or narrative emission
    idle_periods: u32,
    /// Period the spawn timer is currently registered with
    spawn_period: u64,
    outcome_sent: bool,
    /// Narrative RNG: a separate stream so text draws never perturb the sim
    rng: Pcg32,
}

impl Session {
    /// Build an `Idle` session. Timers are registered immediately but
    /// nothing mutates state until [`Session::start`].
    pub fn new(seed: u64, now: u64, quotes: Box<dyn QuoteSource>, scores: Box<dyn ScoreSink>) -> Self {
        let mut scheduler = Scheduler::new();
        let tick_timer = scheduler.every(TICK_INTERVAL_MS, now);
        let spawn_timer = scheduler.every(FOOD_SPAWN_INTERVAL_MS, now);
        let existential_timer = scheduler.every(EXISTENTIAL_INTERVAL_MS, now);
        let idle_timer = scheduler.every(IDLE_TICK_MS, now);

        Self {
            state: GameState::new(seed, now),
            scheduler,
            thoughts: ThoughtLog::new(),
            quotes,
            scores,
            tick_timer,
            spawn_timer,
            existential_timer,
            idle_timer,
            pending_direction: None,
            pending_pause: false,
            modal_until: None,
            idle_periods: 0,
            spawn_period: FOOD_SPAWN_INTERVAL_MS,
            outcome_sent: false,
            rng: Pcg32::seed_from_u64(seed.wrapping_add(0x9e37_79b9)),
        }
    }

    /// Begin play. Timer backlog accumulated while idle is discarded so the
    /// first tick lands one period from `now`.
    pub fn start(&mut self, now: u64) {
        self.state.start();
        self.scheduler.drop_backlog(now);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn thoughts(&self) -> &ThoughtLog {
        &self.thoughts
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Effective pause: the nominal flag, or a blocking message on screen
    pub fn is_paused(&self, now: u64) -> bool {
        self.state.phase == GamePhase::Paused || self.modal_active(now)
    }

    /// Request a direction change. Ignored while paused or showing a
    /// message, discarded after game over, rejected when it would reverse
    /// straight into the second segment. The latest valid request wins.
    pub fn request_direction(&mut self, direction: Direction, now: u64) {
        if self.state.is_over() || !self.running(now) {
            return;
        }
        if direction == self.state.direction.opposite() {
            log::trace!("rejected reversal request {direction:?}");
            return;
        }
        self.pending_direction = Some(direction);
        self.idle_periods = 0;
    }

    /// Map a key name onto the input boundary: arrow keys or the WASD
    /// alternate set steer, space toggles pause. Unknown keys do nothing.
    pub fn handle_key(&mut self, key: &str, now: u64) {
        match key {
            " " | "Space" => self.toggle_pause(),
            "ArrowUp" | "w" | "W" => self.request_direction(Direction::Up, now),
            "ArrowDown" | "s" | "S" => self.request_direction(Direction::Down, now),
            "ArrowLeft" | "a" | "A" => self.request_direction(Direction::Left, now),
            "ArrowRight" | "d" | "D" => self.request_direction(Direction::Right, now),
            _ => {}
        }
    }

    /// Toggle pause. Always accepted outside game over; applied by the next
    /// tick, like every other input.
    pub fn toggle_pause(&mut self) {
        if self.state.is_over() {
            return;
        }
        self.pending_pause = !self.pending_pause;
    }

    /// Advance the session to `now`: apply resolved lookups, expire the
    /// blocking message, then run every due timer in fixed order (tick
    /// first). Call this often; it is cheap when nothing is due.
    pub fn pump(&mut self, now: u64) {
        self.drain_quote_replies(now);

        // an elapsed blocking message auto-resumes the soft pause
        if self.modal_until.is_some_and(|until| now >= until) {
            self.modal_until = None;
        }

        let mut rounds = 0;
        loop {
            let due = self.scheduler.poll(now);
            if due.is_empty() {
                break;
            }
            for id in due {
                self.fire(id, now);
            }
            rounds += 1;
            if rounds >= MAX_CATCHUP_ROUNDS {
                // stalled too long; skip the backlog rather than replaying it
                self.scheduler.drop_backlog(now);
                break;
            }
        }
    }

    /// Stop the session: cancel every timer and discard in-flight replies.
    /// Dropping the session has the same effect.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
        let _ = self.quotes.poll();
        self.modal_until = None;
    }

    fn modal_active(&self, now: u64) -> bool {
        self.modal_until.is_some_and(|until| now < until)
    }

    /// Timers mutate nothing unless the session is running and unblocked
    fn running(&self, now: u64) -> bool {
        self.state.phase == GamePhase::Running && !self.modal_active(now)
    }

    fn fire(&mut self, id: TimerId, now: u64) {
        if id == self.tick_timer {
            self.run_tick(now);
        } else if id == self.spawn_timer {
            self.run_spawn(now);
        } else if id == self.existential_timer {
            self.run_existential(now);
        } else if id == self.idle_timer {
            self.run_idle(now);
        }
    }

    fn run_tick(&mut self, now: u64) {
        let input = TickInput {
            direction: self.pending_direction.take(),
            pause: std::mem::take(&mut self.pending_pause),
        };
        if self.modal_active(now) {
            // a blocking message forces a soft pause; only the pause
            // toggle is honored underneath it
            if input.pause {
                self.state.phase = match self.state.phase {
                    GamePhase::Running => GamePhase::Paused,
                    GamePhase::Paused => GamePhase::Running,
                    other => other,
                };
            }
            return;
        }
        let events = sim::tick(&mut self.state, &input, now);
        self.react(events, now);
        self.sync_spawn_timer(now);
    }

    fn run_spawn(&mut self, now: u64) {
        if !self.running(now) {
            return;
        }
        let spawned = self
            .state
            .foods
            .maybe_spawn(&self.state.snake, &mut self.state.rng, now)
            .map(|item| item.position);
        if let Some(position) = spawned {
            log::trace!("food spawned at {position:?}");
            // time-driven spawns escalate too
            self.state.foods.shrink_interval(SPAWN_DECREMENT_FRESH_MS);
            self.sync_spawn_timer(now);
        }
    }

    fn run_existential(&mut self, now: u64) {
        if !self.running(now) {
            return;
        }
        // extra gate so the snake does not narrate every single interval
        if !self.rng.random_bool(THOUGHT_CHANCE) {
            return;
        }
        let kind = if self.rng.random_bool(EXISTENTIAL_SPLIT) {
            LookupKind::Existential
        } else {
            LookupKind::Philosophical
        };
        self.quotes.request(kind);
    }

    fn run_idle(&mut self, now: u64) {
        if !self.running(now) {
            return;
        }
        self.idle_periods += 1;
        if self.idle_periods == IDLE_THOUGHT_THRESHOLD {
            let text = IDLE_THOUGHTS[self.rng.random_range(0..IDLE_THOUGHTS.len())];
            let _ = self.emit(ThoughtKind::Idle, text.to_owned(), None, now);
        }
    }

    fn react(&mut self, events: Vec<GameEvent>, now: u64) {
        for event in events {
            match event {
                GameEvent::AteFood { freshness, .. } => {
                    if freshness.is_rotten() {
                        log::debug!("rotten food eaten; requesting commentary");
                        self.quotes.request(LookupKind::Rotten);
                    } else if self.rng.random_bool(SATISFIED_THOUGHT_CHANCE) {
                        let text =
                            SATISFIED_THOUGHTS[self.rng.random_range(0..SATISFIED_THOUGHTS.len())];
                        let _ = self.emit(ThoughtKind::Satisfied, text.to_owned(), None, now);
                    }
                }
                GameEvent::BecameSuperCorrupted => {
                    log::info!("super-corruption onset");
                    let _ = self.emit(ThoughtKind::Rotten, SUPER_ONSET_LINE.to_owned(), None, now);
                }
                GameEvent::RecoveredFromSuperCorrupted => {
                    log::info!("super-corruption receded");
                    let _ =
                        self.emit(ThoughtKind::Existential, SUPER_RECEDE_LINE.to_owned(), None, now);
                }
                GameEvent::GameEnded { outcome } => self.finish(outcome),
            }
        }
    }

    fn drain_quote_replies(&mut self, now: u64) {
        for reply in self.quotes.poll() {
            if self.state.is_over() {
                // the session ended while this lookup was in flight
                continue;
            }
            let tier = CorruptionTier::from_corruption(&self.state.corruption);
            match reply {
                LookupReply::Existential(c) => {
                    let text = corrupt_text(&c.comment, tier);
                    let _ = self.emit(ThoughtKind::Existential, text, None, now);
                }
                LookupReply::Philosophical(q) => {
                    let text = corrupt_text(&q.quote, tier);
                    let _ = self.emit(ThoughtKind::Philosophical, text, Some(q.author), now);
                }
                LookupReply::Rotten(c) => {
                    // rotten commentary blocks: modal display, soft pause
                    if self.emit(ThoughtKind::Rotten, c.comment, None, now) {
                        self.modal_until = Some(now + MESSAGE_DURATION_MS);
                    }
                }
            }
        }
    }

    fn emit(&mut self, kind: ThoughtKind, text: String, author: Option<String>, now: u64) -> bool {
        let accepted = self.thoughts.push(Thought {
            kind,
            text,
            author,
            at: now,
        });
        if accepted {
            // any narrative emission also resets the idle counter
            self.idle_periods = 0;
        }
        accepted
    }

    fn sync_spawn_timer(&mut self, now: u64) {
        let interval = self.state.foods.spawn_interval();
        if interval != self.spawn_period {
            self.scheduler.reschedule(self.spawn_timer, interval, now);
            self.spawn_period = interval;
        }
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        if self.outcome_sent {
            return;
        }
        self.outcome_sent = true;
        log::info!(
            "session over: {:?}, score {}, corruption {:.0}%",
            outcome.result,
            outcome.score,
            outcome.corruption_percent
        );
        if let Err(err) = self.scores.submit(&outcome) {
            // fire and forget: the finished run stands either way
            log::warn!("score delivery failed: {err}");
        }
        self.scheduler.cancel_all();
        self.modal_until = None;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::consts::{ROTTEN_FOOD_START, WIN_FOOD_COUNT};
    use crate::remote::{CannedQuoteSource, DiscardScoreSink, ScoreError};
    use crate::sim::GridPosition;

    #[derive(Default)]
    struct RecordingSink {
        outcomes: Rc<RefCell<Vec<SessionOutcome>>>,
    }

    impl ScoreSink for RecordingSink {
        fn submit(&mut self, outcome: &SessionOutcome) -> Result<(), ScoreError> {
            self.outcomes.borrow_mut().push(outcome.clone());
            Ok(())
        }
    }

    struct FailingSink;

    impl ScoreSink for FailingSink {
        fn submit(&mut self, _outcome: &SessionOutcome) -> Result<(), ScoreError> {
            Err(ScoreError::Io(std::io::Error::other("collaborator down")))
        }
    }

    /// A started session at `now` with the random starter food removed so
    /// tests can script the board exactly.
    fn scripted(now: u64, scores: Box<dyn ScoreSink>) -> Session {
        let mut session = Session::new(42, now, Box::new(CannedQuoteSource::new(42)), scores);
        session.start(now);
        while let Some(item) = session.state.foods.items().first().cloned() {
            let _ = session.state.foods.take_at(item.position);
        }
        session
    }

    #[test]
    fn pump_runs_ticks_on_the_fixed_period() {
        let mut session = scripted(0, Box::new(DiscardScoreSink));
        session.pump(TICK_INTERVAL_MS - 1);
        assert_eq!(session.state.ticks, 0);
        session.pump(TICK_INTERVAL_MS);
        assert_eq!(session.state.ticks, 1);
    }

    #[test]
    fn winning_submits_the_outcome_exactly_once() {
        let outcomes = Rc::new(RefCell::new(Vec::new()));
        let sink = RecordingSink {
            outcomes: Rc::clone(&outcomes),
        };
        let mut session = scripted(0, Box::new(sink));
        session.state.corruption.total_food_eaten = WIN_FOOD_COUNT - 1;
        let _ = session
            .state
            .foods
            .place_at(GridPosition::new(11, 10), TICK_INTERVAL_MS);

        session.pump(TICK_INTERVAL_MS);
        assert!(session.is_over());
        assert_eq!(outcomes.borrow().len(), 1);
        assert_eq!(outcomes.borrow()[0].total_food_eaten, WIN_FOOD_COUNT);
        // every timer is torn down with the session
        assert!(session.scheduler.is_empty());

        session.pump(TICK_INTERVAL_MS * 10);
        assert_eq!(outcomes.borrow().len(), 1);
    }

    #[test]
    fn score_delivery_failure_leaves_the_finished_session_intact() {
        let mut session = scripted(0, Box::new(FailingSink));
        session.state.corruption.total_food_eaten = WIN_FOOD_COUNT - 1;
        let _ = session
            .state
            .foods
            .place_at(GridPosition::new(11, 10), TICK_INTERVAL_MS);
        session.pump(TICK_INTERVAL_MS);
        assert!(session.is_over());
        assert_eq!(session.state.result, Some(crate::sim::SessionResult::Victory));
    }

    #[test]
    fn rotten_commentary_soft_pauses_until_its_display_elapses() {
        // start late enough that a food created at 0 is already rotten
        let start = 10_000;
        let mut session = scripted(start, Box::new(DiscardScoreSink));
        session.state.corruption.total_food_eaten = ROTTEN_FOOD_START;
        let _ = session.state.foods.place_at(GridPosition::new(11, 10), 0);

        let eat_at = start + TICK_INTERVAL_MS;
        session.pump(eat_at);
        assert_eq!(session.state.corruption.rotten_food_eaten, 1);

        // the reply lands on the next pump and blocks the simulation
        let mut now = eat_at + TICK_INTERVAL_MS;
        session.pump(now);
        assert!(session.is_paused(now));
        let frozen_ticks = session.state.ticks;
        let modal_end = now + MESSAGE_DURATION_MS;

        while now + TICK_INTERVAL_MS < modal_end {
            now += TICK_INTERVAL_MS;
            session.pump(now);
        }
        assert_eq!(session.state.ticks, frozen_ticks);
        assert!(session.is_paused(now));

        // past the display duration the session resumes by itself
        now = modal_end + TICK_INTERVAL_MS;
        session.pump(now);
        assert!(!session.is_paused(now));
        assert!(session.state.ticks > frozen_ticks);
    }

    #[test]
    fn reversal_is_rejected_and_turns_are_accepted() {
        let mut session = scripted(0, Box::new(DiscardScoreSink));
        session.request_direction(Direction::Left, 0);
        assert_eq!(session.pending_direction, None);
        session.request_direction(Direction::Up, 0);
        assert_eq!(session.pending_direction, Some(Direction::Up));
        // the latest valid request wins
        session.request_direction(Direction::Down, 0);
        assert_eq!(session.pending_direction, Some(Direction::Down));
    }

    #[test]
    fn both_key_sets_map_to_directions() {
        let mut session = scripted(0, Box::new(DiscardScoreSink));
        session.handle_key("w", 0);
        assert_eq!(session.pending_direction, Some(Direction::Up));
        session.handle_key("ArrowDown", 0);
        assert_eq!(session.pending_direction, Some(Direction::Down));
        session.handle_key("x", 0);
        assert_eq!(session.pending_direction, Some(Direction::Down));
        session.handle_key(" ", 0);
        assert!(session.pending_pause);
    }

    #[test]
    fn direction_input_is_ignored_while_paused() {
        let mut session = scripted(0, Box::new(DiscardScoreSink));
        session.toggle_pause();
        session.pump(TICK_INTERVAL_MS);
        assert_eq!(session.phase(), GamePhase::Paused);
        session.request_direction(Direction::Up, TICK_INTERVAL_MS);
        assert_eq!(session.pending_direction, None);
    }

    #[test]
    fn idle_thought_fires_exactly_once() {
        let mut session = scripted(0, Box::new(DiscardScoreSink));
        for _ in 0..IDLE_THOUGHT_THRESHOLD {
            session.run_idle(0);
        }
        let idle_thoughts = |s: &Session| {
            s.thoughts
                .entries()
                .filter(|t| t.kind == ThoughtKind::Idle)
                .count()
        };
        assert_eq!(idle_thoughts(&session), 1);
        // further idle periods do not repeat the thought
        for _ in 0..3 {
            session.run_idle(0);
        }
        assert_eq!(idle_thoughts(&session), 1);
    }

    #[test]
    fn eating_reschedules_the_spawn_timer() {
        let mut session = scripted(0, Box::new(DiscardScoreSink));
        let _ = session
            .state
            .foods
            .place_at(GridPosition::new(11, 10), TICK_INTERVAL_MS);
        session.pump(TICK_INTERVAL_MS);
        assert_eq!(session.state.corruption.total_food_eaten, 1);
        assert_eq!(
            session.spawn_period,
            FOOD_SPAWN_INTERVAL_MS - SPAWN_DECREMENT_FRESH_MS
        );
    }

    #[test]
    fn shutdown_cancels_everything() {
        let mut session = scripted(0, Box::new(DiscardScoreSink));
        session.shutdown();
        assert!(session.scheduler.is_empty());
        session.pump(TICK_INTERVAL_MS * 4);
        assert_eq!(session.state.ticks, 0);
    }
}
