//! Thought stream: narrative events, de-duplication, corruption styling
//!
//! The snake narrates its existence. Remote text passes through a styling
//! pass keyed to the current corruption tier before it is shown; the styling
//! is a pure function of the text and tier, so the same input always renders
//! the same way.

use std::collections::VecDeque;

use serde::Serialize;

use crate::consts::{RECENT_TEXT_WINDOW, THOUGHT_LOG_CAPACITY};
use crate::sim::CorruptionState;

/// Category of a narrative event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ThoughtKind {
    Existential,
    Philosophical,
    Idle,
    Rotten,
    Satisfied,
}

/// One emitted narrative event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thought {
    pub kind: ThoughtKind,
    pub text: String,
    pub author: Option<String>,
    /// Emission time in session milliseconds
    pub at: u64,
}

/// Bounded presentation log with a rolling duplicate-suppression window.
///
/// The last `RECENT_TEXT_WINDOW` accepted texts are remembered; an identical
/// re-emission inside that window is dropped, not queued. The display buffer
/// keeps the newest `THOUGHT_LOG_CAPACITY` events, evicting oldest first.
#[derive(Debug, Default)]
pub struct ThoughtLog {
    entries: VecDeque<Thought>,
    recent: VecDeque<String>,
    emitted: u64,
}

impl ThoughtLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a thought. Returns false when the duplicate window drops it.
    pub fn push(&mut self, thought: Thought) -> bool {
        if self.recent.iter().any(|seen| *seen == thought.text) {
            log::debug!("suppressed duplicate thought: {}", thought.text);
            return false;
        }
        self.recent.push_back(thought.text.clone());
        if self.recent.len() > RECENT_TEXT_WINDOW {
            let _ = self.recent.pop_front();
        }
        self.entries.push_back(thought);
        if self.entries.len() > THOUGHT_LOG_CAPACITY {
            let _ = self.entries.pop_front();
        }
        self.emitted += 1;
        true
    }

    /// Total accepted emissions over the session, eviction included
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Retained events, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &Thought> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Thought> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Styling tier applied to remote narrative text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CorruptionTier {
    /// Below 50%: text passes through untouched
    Clear,
    /// 50%..100%: unstable casing
    Unsettled,
    /// 100%..150%: punctuation starts to fray
    Distorted,
    /// 150% and up, and always under super-corruption
    Consumed,
}

impl CorruptionTier {
    pub fn from_corruption(corruption: &CorruptionState) -> Self {
        if corruption.super_corrupted {
            return CorruptionTier::Consumed;
        }
        match corruption.corruption_percent {
            p if p >= 150.0 => CorruptionTier::Consumed,
            p if p >= 100.0 => CorruptionTier::Distorted,
            p if p >= 50.0 => CorruptionTier::Unsettled,
            _ => CorruptionTier::Clear,
        }
    }
}

/// Clauses appended at the deepest styling tier
const DISTURBING_CLAUSES: [&str; 4] = [
    " The rot is listening.",
    " It is already inside me.",
    " I can no longer tell food from decay.",
    " Soon there will be nothing left worth eating.",
];

/// Idle thoughts, emitted after sitting still too long
pub const IDLE_THOUGHTS: [&str; 5] = [
    "Are you still there? Or have you abandoned me to my solitary existence?",
    "This stillness... is it peace or merely the absence of purpose?",
    "In this moment of inaction, I contemplate the nature of free will.",
    "Perhaps movement is overrated. Maybe true wisdom comes from stillness.",
    "I wait, suspended between action and inaction, like Schrödinger's snake.",
];

/// Contented thoughts, occasionally emitted after fresh food
pub const SATISFIED_THOUGHTS: [&str; 5] = [
    "Ah, sustenance in its purest form. How satisfying.",
    "This nourishment brings clarity to my serpentine existence.",
    "With each morsel, I grow stronger, yet no less confused about my purpose.",
    "Fresh food, fresh thoughts. Yet the cycle of consumption continues.",
    "Delicious. Though I wonder - am I eating to live, or living to eat?",
];

/// Lines for the super-corruption threshold crossings
pub const SUPER_ONSET_LINE: &str = "Something has tipped over inside me. The rot speaks with my voice now.";
pub const SUPER_RECEDE_LINE: &str = "The fog thins. I remember what it was to be merely hungry.";

/// Restyle `text` for the given tier. Deterministic: driven by a hash of
/// the text itself, never by an RNG draw, so a reply renders identically
/// however often it is recomputed.
pub fn corrupt_text(text: &str, tier: CorruptionTier) -> String {
    if tier == CorruptionTier::Clear {
        return text.to_owned();
    }
    let seed = text_hash(text);
    let mut out = unstable_case(text, seed);
    if tier >= CorruptionTier::Distorted {
        out = fray_punctuation(&out);
    }
    if tier >= CorruptionTier::Consumed {
        out.push_str(DISTURBING_CLAUSES[(seed as usize) % DISTURBING_CLAUSES.len()]);
    }
    out
}

fn text_hash(text: &str) -> u32 {
    text.bytes()
        .fold(0x9e37_79b9u32, |h, b| {
            h.wrapping_mul(2654435761).wrapping_add(u32::from(b))
        })
}

fn unstable_case(text: &str, seed: u32) -> String {
    text.chars()
        .enumerate()
        .map(|(i, c)| {
            let h = seed.wrapping_add(i as u32 * 7919).wrapping_mul(2654435761);
            if h & 1 == 1 {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c.to_lowercase().next().unwrap_or(c)
            }
        })
        .collect()
}

fn fray_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '.' => out.push_str("..."),
            '?' => out.push_str("?!"),
            ',' => out.push_str(" -"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thought(text: &str) -> Thought {
        Thought {
            kind: ThoughtKind::Existential,
            text: text.to_owned(),
            author: None,
            at: 0,
        }
    }

    #[test]
    fn duplicate_within_window_is_dropped() {
        let mut log = ThoughtLog::new();
        assert!(log.push(thought("the void stares")));
        assert!(!log.push(thought("the void stares")));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn duplicate_outside_window_is_allowed_again() {
        let mut log = ThoughtLog::new();
        assert!(log.push(thought("echo")));
        for i in 0..RECENT_TEXT_WINDOW {
            assert!(log.push(thought(&format!("filler {i}"))));
        }
        assert!(log.push(thought("echo")));
    }

    #[test]
    fn display_buffer_evicts_oldest_first() {
        let mut log = ThoughtLog::new();
        for i in 0..THOUGHT_LOG_CAPACITY + 3 {
            assert!(log.push(thought(&format!("thought {i}"))));
        }
        assert_eq!(log.len(), THOUGHT_LOG_CAPACITY);
        assert_eq!(log.entries().next().unwrap().text, "thought 3");
        assert_eq!(log.latest().unwrap().text, format!("thought {}", THOUGHT_LOG_CAPACITY + 2));
    }

    #[test]
    fn tier_thresholds() {
        let mut c = CorruptionState::default();
        assert_eq!(CorruptionTier::from_corruption(&c), CorruptionTier::Clear);
        c.corruption_percent = 50.0;
        assert_eq!(CorruptionTier::from_corruption(&c), CorruptionTier::Unsettled);
        c.corruption_percent = 100.0;
        assert_eq!(CorruptionTier::from_corruption(&c), CorruptionTier::Distorted);
        c.corruption_percent = 150.0;
        assert_eq!(CorruptionTier::from_corruption(&c), CorruptionTier::Consumed);
        c.corruption_percent = 120.0;
        c.super_corrupted = true;
        assert_eq!(CorruptionTier::from_corruption(&c), CorruptionTier::Consumed);
    }

    #[test]
    fn clear_tier_is_identity() {
        let text = "Why do I consume?";
        assert_eq!(corrupt_text(text, CorruptionTier::Clear), text);
    }

    #[test]
    fn styling_is_deterministic() {
        let text = "One must imagine Sisyphus happy.";
        let a = corrupt_text(text, CorruptionTier::Consumed);
        let b = corrupt_text(text, CorruptionTier::Consumed);
        assert_eq!(a, b);
        assert_ne!(a, text);
    }

    #[test]
    fn tiers_stack_progressively() {
        let text = "Am I moving forward, or merely in circles?";
        let unsettled = corrupt_text(text, CorruptionTier::Unsettled);
        let distorted = corrupt_text(text, CorruptionTier::Distorted);
        let consumed = corrupt_text(text, CorruptionTier::Consumed);
        // casing changes but punctuation survives the first tier
        assert!(unsettled.contains('?'));
        assert!(!unsettled.contains("?!"));
        // the second tier frays punctuation
        assert!(distorted.contains("?!"));
        // the deepest tier appends a clause
        assert!(consumed.len() > distorted.len());
        assert!(DISTURBING_CLAUSES.iter().any(|c| consumed.ends_with(c)));
    }
}
