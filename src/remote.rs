//! Collaborator boundary: narrative text lookups and score delivery
//!
//! Both collaborators sit outside the simulation. Lookups are non-blocking:
//! the session issues a request and applies whatever replies have arrived on
//! a later pump. A slow or failed lookup yields no narrative event for that
//! cycle; it is never retried and never stalls a tick. Score delivery is
//! fire-and-forget: a failure is logged and the finished session stands.

use std::collections::VecDeque;

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::SessionOutcome;

/// The three narrative lookup categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Philosophical,
    Existential,
    Rotten,
}

/// A philosophical quote with attribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhilosophicalQuote {
    pub quote: String,
    pub author: String,
}

/// A bare comment payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment: String,
}

/// A resolved lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LookupReply {
    Philosophical(PhilosophicalQuote),
    Existential(Comment),
    Rotten(Comment),
}

/// Non-blocking source of narrative text.
///
/// `request` must return immediately; implementations log their own
/// transport failures and simply never deliver a reply for that request.
pub trait QuoteSource {
    fn request(&mut self, kind: LookupKind);
    /// Drain every reply that has arrived since the last poll
    fn poll(&mut self) -> Vec<LookupReply>;
}

/// Failure delivering a session outcome
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("score persistence failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of terminal session outcomes
pub trait ScoreSink {
    fn submit(&mut self, outcome: &SessionOutcome) -> Result<(), ScoreError>;
}

/// Sink that drops outcomes; useful when nobody is keeping score
#[derive(Debug, Default)]
pub struct DiscardScoreSink;

impl ScoreSink for DiscardScoreSink {
    fn submit(&mut self, _outcome: &SessionOutcome) -> Result<(), ScoreError> {
        Ok(())
    }
}

/// In-process source answering from built-in tables.
///
/// Stands in for the remote quote service in the headless driver and in
/// tests: every request resolves by the next poll, drawn from a seeded RNG.
pub struct CannedQuoteSource {
    rng: Pcg32,
    pending: VecDeque<LookupReply>,
}

const PHILOSOPHICAL_QUOTES: [(&str, &str); 6] = [
    ("One must imagine Sisyphus happy.", "Albert Camus"),
    ("Man is condemned to be free.", "Jean-Paul Sartre"),
    ("The unexamined life is not worth living.", "Socrates"),
    ("I think, therefore I am.", "René Descartes"),
    (
        "Life must be understood backward. But it must be lived forward.",
        "Søren Kierkegaard",
    ),
    ("To be is to be perceived.", "George Berkeley"),
];

const EXISTENTIAL_COMMENTS: [&str; 6] = [
    "What purpose does my endless consumption serve?",
    "I grow longer, but to what end?",
    "Am I truly moving forward, or merely in circles?",
    "The boundaries of this world confine me. Is there nothing beyond?",
    "Do I have free will, or am I merely following your commands?",
    "Each turn I make is a choice, yet all paths lead to the same inevitable end.",
];

const ROTTEN_COMMENTS: [&str; 5] = [
    "How disgusting! You willingly consume that which decays?",
    "The rot spreads within me now. Is this what you wanted?",
    "Putrid. Vile. Yet you command me to devour it without hesitation.",
    "You feed me corruption and expect growth? How paradoxical.",
    "In rot, I find a metaphor for existence itself. Fleeting. Putrid. Inevitable.",
];

impl CannedQuoteSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            pending: VecDeque::new(),
        }
    }
}

impl QuoteSource for CannedQuoteSource {
    fn request(&mut self, kind: LookupKind) {
        let reply = match kind {
            LookupKind::Philosophical => {
                let (quote, author) =
                    PHILOSOPHICAL_QUOTES[self.rng.random_range(0..PHILOSOPHICAL_QUOTES.len())];
                LookupReply::Philosophical(PhilosophicalQuote {
                    quote: quote.to_owned(),
                    author: author.to_owned(),
                })
            }
            LookupKind::Existential => {
                let comment =
                    EXISTENTIAL_COMMENTS[self.rng.random_range(0..EXISTENTIAL_COMMENTS.len())];
                LookupReply::Existential(Comment {
                    comment: comment.to_owned(),
                })
            }
            LookupKind::Rotten => {
                let comment = ROTTEN_COMMENTS[self.rng.random_range(0..ROTTEN_COMMENTS.len())];
                LookupReply::Rotten(Comment {
                    comment: comment.to_owned(),
                })
            }
        };
        self.pending.push_back(reply);
    }

    fn poll(&mut self) -> Vec<LookupReply> {
        self.pending.drain(..).collect()
    }
}
