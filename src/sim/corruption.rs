//! Corruption metric derived from eaten-food history
//!
//! Corruption is never accumulated incrementally: every update recomputes the
//! percent from the two raw counters, so eating fresh food dilutes the ratio
//! and the derived value can fall as well as rise.

use serde::{Deserialize, Serialize};

use crate::consts::{CORRUPTION_SCALE, SUPER_THRESHOLD};

/// Corruption derived from the eaten-food counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CorruptionState {
    pub total_food_eaten: u32,
    pub rotten_food_eaten: u32,
    /// In `[0, SUPER_THRESHOLD]`
    pub corruption_percent: f32,
    /// True exactly while `corruption_percent` sits at the threshold
    pub super_corrupted: bool,
}

/// Edge events produced by one corruption update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorruptionEdges {
    pub became_super_corrupted: bool,
    pub recovered_from_super_corrupted: bool,
}

/// Recompute corruption from the raw counters and report threshold
/// crossings relative to `previous`. Pure; the caller reacts to the edges.
pub fn update(previous: &CorruptionState, total: u32, rotten: u32) -> (CorruptionState, CorruptionEdges) {
    debug_assert!(rotten <= total);
    let corruption_percent = if total > 0 {
        ((rotten as f32 / total as f32) * CORRUPTION_SCALE).min(SUPER_THRESHOLD)
    } else {
        0.0
    };
    let super_corrupted = corruption_percent >= SUPER_THRESHOLD;
    let next = CorruptionState {
        total_food_eaten: total,
        rotten_food_eaten: rotten,
        corruption_percent,
        super_corrupted,
    };
    let edges = CorruptionEdges {
        became_super_corrupted: super_corrupted && !previous.super_corrupted,
        recovered_from_super_corrupted: !super_corrupted && previous.super_corrupted,
    };
    (next, edges)
}
