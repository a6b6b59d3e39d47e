//! Food lifecycle: spawning, aging, rot classification
//!
//! Food items age from fresh to rotten in place. Rot never destroys an item;
//! only consumption does. Spawning keeps the occupancy invariant: no food on
//! the snake, no two foods on one cell.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{
    FOOD_SPAWN_INTERVAL_MS, FRESH_DURATION_MS, GRID_SIZE, MAX_FOOD_ITEMS,
    MIN_FOOD_SPAWN_INTERVAL_MS, ROT_WARNING_WINDOW_MS, ROTTEN_FOOD_START, SPAWN_ATTEMPTS,
};

use super::grid::{self, GridPosition};
use super::snake::Snake;

/// Freshness of a food item at a moment in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Freshness {
    Fresh,
    AboutToRot,
    Rotten,
}

impl Freshness {
    pub fn is_rotten(self) -> bool {
        matches!(self, Freshness::Rotten)
    }
}

/// A food item on the grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: u32,
    pub position: GridPosition,
    /// Spawn timestamp in session milliseconds
    pub created_at: u64,
}

impl FoodItem {
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.created_at)
    }
}

/// Classify a food item's freshness at `now`.
///
/// Rot is gated on progress: until the player has eaten `ROTTEN_FOOD_START`
/// foods in total, every item reads as fresh regardless of age.
pub fn classify(food: &FoodItem, total_food_eaten: u32, now: u64) -> Freshness {
    if total_food_eaten < ROTTEN_FOOD_START {
        return Freshness::Fresh;
    }
    let age = food.age(now);
    if age >= FRESH_DURATION_MS {
        Freshness::Rotten
    } else if age + ROT_WARNING_WINDOW_MS >= FRESH_DURATION_MS {
        Freshness::AboutToRot
    } else {
        Freshness::Fresh
    }
}

/// The live food set plus the escalating spawn interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodField {
    foods: Vec<FoodItem>,
    spawn_interval: u64,
    next_id: u32,
}

impl Default for FoodField {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodField {
    pub fn new() -> Self {
        Self {
            foods: Vec::new(),
            spawn_interval: FOOD_SPAWN_INTERVAL_MS,
            next_id: 1,
        }
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.foods
    }

    pub fn len(&self) -> usize {
        self.foods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    /// Current period of the spawn timer
    pub fn spawn_interval(&self) -> u64 {
        self.spawn_interval
    }

    /// Shrink the spawn interval, floored at the configured minimum. This is
    /// the escalation mechanism: pressure rises as the game progresses.
    pub fn shrink_interval(&mut self, decrement: u64) {
        self.spawn_interval = self
            .spawn_interval
            .saturating_sub(decrement)
            .max(MIN_FOOD_SPAWN_INTERVAL_MS);
    }

    /// Spawn one food item on a free cell. Always succeeds; see
    /// [`FoodField::free_cell`] for the degradation policy.
    pub fn spawn<R: Rng>(&mut self, snake: &Snake, rng: &mut R, now: u64) -> &FoodItem {
        let position = self.free_cell(snake, rng);
        let item = FoodItem {
            id: self.next_id,
            position,
            created_at: now,
        };
        self.next_id += 1;
        self.foods.push(item);
        self.foods.last().expect("just pushed")
    }

    /// Timer entry point: spawn only while below the live-item cap.
    pub fn maybe_spawn<R: Rng>(
        &mut self,
        snake: &Snake,
        rng: &mut R,
        now: u64,
    ) -> Option<&FoodItem> {
        if self.foods.len() >= MAX_FOOD_ITEMS {
            return None;
        }
        Some(self.spawn(snake, rng, now))
    }

    /// Place a food item on a specific cell, bypassing random selection.
    /// No occupancy check; callers setting up scripted boards own that.
    pub fn place_at(&mut self, position: GridPosition, now: u64) -> &FoodItem {
        let item = FoodItem {
            id: self.next_id,
            position,
            created_at: now,
        };
        self.next_id += 1;
        self.foods.push(item);
        self.foods.last().expect("just pushed")
    }

    /// Remove and return the first food at `pos`, if any. First match wins
    /// should foods ever overlap; spawning prevents overlap in practice.
    pub fn take_at(&mut self, pos: GridPosition) -> Option<FoodItem> {
        let idx = self.foods.iter().position(|f| f.position == pos)?;
        Some(self.foods.remove(idx))
    }

    fn is_free(&self, pos: GridPosition, snake: &Snake) -> bool {
        !grid::occupied_by_snake(pos, snake) && !self.foods.iter().any(|f| f.position == pos)
    }

    /// Pick an unoccupied cell: bounded random attempts, then a row-major
    /// scan for the first free cell. A completely full grid is practically
    /// unreachable; if it happens anyway the last candidate is returned
    /// rather than failing.
    fn free_cell<R: Rng>(&self, snake: &Snake, rng: &mut R) -> GridPosition {
        let mut candidate = GridPosition::new(0, 0);
        for _ in 0..SPAWN_ATTEMPTS {
            candidate = GridPosition::new(
                rng.random_range(0..GRID_SIZE),
                rng.random_range(0..GRID_SIZE),
            );
            if self.is_free(candidate, snake) {
                return candidate;
            }
        }
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let pos = GridPosition::new(x, y);
                if self.is_free(pos, snake) {
                    log::debug!("food placement fell back to grid scan: {pos:?}");
                    return pos;
                }
            }
        }
        log::debug!("no free cell on the grid; placing food at {candidate:?}");
        candidate
    }
}
