//! Grid coordinate space and occupancy queries
//!
//! The board is a fixed square of `GRID_SIZE` x `GRID_SIZE` cells. Everything
//! here is a pure function; the only state is the compile-time side length.

use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

use super::snake::Snake;

/// A cell on the play grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in the given direction. May leave the grid;
    /// bounds are checked separately by [`in_bounds`].
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Movement direction with its unit vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector `(dx, dy)`; y grows downward
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The exact reverse of this direction
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Whether a position lies inside the grid
pub fn in_bounds(pos: GridPosition) -> bool {
    pos.x >= 0 && pos.x < GRID_SIZE && pos.y >= 0 && pos.y < GRID_SIZE
}

/// Whether any snake segment occupies the position
pub fn occupied_by_snake(pos: GridPosition, snake: &Snake) -> bool {
    snake.segments().any(|seg| seg == pos)
}

/// The cell at the center of the grid, where a new snake starts
pub fn center() -> GridPosition {
    GridPosition::new(GRID_SIZE / 2, GRID_SIZE / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_accept_corners() {
        assert!(in_bounds(GridPosition::new(0, 0)));
        assert!(in_bounds(GridPosition::new(GRID_SIZE - 1, GRID_SIZE - 1)));
    }

    #[test]
    fn bounds_reject_each_edge() {
        assert!(!in_bounds(GridPosition::new(-1, 5)));
        assert!(!in_bounds(GridPosition::new(GRID_SIZE, 5)));
        assert!(!in_bounds(GridPosition::new(5, -1)));
        assert!(!in_bounds(GridPosition::new(5, GRID_SIZE)));
    }

    #[test]
    fn opposite_is_an_involution() {
        for dir in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn step_adds_the_unit_vector() {
        let pos = GridPosition::new(4, 7);
        assert_eq!(pos.step(Direction::Up), GridPosition::new(4, 6));
        assert_eq!(pos.step(Direction::Right), GridPosition::new(5, 7));
    }

    #[test]
    fn snake_occupancy_covers_every_segment() {
        let mut snake = Snake::new(GridPosition::new(3, 3));
        snake.advance(GridPosition::new(4, 3), true);
        assert!(occupied_by_snake(GridPosition::new(3, 3), &snake));
        assert!(occupied_by_snake(GridPosition::new(4, 3), &snake));
        assert!(!occupied_by_snake(GridPosition::new(5, 3), &snake));
    }
}
