//! Snake body and movement rules
//!
//! The body is an ordered sequence of grid cells, head first. It is owned by
//! the tick engine and mutated only through [`Snake::advance`]; after every
//! committed move no two segments coincide.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::grid::{Direction, GridPosition};

/// The snake: ordered segments, head first, length >= 1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<GridPosition>,
}

impl Snake {
    /// A single-segment snake at `start`
    pub fn new(start: GridPosition) -> Self {
        let mut body = VecDeque::new();
        body.push_back(start);
        Self { body }
    }

    pub fn head(&self) -> GridPosition {
        // length >= 1 always holds
        *self.body.front().unwrap_or(&GridPosition::new(0, 0))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Segments in body order, head first
    pub fn segments(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.body.iter().copied()
    }

    /// Whether any segment occupies `pos`
    pub fn contains(&self, pos: GridPosition) -> bool {
        self.body.contains(&pos)
    }

    /// Where the head would land moving one step in `direction`
    pub fn compute_head(&self, direction: Direction) -> GridPosition {
        self.head().step(direction)
    }

    /// Whether `candidate` collides with the pre-move body.
    ///
    /// The head segment itself is skipped: the candidate is one step away
    /// from it, and the cell it vacates is legal to re-enter.
    pub fn will_collide_with_self(&self, candidate: GridPosition) -> bool {
        self.body.iter().skip(1).any(|&seg| seg == candidate)
    }

    /// Commit a move: prepend the new head; unless the snake grew, drop the
    /// tail so net length is unchanged.
    pub fn advance(&mut self, new_head: GridPosition, grew: bool) {
        self.body.push_front(new_head);
        if !grew {
            let _ = self.body.pop_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_of(cells: &[(i32, i32)]) -> Snake {
        let mut iter = cells.iter();
        let &(x, y) = iter.next().expect("at least one cell");
        let mut snake = Snake::new(GridPosition::new(x, y));
        // grow backwards so the given order is head-first
        for &(x, y) in iter {
            snake.body.push_back(GridPosition::new(x, y));
        }
        snake
    }

    #[test]
    fn advance_without_growth_keeps_length() {
        let mut snake = snake_of(&[(5, 5), (4, 5), (3, 5)]);
        snake.advance(GridPosition::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), GridPosition::new(6, 5));
        assert!(!snake.contains(GridPosition::new(3, 5)));
    }

    #[test]
    fn advance_with_growth_adds_one_segment() {
        let mut snake = snake_of(&[(5, 5), (4, 5)]);
        snake.advance(GridPosition::new(6, 5), true);
        assert_eq!(snake.len(), 3);
        assert!(snake.contains(GridPosition::new(4, 5)));
    }

    #[test]
    fn self_collision_ignores_the_old_head() {
        let snake = snake_of(&[(5, 5), (4, 5), (4, 6), (5, 6)]);
        // doubling back onto the second segment collides
        assert!(snake.will_collide_with_self(GridPosition::new(4, 5)));
        // re-entering the head cell is not a collision; the head moves away
        assert!(!snake.will_collide_with_self(GridPosition::new(5, 5)));
        // an empty cell is fine
        assert!(!snake.will_collide_with_self(GridPosition::new(6, 5)));
    }

    #[test]
    fn tail_cell_counts_as_collision_pre_move() {
        // the pre-move body includes the tail; entering it is a collision
        let snake = snake_of(&[(5, 5), (5, 6), (4, 6), (4, 5)]);
        assert!(snake.will_collide_with_self(GridPosition::new(4, 5)));
    }
}
