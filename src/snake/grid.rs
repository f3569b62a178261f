//! Board geometry for Glitch Snake
//!
//! The board is a 66x66 tile grid; tiles 1..=64 are playable and the
//! outermost ring is wall. Cells are addressed with signed coordinates so
//! intermediate math (scramble offsets, magnetic drag) can go out of range
//! before being clamped.

use crate::consts::TILE_COUNT;

/// A single board tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if the cell lies inside the playable area (walls excluded)
    #[inline]
    pub fn in_play_area(&self) -> bool {
        self.x >= 1 && self.x <= TILE_COUNT - 2 && self.y >= 1 && self.y <= TILE_COUNT - 2
    }

    /// Cell one step in the given direction
    #[inline]
    pub fn step(&self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev distance (used to decide whether scrambled segments stay connected)
    #[inline]
    pub fn chebyshev(&self, other: &Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// Euclidean distance (used by the magnetic bit)
    #[inline]
    pub fn distance(&self, other: &Cell) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Clamp into the playable area
    pub fn clamped(&self) -> Self {
        Self::new(
            self.x.clamp(1, TILE_COUNT - 2),
            self.y.clamp(1, TILE_COUNT - 2),
        )
    }
}

/// A cardinal movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// All four directions, in a fixed order for deterministic random picks
pub const ALL_DIRECTIONS: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

impl Direction {
    #[inline]
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    #[inline]
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Corrupted drivers invert every queued move
    #[inline]
    pub fn inverted(&self) -> Direction {
        self.opposite()
    }
}
