//! Glitch Snake state
//!
//! One flat state record advanced by `tick`. Everything the renderer needs
//! (timer bars, banners, death blink) lives here too, so drawing stays a
//! pure read.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::grid::{ALL_DIRECTIONS, Cell, Direction};

/// Seconds on the glitch countdown after a reset
pub const GLITCH_TIMER_START: f32 = 10.0;
/// Corrupted drivers duration (seconds)
pub const CORRUPTED_DURATION: f32 = 15.0;
/// Partition walls lifetime (seconds)
pub const PARTITIONS_DURATION: f32 = 15.0;
/// Fragmented drive duration (seconds)
pub const FRAGMENTED_DURATION: f32 = 30.0;
/// Magnetic field duration (seconds)
pub const MAGNETIC_DURATION: f32 = 30.0;
/// Event banner hold time (seconds)
pub const BANNER_DURATION: f32 = 2.0;
/// Glitch time gained per bit / extra for stabilizing bits
pub const BIT_TIME_BONUS: f32 = 3.0;
pub const STABILIZING_TIME_BONUS: f32 = 10.0;
/// Bug swarm size cap
pub const MAX_BUGS: usize = 5;
/// Bug moves that are straight and invincible after spawn
pub const BUG_INITIAL_MOVES: u32 = 10;
/// Death blink interval (seconds)
pub const DEATH_BLINK_INTERVAL: f32 = 0.25;

/// The collectible bit on the board
#[derive(Debug, Clone, Copy)]
pub struct Bit {
    pub cell: Cell,
    /// Grants a large glitch-timer bonus when eaten (1-in-30 spawn)
    pub stabilizing: bool,
    /// Activates the magnetic field when eaten (1-in-45 spawn)
    pub magnetic: bool,
}

/// A hostile bug worm spawned by the Bug Attack glitch
#[derive(Debug, Clone)]
pub struct Bug {
    /// Head first, like the snake
    pub segments: Vec<Cell>,
    pub direction: Direction,
    /// Moves taken so far; the first `BUG_INITIAL_MOVES` are straight
    pub moves_taken: u32,
    /// Ticks until the next random direction change
    pub turn_timer: i32,
}

/// A severed tail piece left on the board; touching it rejoins it
#[derive(Debug, Clone)]
pub struct LostTail {
    pub cells: Vec<Cell>,
}

/// On-screen event banners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakeEvent {
    BugAttack,
    DataScramble,
    PartitionsCreated,
    CorruptedDrivers,
    FragmentedDrive,
    ControlsRestored,
    StabilizingBit,
    MagneticBit,
    MagneticFieldActive,
}

impl SnakeEvent {
    pub fn message(&self) -> &'static str {
        match self {
            SnakeEvent::BugAttack => "Bug Attack!",
            SnakeEvent::DataScramble => "Data Scramble!",
            SnakeEvent::PartitionsCreated => "Partitions Created!",
            SnakeEvent::CorruptedDrivers => "Corrupted Drivers!",
            SnakeEvent::FragmentedDrive => "Fragmented Drive!",
            SnakeEvent::ControlsRestored => "Controls Restored!",
            SnakeEvent::StabilizingBit => "Stabilizing Bit!",
            SnakeEvent::MagneticBit => "Magnetic Bit!",
            SnakeEvent::MagneticFieldActive => "Magnetic Field Active!",
        }
    }
}

/// Complete Glitch Snake state
#[derive(Debug, Clone)]
pub struct SnakeState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Body cells, head first
    pub snake: Vec<Cell>,
    pub dir: Direction,
    /// Direction changes waiting to be applied, one per tick
    pub move_queue: VecDeque<Direction>,
    pub bits_collected: u32,
    /// Best run seen this session (persisted by the shell)
    pub high_score: u32,
    pub bit: Option<Bit>,
    pub alive: bool,
    /// Death blink animation counter (body drawn on even counts)
    pub death_blinks: u32,
    death_blink_timer: f32,
    /// Seconds until the next glitch fires
    pub glitch_timer: f32,
    pub bugs: Vec<Bug>,
    /// Temporary wall segments; empty means inactive
    pub partitions: Vec<Vec<Cell>>,
    pub partitions_timer: f32,
    /// Corrupted drivers: > 0 means inputs are inverted
    pub corrupted_timer: f32,
    /// Fragmented drive: > 0 means x-edges wrap and death columns are live
    pub fragmented_timer: f32,
    pub death_columns: [i32; 2],
    /// Magnetic field: > 0 means the bit is dragged toward the head
    pub magnetic_timer: f32,
    pub lost_segments: Vec<LostTail>,
    /// Absorbed tail cells, consumed one per tick to grow the snake
    pub rejoining: VecDeque<Cell>,
    pub banner: Option<(SnakeEvent, f32)>,
}

impl SnakeState {
    /// Create a fresh board with the given seed and session high score
    pub fn new(seed: u64, high_score: u32) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            snake: Vec::new(),
            dir: Direction::Right,
            move_queue: VecDeque::new(),
            bits_collected: 0,
            high_score,
            bit: None,
            alive: true,
            death_blinks: 0,
            death_blink_timer: 0.0,
            glitch_timer: GLITCH_TIMER_START,
            bugs: Vec::new(),
            partitions: Vec::new(),
            partitions_timer: 0.0,
            corrupted_timer: 0.0,
            fragmented_timer: 0.0,
            death_columns: [0, 0],
            magnetic_timer: 0.0,
            lost_segments: Vec::new(),
            rejoining: VecDeque::new(),
            banner: None,
        };
        state.reset_board();
        state
    }

    /// Reset to the starting layout, keeping RNG stream and high score
    pub fn reset_board(&mut self) {
        self.snake = vec![Cell::new(33, 33)];
        self.dir = ALL_DIRECTIONS[self.rng.random_range(0..ALL_DIRECTIONS.len())];
        self.move_queue.clear();
        self.bits_collected = 0;
        self.alive = true;
        self.death_blinks = 0;
        self.death_blink_timer = 0.0;
        self.glitch_timer = GLITCH_TIMER_START;
        self.bugs.clear();
        self.partitions.clear();
        self.partitions_timer = 0.0;
        self.corrupted_timer = 0.0;
        self.fragmented_timer = 0.0;
        self.death_columns = [0, 0];
        self.magnetic_timer = 0.0;
        self.lost_segments.clear();
        self.rejoining.clear();
        self.banner = None;
        self.spawn_bit();
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    /// Queue a turn from input; same-direction and reversing turns are ignored
    pub fn queue_turn(&mut self, dir: Direction) {
        if !self.alive {
            return;
        }
        let current = self.move_queue.back().copied().unwrap_or(self.dir);
        if dir == current || dir == current.opposite() {
            return;
        }
        self.move_queue.push_back(dir);
    }

    /// True if any entity occupies the cell (spawn placement check)
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
            || self.bit.is_some_and(|b| b.cell == cell)
            || self
                .bugs
                .iter()
                .any(|bug| bug.segments.contains(&cell))
            || self.partitions.iter().any(|p| p.contains(&cell))
            || self
                .lost_segments
                .iter()
                .any(|ls| ls.cells.contains(&cell))
    }

    /// Place a new bit on a free cell; rare rolls make it special
    pub fn spawn_bit(&mut self) {
        let mut cell = self.random_play_cell();
        let mut attempts = 0;
        while self.is_occupied(cell) && attempts < 100 {
            cell = self.random_play_cell();
            attempts += 1;
        }
        let stabilizing = self.rng.random_range(0..30) == 0;
        let magnetic = self.rng.random_range(0..45) == 0;
        if stabilizing {
            self.show_event(SnakeEvent::StabilizingBit);
        }
        if magnetic {
            self.show_event(SnakeEvent::MagneticBit);
        }
        self.bit = Some(Bit {
            cell,
            stabilizing,
            magnetic,
        });
    }

    pub fn random_play_cell(&mut self) -> Cell {
        Cell::new(self.rng.random_range(1..=64), self.rng.random_range(1..=64))
    }

    pub fn show_event(&mut self, event: SnakeEvent) {
        self.banner = Some((event, BANNER_DURATION));
    }

    /// Would moving the head onto this cell kill the snake?
    pub fn is_fatal(&self, head: Cell) -> bool {
        let fragmented = self.fragmented_timer > 0.0;
        if fragmented && (head.x == self.death_columns[0] || head.x == self.death_columns[1]) {
            return true;
        }
        (!head.in_play_area() && !fragmented)
            || self.snake.contains(&head)
            || self.bugs.iter().any(|b| b.segments.contains(&head))
            || self.partitions.iter().any(|p| p.contains(&head))
    }

    /// Kill the snake, committing the high score
    pub fn die(&mut self) {
        self.alive = false;
        self.death_blinks = 0;
        self.death_blink_timer = 0.0;
        if self.bits_collected > self.high_score {
            self.high_score = self.bits_collected;
        }
    }

    /// Advance the blink animation while dead
    pub fn tick_death_animation(&mut self, dt: f32) {
        self.death_blink_timer += dt;
        while self.death_blink_timer >= DEATH_BLINK_INTERVAL {
            self.death_blink_timer -= DEATH_BLINK_INTERVAL;
            self.death_blinks += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_layout() {
        let state = SnakeState::new(7, 0);
        assert_eq!(state.snake, vec![Cell::new(33, 33)]);
        assert!(state.alive);
        assert!(state.bit.is_some());
        assert!(state.bit.unwrap().cell.in_play_area());
        assert!((state.glitch_timer - GLITCH_TIMER_START).abs() < f32::EPSILON);
    }

    #[test]
    fn test_queue_turn_rejects_reversal() {
        let mut state = SnakeState::new(7, 0);
        state.dir = Direction::Right;
        state.move_queue.clear();
        state.queue_turn(Direction::Left);
        assert!(state.move_queue.is_empty());
        state.queue_turn(Direction::Up);
        assert_eq!(state.move_queue.len(), 1);
        // Reversal check applies against the last queued turn, not just dir
        state.queue_turn(Direction::Down);
        assert_eq!(state.move_queue.len(), 1);
    }

    #[test]
    fn test_die_commits_high_score() {
        let mut state = SnakeState::new(7, 5);
        state.bits_collected = 9;
        state.die();
        assert!(!state.alive);
        assert_eq!(state.high_score, 9);

        let mut state = SnakeState::new(7, 20);
        state.bits_collected = 9;
        state.die();
        assert_eq!(state.high_score, 20);
    }

    #[test]
    fn test_is_fatal_walls_and_death_columns() {
        let mut state = SnakeState::new(7, 0);
        assert!(state.is_fatal(Cell::new(0, 10)));
        assert!(state.is_fatal(Cell::new(10, 65)));
        assert!(!state.is_fatal(Cell::new(10, 10)));

        // Fragmented drive: walls stop killing, death columns start
        state.fragmented_timer = 10.0;
        state.death_columns = [20, 21];
        assert!(!state.is_fatal(Cell::new(0, 10)));
        assert!(state.is_fatal(Cell::new(20, 10)));
        assert!(state.is_fatal(Cell::new(21, 40)));
    }

    #[test]
    fn test_spawn_bit_avoids_occupied() {
        let mut state = SnakeState::new(11, 0);
        state.spawn_bit();
        let bit = state.bit.unwrap();
        assert!(!state.snake.contains(&bit.cell));
        assert!(bit.cell.in_play_area());
    }
}
