//! Glitch Snake simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (15 Hz)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod glitch;
pub mod grid;
pub mod state;
pub mod tick;

pub use grid::{Cell, Direction};
pub use state::{Bit, Bug, SnakeEvent, SnakeState};
pub use tick::{SnakeInput, tick};
