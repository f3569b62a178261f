//! Laser Pong simulation
//!
//! Pure and deterministic like the snake sim: fixed 60 Hz timestep,
//! seeded RNG, no platform dependencies. The shell owns rendering and
//! input translation.

pub mod state;
pub mod tick;

pub use state::{Laser, Paddle, PongState, PowerUp, PowerUpKind, Side};
pub use tick::{PongInput, tick};
