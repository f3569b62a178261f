//! Neon Arcade - two canvas arcade games in one shell
//!
//! Core modules:
//! - `pong`: Laser Pong simulation (ball, paddles, lasers, power-ups)
//! - `snake`: Glitch Snake simulation (grid snake plus system glitches)
//! - `render`: Canvas 2D painting (wasm only)
//! - `audio`: Web Audio tone synthesis (wasm only)
//! - `highscores` / `settings`: LocalStorage persistence

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod pong;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod settings;
pub mod snake;

pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Pong fixed simulation timestep (60 Hz)
    pub const PONG_DT: f32 = 1.0 / 60.0;
    /// Snake fixed simulation timestep (15 Hz - chunky grid steps)
    pub const SNAKE_DT: f32 = 1.0 / 15.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Pong field dimensions (pixels)
    pub const PONG_WIDTH: f32 = 800.0;
    pub const PONG_HEIGHT: f32 = 600.0;

    /// Snake board: 66x66 tiles of 8px; tiles 1..=64 are playable
    pub const TILE_COUNT: i32 = 66;
    pub const GRID_SIZE: f32 = 8.0;
    /// Data scramble splits the board into 4x4 sections of this many tiles
    pub const SECTION_SIZE: i32 = 16;
    /// Extra canvas rows below the board for timer bars
    pub const HUD_HEIGHT: f32 = 80.0;
}
