//! Laser Pong state
//!
//! Flat state record advanced by `tick` at 60 Hz. All speeds are in
//! pixels per second; timers count down in seconds.

use glam::{Vec2, vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{PONG_HEIGHT, PONG_WIDTH};

pub const BALL_RADIUS: f32 = 10.0;
pub const BALL_SPEED: f32 = 300.0;
pub const PADDLE_WIDTH: f32 = 20.0;
pub const PADDLE_HEIGHT: f32 = 100.0;
/// Gap between the field edge and a paddle's outer face
pub const PADDLE_MARGIN: f32 = 10.0;
/// X of the left paddle's inner face (mirrored for the right)
pub const PADDLE_FACE: f32 = PADDLE_MARGIN + PADDLE_WIDTH;
pub const MAX_HEALTH: i32 = 5;
pub const LASER_SPEED: f32 = 600.0;
pub const LASER_WIDTH: f32 = 20.0;
pub const LASER_HEIGHT: f32 = 5.0;
/// Seconds between shots per paddle
pub const LASER_COOLDOWN: f32 = 1.0;
/// Freeze between rounds (seconds)
pub const ROUND_PAUSE: f32 = 2.0;
/// AI paddle easing factor, applied once per tick
pub const AI_EASE: f32 = 0.1;
/// Above this vertical ball speed the AI may whiff
pub const AI_WHIFF_SPEED: f32 = 420.0;
pub const AI_WHIFF_CHANCE: f64 = 0.1;
/// Power-ups spawn only this far into a round
pub const POWERUP_MIN_ROUND_TIME: f32 = 10.0;
/// Minimum seconds between power-up spawns
pub const POWERUP_INTERVAL: f32 = 20.0;
/// Spawn position margin from the field edges
pub const POWERUP_MARGIN: f32 = 30.0;
/// Half-extent of the pickup hitbox
pub const POWERUP_BOX: f32 = 15.0;
/// Shield/double stay on the field this long after pickup
pub const POWERUP_LINGER: f32 = 7.0;
pub const HEALTH_BONUS: i32 = 3;

/// Which paddle; also identifies laser ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Health,
    Shield,
    Double,
}

#[derive(Debug, Clone, Copy)]
pub struct Paddle {
    /// Top edge
    pub y: f32,
    pub health: i32,
    /// Seconds until the next shot is allowed
    pub cooldown: f32,
}

impl Paddle {
    fn new() -> Self {
        Self {
            y: PONG_HEIGHT / 2.0,
            health: MAX_HEALTH,
            cooldown: 0.0,
        }
    }

    pub fn alive(&self) -> bool {
        self.health > 0
    }

    /// True if a point at this height is within the paddle span
    pub fn covers(&self, y: f32) -> bool {
        y >= self.y && y <= self.y + PADDLE_HEIGHT
    }

    pub fn center_y(&self) -> f32 {
        self.y + PADDLE_HEIGHT / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Laser {
    /// Left edge of the beam rect
    pub pos: Vec2,
    pub owner: Side,
    /// Double-damage beam (left side under the Double power-up)
    pub double: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    /// Set on pickup for shield/double; the glyph lingers until it runs out
    pub despawn: Option<f32>,
}

/// Complete Laser Pong state
#[derive(Debug, Clone)]
pub struct PongState {
    pub seed: u64,
    pub rng: Pcg32,
    pub ball_pos: Vec2,
    pub ball_vel: Vec2,
    pub left: Paddle,
    pub right: Paddle,
    pub lasers: Vec<Laser>,
    pub power_up: Option<PowerUp>,
    pub score_left: u32,
    pub score_right: u32,
    pub paused: bool,
    pub pause_timer: f32,
    /// Total simulated seconds, monotonic across rounds
    pub time: f32,
    /// `time` at the last round start
    pub round_start: f32,
    last_power_up: f32,
    /// Absolute `time` of the next scheduled AI shot
    pub ai_next_shot: f32,
}

impl PongState {
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ball_pos: vec2(PONG_WIDTH / 2.0, PONG_HEIGHT / 2.0),
            ball_vel: vec2(BALL_SPEED, -BALL_SPEED),
            left: Paddle::new(),
            right: Paddle::new(),
            lasers: Vec::new(),
            power_up: None,
            score_left: 0,
            score_right: 0,
            paused: false,
            pause_timer: 0.0,
            time: 0.0,
            round_start: 0.0,
            last_power_up: -POWERUP_INTERVAL,
            ai_next_shot: 0.0,
        };
        state.reset_round();
        state
    }

    /// Serve a fresh ball and restore both paddles. Paddle positions and
    /// scores carry over.
    pub fn reset_round(&mut self) {
        self.ball_pos = vec2(PONG_WIDTH / 2.0, PONG_HEIGHT / 2.0);
        let sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.ball_vel = vec2(BALL_SPEED * sign, -BALL_SPEED);
        self.left.health = MAX_HEALTH;
        self.right.health = MAX_HEALTH;
        self.lasers.clear();
        self.power_up = None;
        self.paused = false;
        self.pause_timer = 0.0;
        self.round_start = self.time;
        self.schedule_ai_shot();
    }

    pub fn round_time(&self) -> f32 {
        self.time - self.round_start
    }

    pub fn schedule_ai_shot(&mut self) {
        self.ai_next_shot = self.time + self.rng.random_range(2.0..5.0);
    }

    /// Freeze play; `tick` serves the next round after the pause
    pub fn pause_round(&mut self) {
        self.paused = true;
        self.pause_timer = ROUND_PAUSE;
    }

    /// Fire a laser from a paddle's center, subject to its cooldown.
    /// Left-side beams are double-damage while a Double power-up is on
    /// the field.
    pub fn shoot(&mut self, side: Side) {
        let double = side == Side::Left
            && self
                .power_up
                .is_some_and(|p| p.kind == PowerUpKind::Double);
        let x = match side {
            Side::Left => PADDLE_FACE,
            Side::Right => PONG_WIDTH - PADDLE_FACE,
        };
        let paddle = match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        if paddle.cooldown > 0.0 {
            return;
        }
        paddle.cooldown = LASER_COOLDOWN;
        let y = paddle.center_y();
        self.lasers.push(Laser {
            pos: vec2(x, y),
            owner: side,
            double,
        });
    }

    pub fn spawn_power_up(&mut self) {
        let x = self
            .rng
            .random_range(POWERUP_MARGIN..PONG_WIDTH - POWERUP_MARGIN);
        let y = self
            .rng
            .random_range(POWERUP_MARGIN..PONG_HEIGHT - POWERUP_MARGIN);
        let kind = match self.rng.random_range(0..3) {
            0 => PowerUpKind::Health,
            1 => PowerUpKind::Shield,
            _ => PowerUpKind::Double,
        };
        self.power_up = Some(PowerUp {
            pos: vec2(x, y),
            kind,
            despawn: None,
        });
        self.last_power_up = self.time;
    }

    pub fn power_up_due(&self) -> bool {
        self.round_time() > POWERUP_MIN_ROUND_TIME
            && self.power_up.is_none()
            && self.time - self.last_power_up > POWERUP_INTERVAL
    }

    /// A player laser hit the power-up box
    pub fn apply_power_up(&mut self) {
        let Some(power_up) = &mut self.power_up else {
            return;
        };
        match power_up.kind {
            PowerUpKind::Health => {
                self.left.health = (self.left.health + HEALTH_BONUS).min(MAX_HEALTH);
                self.power_up = None;
            }
            PowerUpKind::Shield | PowerUpKind::Double => {
                if power_up.despawn.is_none() {
                    power_up.despawn = Some(POWERUP_LINGER);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_serving() {
        let state = PongState::new(1);
        assert_eq!(state.ball_pos, vec2(400.0, 300.0));
        assert_eq!(state.ball_vel.y, -BALL_SPEED);
        assert_eq!(state.ball_vel.x.abs(), BALL_SPEED);
        assert_eq!(state.left.health, MAX_HEALTH);
        assert!(!state.paused);
    }

    #[test]
    fn test_shoot_respects_cooldown() {
        let mut state = PongState::new(2);
        state.shoot(Side::Left);
        state.shoot(Side::Left);
        assert_eq!(state.lasers.len(), 1);
        state.left.cooldown = 0.0;
        state.shoot(Side::Left);
        assert_eq!(state.lasers.len(), 2);
    }

    #[test]
    fn test_double_power_up_marks_player_lasers() {
        let mut state = PongState::new(3);
        state.power_up = Some(PowerUp {
            pos: vec2(400.0, 300.0),
            kind: PowerUpKind::Double,
            despawn: None,
        });
        state.shoot(Side::Left);
        assert!(state.lasers[0].double);
        state.right.cooldown = 0.0;
        state.shoot(Side::Right);
        assert!(!state.lasers[1].double);
    }

    #[test]
    fn test_health_power_up_clamps() {
        let mut state = PongState::new(4);
        state.left.health = 4;
        state.power_up = Some(PowerUp {
            pos: vec2(100.0, 100.0),
            kind: PowerUpKind::Health,
            despawn: None,
        });
        state.apply_power_up();
        assert_eq!(state.left.health, MAX_HEALTH);
        assert!(state.power_up.is_none());
    }

    #[test]
    fn test_shield_pickup_starts_linger() {
        let mut state = PongState::new(5);
        state.power_up = Some(PowerUp {
            pos: vec2(100.0, 100.0),
            kind: PowerUpKind::Shield,
            despawn: None,
        });
        state.apply_power_up();
        let pu = state.power_up.unwrap();
        assert_eq!(pu.despawn, Some(POWERUP_LINGER));
    }

    #[test]
    fn test_paddle_covers() {
        let paddle = Paddle {
            y: 200.0,
            health: 5,
            cooldown: 0.0,
        };
        assert!(paddle.covers(200.0));
        assert!(paddle.covers(300.0));
        assert!(!paddle.covers(301.0));
        assert_eq!(paddle.center_y(), 250.0);
    }
}
