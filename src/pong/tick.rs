//! Fixed timestep Laser Pong tick

use rand::Rng;

use super::state::{
    AI_EASE, AI_WHIFF_CHANCE, AI_WHIFF_SPEED, BALL_RADIUS, LASER_SPEED, PADDLE_FACE,
    PADDLE_HEIGHT, POWERUP_BOX, PongState, Side,
};
use crate::consts::{PONG_HEIGHT, PONG_WIDTH};

/// Player commands applied on one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PongInput {
    /// Keyboard paddle movement in pixels (signed, +down)
    pub paddle_delta: f32,
    /// Touch drag: place the paddle top here (pre-offset by the shell)
    pub paddle_target_y: Option<f32>,
    pub shoot: bool,
}

/// Advance the match by one fixed timestep
pub fn tick(state: &mut PongState, input: &PongInput, dt: f32) {
    state.time += dt;
    state.left.cooldown = (state.left.cooldown - dt).max(0.0);
    state.right.cooldown = (state.right.cooldown - dt).max(0.0);

    if state.paused {
        state.pause_timer -= dt;
        if state.pause_timer <= 0.0 {
            state.reset_round();
        }
        return;
    }

    apply_player_input(state, input);

    // Ball
    state.ball_pos += state.ball_vel * dt;
    if state.ball_pos.y - BALL_RADIUS <= 0.0 || state.ball_pos.y + BALL_RADIUS >= PONG_HEIGHT {
        state.ball_vel.y = -state.ball_vel.y;
    }

    if state.left.alive()
        && state.ball_pos.x - BALL_RADIUS <= PADDLE_FACE
        && state.left.covers(state.ball_pos.y)
    {
        state.ball_vel.x = -state.ball_vel.x;
    } else if state.right.alive()
        && state.ball_pos.x + BALL_RADIUS >= PONG_WIDTH - PADDLE_FACE
        && state.right.covers(state.ball_pos.y)
    {
        // Fast balls give the AI a chance to whiff
        let whiff = state.ball_vel.y.abs() > AI_WHIFF_SPEED
            && state.rng.random_bool(AI_WHIFF_CHANCE);
        if !whiff {
            state.ball_vel.x = -state.ball_vel.x;
        }
    }

    if state.ball_pos.x <= 0.0 {
        state.score_right += 1;
        state.pause_round();
        return;
    } else if state.ball_pos.x >= PONG_WIDTH {
        state.score_left += 1;
        state.pause_round();
        return;
    }

    // AI paddle eases toward the ball and fires on schedule
    if state.right.alive() {
        let target = state.ball_pos.y - PADDLE_HEIGHT / 2.0;
        state.right.y += (target - state.right.y) * AI_EASE;
        state.right.y = state.right.y.clamp(0.0, PONG_HEIGHT - PADDLE_HEIGHT);

        if state.time > state.ai_next_shot {
            state.shoot(Side::Right);
            state.schedule_ai_shot();
        }
    }

    update_lasers(state, dt);
    collect_power_up(state);

    let mut expired = false;
    if let Some(power_up) = &mut state.power_up {
        if let Some(linger) = &mut power_up.despawn {
            *linger -= dt;
            expired = *linger <= 0.0;
        }
    }
    if expired {
        state.power_up = None;
    }

    if state.power_up_due() {
        state.spawn_power_up();
    }
}

fn apply_player_input(state: &mut PongState, input: &PongInput) {
    let max_y = PONG_HEIGHT - PADDLE_HEIGHT;
    if let Some(target) = input.paddle_target_y {
        state.left.y = target.clamp(0.0, max_y);
    } else if input.paddle_delta != 0.0 {
        state.left.y = (state.left.y + input.paddle_delta).clamp(0.0, max_y);
    }
    if input.shoot {
        state.shoot(Side::Left);
    }
}

/// Move every beam and resolve paddle hits. Off-field beams are dropped
/// before moving, so a beam gets one last frame at the field edge.
fn update_lasers(state: &mut PongState, dt: f32) {
    state
        .lasers
        .retain(|l| l.pos.x >= 0.0 && l.pos.x <= PONG_WIDTH);

    let mut idx = 0;
    while idx < state.lasers.len() {
        let dir = match state.lasers[idx].owner {
            Side::Left => 1.0,
            Side::Right => -1.0,
        };
        state.lasers[idx].pos.x += LASER_SPEED * dir * dt;

        let laser = state.lasers[idx];
        let hit = match laser.owner {
            Side::Left => {
                state.right.alive()
                    && laser.pos.x >= PONG_WIDTH - PADDLE_FACE
                    && state.right.covers(laser.pos.y)
            }
            Side::Right => {
                state.left.alive()
                    && laser.pos.x <= PADDLE_FACE
                    && state.left.covers(laser.pos.y)
            }
        };
        if !hit {
            idx += 1;
            continue;
        }

        state.lasers.remove(idx);
        match laser.owner {
            Side::Left => {
                state.right.health -= if laser.double { 2 } else { 1 };
                if state.right.health <= 0 {
                    state.pause_round();
                }
            }
            Side::Right => {
                state.left.health -= 1;
                if state.left.health <= 0 {
                    state.pause_round();
                }
            }
        }
    }
}

/// A player beam crossing the power-up hitbox collects it
fn collect_power_up(state: &mut PongState) {
    let Some(power_up) = state.power_up else {
        return;
    };
    let hit = state.lasers.iter().position(|l| {
        l.owner == Side::Left
            && (l.pos.x - power_up.pos.x).abs() <= POWERUP_BOX
            && (l.pos.y - power_up.pos.y).abs() <= POWERUP_BOX
    });
    if let Some(idx) = hit {
        state.lasers.remove(idx);
        state.apply_power_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PONG_DT;
    use crate::pong::state::{
        BALL_SPEED, LASER_COOLDOWN, MAX_HEALTH, PowerUp, PowerUpKind, ROUND_PAUSE,
    };
    use glam::vec2;

    fn run(state: &mut PongState, ticks: u32) {
        for _ in 0..ticks {
            tick(state, &PongInput::default(), PONG_DT);
        }
    }

    #[test]
    fn test_ball_bounces_off_top() {
        let mut state = PongState::new(1);
        state.ball_pos = vec2(400.0, BALL_RADIUS + 1.0);
        state.ball_vel = vec2(0.0, -BALL_SPEED);
        run(&mut state, 1);
        assert!(state.ball_vel.y > 0.0);
    }

    #[test]
    fn test_player_paddle_returns_ball() {
        let mut state = PongState::new(2);
        state.left.y = 250.0;
        state.ball_pos = vec2(PADDLE_FACE + BALL_RADIUS + 1.0, 300.0);
        state.ball_vel = vec2(-BALL_SPEED, 0.0);
        run(&mut state, 1);
        assert!(state.ball_vel.x > 0.0);
    }

    #[test]
    fn test_dead_paddle_lets_ball_through() {
        let mut state = PongState::new(3);
        state.left.health = 0;
        state.left.y = 250.0;
        state.ball_pos = vec2(PADDLE_FACE + BALL_RADIUS + 1.0, 300.0);
        state.ball_vel = vec2(-BALL_SPEED, 0.0);
        run(&mut state, 1);
        assert!(state.ball_vel.x < 0.0);
    }

    #[test]
    fn test_score_and_round_reset() {
        let mut state = PongState::new(4);
        state.ball_pos = vec2(3.0, 300.0);
        state.ball_vel = vec2(-BALL_SPEED, 0.0);
        state.left.y = 0.0;
        run(&mut state, 1);
        assert_eq!(state.score_right, 1);
        assert!(state.paused);

        // Round restarts after the pause; ball is back near center
        let pause_ticks = (ROUND_PAUSE / PONG_DT) as u32 + 2;
        run(&mut state, pause_ticks);
        assert!(!state.paused);
        assert!((state.ball_pos - vec2(400.0, 300.0)).length() < 30.0);
        assert_eq!(state.score_right, 1);
    }

    #[test]
    fn test_laser_damages_ai_paddle() {
        let mut state = PongState::new(5);
        state.right.y = 250.0;
        state.lasers.push(crate::pong::state::Laser {
            pos: vec2(PONG_WIDTH - PADDLE_FACE - 5.0, 300.0),
            owner: Side::Left,
            double: false,
        });
        run(&mut state, 1);
        assert_eq!(state.right.health, MAX_HEALTH - 1);
        assert!(state.lasers.is_empty());
    }

    #[test]
    fn test_double_laser_deals_two() {
        let mut state = PongState::new(6);
        state.right.y = 250.0;
        state.lasers.push(crate::pong::state::Laser {
            pos: vec2(PONG_WIDTH - PADDLE_FACE - 5.0, 300.0),
            owner: Side::Left,
            double: true,
        });
        run(&mut state, 1);
        assert_eq!(state.right.health, MAX_HEALTH - 2);
    }

    #[test]
    fn test_paddle_death_pauses_round() {
        let mut state = PongState::new(7);
        state.right.y = 250.0;
        state.right.health = 1;
        state.lasers.push(crate::pong::state::Laser {
            pos: vec2(PONG_WIDTH - PADDLE_FACE - 5.0, 300.0),
            owner: Side::Left,
            double: false,
        });
        run(&mut state, 1);
        assert!(state.paused);
    }

    #[test]
    fn test_player_laser_collects_power_up() {
        let mut state = PongState::new(8);
        state.power_up = Some(PowerUp {
            pos: vec2(400.0, 100.0),
            kind: PowerUpKind::Health,
            despawn: None,
        });
        state.left.health = 1;
        state.lasers.push(crate::pong::state::Laser {
            pos: vec2(395.0, 100.0),
            owner: Side::Left,
            double: false,
        });
        run(&mut state, 1);
        assert!(state.power_up.is_none());
        assert_eq!(state.left.health, 1 + 3);
        assert!(state.lasers.is_empty());
    }

    #[test]
    fn test_power_up_spawn_gate() {
        let mut state = PongState::new(9);
        assert!(!state.power_up_due());
        // Park the ball in safe vertical flight so the round runs long
        state.ball_pos = vec2(400.0, 300.0);
        state.ball_vel = vec2(0.0, BALL_SPEED);
        let ticks = (11.0 / PONG_DT) as u32;
        run(&mut state, ticks);
        assert!(state.power_up.is_some());
        let pu = state.power_up.unwrap();
        assert!(pu.pos.x >= 30.0 && pu.pos.x <= PONG_WIDTH - 30.0);
        assert!(pu.pos.y >= 30.0 && pu.pos.y <= PONG_HEIGHT - 30.0);
    }

    #[test]
    fn test_input_moves_and_clamps_paddle() {
        let mut state = PongState::new(10);
        let input = PongInput {
            paddle_delta: -20.0,
            paddle_target_y: None,
            shoot: false,
        };
        let before = state.left.y;
        tick(&mut state, &input, PONG_DT);
        assert_eq!(state.left.y, before - 20.0);

        let input = PongInput {
            paddle_delta: 0.0,
            paddle_target_y: Some(10_000.0),
            shoot: false,
        };
        tick(&mut state, &input, PONG_DT);
        assert_eq!(state.left.y, PONG_HEIGHT - PADDLE_HEIGHT);
    }

    #[test]
    fn test_shoot_input_honors_cooldown() {
        let mut state = PongState::new(11);
        let input = PongInput {
            paddle_delta: 0.0,
            paddle_target_y: None,
            shoot: true,
        };
        tick(&mut state, &input, PONG_DT);
        tick(&mut state, &input, PONG_DT);
        let player_lasers = state
            .lasers
            .iter()
            .filter(|l| l.owner == Side::Left)
            .count();
        assert_eq!(player_lasers, 1);
        assert!(state.left.cooldown > LASER_COOLDOWN - 3.0 * PONG_DT);
    }

    #[test]
    fn test_determinism() {
        let mut a = PongState::new(777);
        let mut b = PongState::new(777);
        let input = PongInput {
            paddle_delta: 0.0,
            paddle_target_y: Some(250.0),
            shoot: true,
        };
        for i in 0..1200 {
            let inp = if i % 10 == 0 {
                input
            } else {
                PongInput::default()
            };
            tick(&mut a, &inp, PONG_DT);
            tick(&mut b, &inp, PONG_DT);
        }
        assert_eq!(a.ball_pos, b.ball_pos);
        assert_eq!(a.score_left, b.score_left);
        assert_eq!(a.score_right, b.score_right);
        assert_eq!(a.lasers.len(), b.lasers.len());
    }
}
