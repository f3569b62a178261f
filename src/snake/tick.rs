//! Fixed timestep Glitch Snake tick
//!
//! Advances the board by one 15 Hz step: glitch timers, queued turns,
//! head movement, bit collection, bug simulation, death.

use rand::Rng;

use super::glitch;
use super::grid::{ALL_DIRECTIONS, Direction};
use super::state::{
    BIT_TIME_BONUS, BUG_INITIAL_MOVES, Bit, GLITCH_TIMER_START, MAGNETIC_DURATION,
    STABILIZING_TIME_BONUS, SnakeEvent, SnakeState,
};
use crate::consts::TILE_COUNT;

/// Input commands for a single tick. Turns are queued directly on the
/// state (`SnakeState::queue_turn`) so multiple key presses within one
/// frame are preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeInput {
    /// Restart after death (space/tap)
    pub restart: bool,
}

/// Advance the board by one fixed timestep
pub fn tick(state: &mut SnakeState, input: &SnakeInput, dt: f32) {
    if !state.alive {
        if input.restart {
            state.reset_board();
        } else {
            state.tick_death_animation(dt);
        }
        return;
    }

    update_glitch_timers(state, dt);

    // Apply one queued turn; corrupted drivers invert it
    if let Some(next) = state.move_queue.pop_front() {
        state.dir = if state.corrupted_timer > 0.0 {
            next.inverted()
        } else {
            next
        };
    }

    let mut head = state.head().step(state.dir);

    // Fragmented drive wraps the x-edges instead of killing
    if state.fragmented_timer > 0.0 {
        if head.x <= 0 {
            head.x = TILE_COUNT - 2;
            state.dir = Direction::Left;
        } else if head.x >= TILE_COUNT - 1 {
            head.x = 1;
            state.dir = Direction::Right;
        }
    }

    // Touching a lost tail absorbs it and makes this move safe
    let mut safe_move = false;
    let mut kept = Vec::with_capacity(state.lost_segments.len());
    for seg in std::mem::take(&mut state.lost_segments) {
        if seg.cells.contains(&head) {
            state.rejoining.extend(seg.cells);
            safe_move = true;
        } else {
            kept.push(seg);
        }
    }
    state.lost_segments = kept;

    if !safe_move && state.is_fatal(head) {
        state.die();
        return;
    }

    state.snake.insert(0, head);

    let mut ate = false;

    // Magnetic field drags the bit toward the head. Field pickups score
    // but do not grow the snake; the tail still pops below.
    if state.magnetic_timer > 0.0 {
        if let Some(mut bit) = state.bit {
            let dist = head.distance(&bit.cell);
            if dist <= 1.0 {
                collect_bit(state, bit);
            } else if dist <= 5.0 {
                let dx = head.x - bit.cell.x;
                let dy = head.y - bit.cell.y;
                if dx.abs() > dy.abs() {
                    bit.cell.x += if dx > 0 { 2 } else { -2 };
                    if dy != 0 {
                        bit.cell.y += dy.signum();
                    }
                } else {
                    bit.cell.y += if dy > 0 { 2 } else { -2 };
                    if dx != 0 {
                        bit.cell.x += dx.signum();
                    }
                }
                bit.cell = bit.cell.clamped();
                state.bit = Some(bit);
            }
        }
    }

    if !ate {
        if let Some(bit) = state.bit {
            if bit.cell == head {
                collect_bit(state, bit);
                ate = true;
            }
        }
    }

    // Growth: eating keeps the tail; a rejoining cell substitutes for the
    // tail pop (net +1 length); otherwise the tail moves up
    if !ate {
        if !state.rejoining.is_empty() {
            state.rejoining.pop_front();
        } else {
            state.snake.pop();
        }
    }

    update_bugs(state);

    if let Some((event, timer)) = state.banner {
        let timer = timer - dt;
        state.banner = if timer > 0.0 {
            Some((event, timer))
        } else {
            None
        };
    }
}

fn collect_bit(state: &mut SnakeState, bit: Bit) {
    state.bits_collected += 1;
    state.glitch_timer += BIT_TIME_BONUS;
    if bit.stabilizing {
        state.glitch_timer += STABILIZING_TIME_BONUS;
    }
    if bit.magnetic {
        state.magnetic_timer = MAGNETIC_DURATION;
        state.show_event(SnakeEvent::MagneticFieldActive);
    }
    state.bit = None;
    state.spawn_bit();
}

/// Expire active glitch effects and run the countdown to the next one.
/// The countdown is frozen while corrupted/fragmented/partitions are live.
fn update_glitch_timers(state: &mut SnakeState, dt: f32) {
    if state.corrupted_timer > 0.0 {
        state.corrupted_timer -= dt;
        if state.corrupted_timer <= 0.0 {
            state.corrupted_timer = 0.0;
            state.glitch_timer = GLITCH_TIMER_START;
            state.show_event(SnakeEvent::ControlsRestored);
        }
    }

    if state.fragmented_timer > 0.0 {
        state.fragmented_timer -= dt;
        if state.fragmented_timer <= 0.0 {
            state.fragmented_timer = 0.0;
            state.glitch_timer = GLITCH_TIMER_START;
        }
    }

    if !state.partitions.is_empty() {
        state.partitions_timer -= dt;
        if state.partitions_timer <= 0.0 {
            state.partitions.clear();
            state.partitions_timer = 0.0;
            state.glitch_timer = GLITCH_TIMER_START;
        }
    }

    if state.magnetic_timer > 0.0 {
        state.magnetic_timer = (state.magnetic_timer - dt).max(0.0);
    }

    if state.corrupted_timer <= 0.0 && state.fragmented_timer <= 0.0 && state.partitions.is_empty()
    {
        state.glitch_timer -= dt;
        if state.glitch_timer <= 0.0 {
            glitch::trigger(state);
        }
    }
}

/// Advance every bug by one step. The first `BUG_INITIAL_MOVES` moves are
/// straight and unconditional (the spawn layout untangles itself during
/// them); afterwards bugs wander and die on any contact.
fn update_bugs(state: &mut SnakeState) {
    let mut idx = 0;
    while idx < state.bugs.len() {
        if state.bugs[idx].moves_taken < BUG_INITIAL_MOVES {
            let dir = state.bugs[idx].direction;
            let new_head = state.bugs[idx].segments[0].step(dir);
            let bug = &mut state.bugs[idx];
            bug.segments.insert(0, new_head);
            bug.segments.pop();
            bug.moves_taken += 1;
            idx += 1;
            continue;
        }

        state.bugs[idx].turn_timer -= 1;
        if state.bugs[idx].turn_timer <= 0 {
            let current = state.bugs[idx].direction;
            let options: Vec<Direction> = ALL_DIRECTIONS
                .into_iter()
                .filter(|d| *d != current.opposite())
                .collect();
            state.bugs[idx].direction = options[state.rng.random_range(0..options.len())];
            // 7-45 ticks (~0.5-3 s) between turns
            state.bugs[idx].turn_timer = state.rng.random_range(7..45);
        }

        let dir = state.bugs[idx].direction;
        let new_head = state.bugs[idx].segments[0].step(dir);
        let dies = !new_head.in_play_area()
            || state.snake.contains(&new_head)
            || state.bugs[idx].segments.contains(&new_head)
            || state.is_occupied(new_head);
        if dies {
            state.bugs.remove(idx);
        } else {
            let bug = &mut state.bugs[idx];
            bug.segments.insert(0, new_head);
            bug.segments.pop();
            bug.moves_taken += 1;
            idx += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SNAKE_DT;
    use crate::snake::grid::Cell;
    use crate::snake::state::LostTail;

    fn quiet_state(seed: u64) -> SnakeState {
        let mut state = SnakeState::new(seed, 0);
        // Park the bit out of the way and give plenty of glitch time so
        // tests exercise exactly the mechanic they name.
        state.bit = Some(Bit {
            cell: Cell::new(60, 60),
            stabilizing: false,
            magnetic: false,
        });
        state.glitch_timer = 1000.0;
        state
    }

    #[test]
    fn test_moves_one_cell_per_tick() {
        let mut state = quiet_state(1);
        state.snake = vec![Cell::new(33, 33)];
        state.dir = Direction::Right;
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert_eq!(state.snake, vec![Cell::new(34, 33)]);
    }

    #[test]
    fn test_eating_grows_and_respawns_bit() {
        let mut state = quiet_state(2);
        state.snake = vec![Cell::new(33, 33), Cell::new(32, 33)];
        state.dir = Direction::Right;
        state.bit = Some(Bit {
            cell: Cell::new(34, 33),
            stabilizing: false,
            magnetic: false,
        });
        let timer_before = state.glitch_timer;
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert_eq!(state.bits_collected, 1);
        assert_eq!(state.snake.len(), 3);
        assert!(state.bit.is_some());
        assert!(state.glitch_timer > timer_before);
    }

    #[test]
    fn test_stabilizing_bit_bonus() {
        let mut state = quiet_state(3);
        state.snake = vec![Cell::new(33, 33)];
        state.dir = Direction::Right;
        state.glitch_timer = 5.0;
        state.bit = Some(Bit {
            cell: Cell::new(34, 33),
            stabilizing: true,
            magnetic: false,
        });
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        // +3 base, +10 stabilizing, minus one dt of countdown
        let expected = 5.0 - SNAKE_DT + BIT_TIME_BONUS + STABILIZING_TIME_BONUS;
        assert!((state.glitch_timer - expected).abs() < 0.001);
    }

    #[test]
    fn test_wall_death() {
        let mut state = quiet_state(4);
        state.snake = vec![Cell::new(64, 33)];
        state.dir = Direction::Right;
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert!(!state.alive);
    }

    #[test]
    fn test_corrupted_drivers_invert_input() {
        let mut state = quiet_state(5);
        state.snake = vec![Cell::new(33, 33)];
        state.dir = Direction::Right;
        state.corrupted_timer = 10.0;
        state.move_queue.push_back(Direction::Up);
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert_eq!(state.dir, Direction::Down);
        assert_eq!(state.head(), Cell::new(33, 34));
    }

    #[test]
    fn test_fragmented_drive_wraps_x() {
        let mut state = quiet_state(6);
        state.snake = vec![Cell::new(1, 33)];
        state.dir = Direction::Left;
        state.fragmented_timer = 20.0;
        state.death_columns = [50, 51];
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert!(state.alive);
        assert_eq!(state.head(), Cell::new(64, 33));
        assert_eq!(state.dir, Direction::Left);
    }

    #[test]
    fn test_death_column_kills() {
        let mut state = quiet_state(7);
        state.snake = vec![Cell::new(19, 33)];
        state.dir = Direction::Right;
        state.fragmented_timer = 20.0;
        state.death_columns = [20, 21];
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert!(!state.alive);
    }

    #[test]
    fn test_lost_tail_rejoin_is_safe_and_grows() {
        let mut state = quiet_state(8);
        state.snake = vec![Cell::new(33, 33)];
        state.dir = Direction::Right;
        state.lost_segments.push(LostTail {
            cells: vec![Cell::new(34, 33), Cell::new(35, 33)],
        });
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert!(state.alive);
        assert!(state.lost_segments.is_empty());
        // One rejoining cell consumed this tick, one pending
        assert_eq!(state.rejoining.len(), 1);
        assert_eq!(state.snake.len(), 2);

        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        assert_eq!(state.rejoining.len(), 0);
        assert_eq!(state.snake.len(), 3);
    }

    #[test]
    fn test_magnetic_field_drags_bit() {
        let mut state = quiet_state(9);
        state.snake = vec![Cell::new(33, 33)];
        state.dir = Direction::Right;
        state.magnetic_timer = 20.0;
        state.bit = Some(Bit {
            cell: Cell::new(38, 33),
            stabilizing: false,
            magnetic: false,
        });
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        // Head now at (34,33), bit dragged 2 along x toward it
        assert_eq!(state.bit.unwrap().cell, Cell::new(36, 33));
    }

    #[test]
    fn test_magnetic_pickup_scores_without_growing() {
        let mut state = quiet_state(12);
        state.snake = vec![Cell::new(33, 33), Cell::new(32, 33)];
        state.dir = Direction::Right;
        state.magnetic_timer = 20.0;
        state.bit = Some(Bit {
            cell: Cell::new(35, 33),
            stabilizing: false,
            magnetic: false,
        });
        tick(&mut state, &SnakeInput::default(), SNAKE_DT);
        // Head at (34,33), bit one cell ahead: field collects it but the
        // tail pops as usual
        assert_eq!(state.bits_collected, 1);
        assert_eq!(state.snake.len(), 2);
        assert!(state.bit.is_some());
    }

    #[test]
    fn test_restart_after_death() {
        let mut state = quiet_state(10);
        state.bits_collected = 4;
        state.die();
        tick(
            &mut state,
            &SnakeInput { restart: true },
            SNAKE_DT,
        );
        assert!(state.alive);
        assert_eq!(state.bits_collected, 0);
        assert_eq!(state.high_score, 4);
        assert_eq!(state.snake, vec![Cell::new(33, 33)]);
    }

    #[test]
    fn test_determinism() {
        let mut a = SnakeState::new(424242, 0);
        let mut b = SnakeState::new(424242, 0);
        for i in 0..600 {
            if i % 37 == 0 {
                a.queue_turn(Direction::Up);
                b.queue_turn(Direction::Up);
            }
            if i % 53 == 0 {
                a.queue_turn(Direction::Right);
                b.queue_turn(Direction::Right);
            }
            tick(&mut a, &SnakeInput::default(), SNAKE_DT);
            tick(&mut b, &SnakeInput::default(), SNAKE_DT);
        }
        assert_eq!(a.snake, b.snake);
        assert_eq!(a.bits_collected, b.bits_collected);
        assert_eq!(a.alive, b.alive);
        assert_eq!(a.bugs.len(), b.bugs.len());
    }
}
