//! Canvas 2D painting (wasm only)
//!
//! Pure read of the sim states; no game logic. Colors and layout follow
//! the neon palette: #0d0d1a / #1a1a2e backgrounds, cyan/magenta entities.

use web_sys::CanvasRenderingContext2d;

use crate::consts::{GRID_SIZE, HUD_HEIGHT, PONG_HEIGHT, PONG_WIDTH, TILE_COUNT};
use crate::pong::state::{
    BALL_RADIUS, LASER_HEIGHT, LASER_WIDTH, MAX_HEALTH, PADDLE_HEIGHT, PADDLE_MARGIN,
    PADDLE_WIDTH, PongState, PowerUpKind, Side,
};
use crate::snake::state::{
    CORRUPTED_DURATION, FRAGMENTED_DURATION, GLITCH_TIMER_START, MAGNETIC_DURATION,
    PARTITIONS_DURATION, SnakeState,
};

/// Snake canvas width/height in pixels
pub fn snake_canvas_size() -> (f64, f64) {
    let play = TILE_COUNT as f64 * GRID_SIZE as f64;
    (play, play + HUD_HEIGHT as f64)
}

// === Laser Pong ===

pub fn draw_pong(ctx: &CanvasRenderingContext2d, state: &PongState) {
    let w = PONG_WIDTH as f64;
    let h = PONG_HEIGHT as f64;

    ctx.set_fill_style_str("#1a1a2e");
    ctx.fill_rect(0.0, 0.0, w, h);

    // Paddles, dimmed when dead
    ctx.set_fill_style_str(if state.left.alive() {
        "#00d4ff"
    } else {
        "rgba(0, 212, 255, 0.2)"
    });
    ctx.fill_rect(
        PADDLE_MARGIN as f64,
        state.left.y as f64,
        PADDLE_WIDTH as f64,
        PADDLE_HEIGHT as f64,
    );
    ctx.set_fill_style_str(if state.right.alive() {
        "#ff007a"
    } else {
        "rgba(255, 0, 122, 0.2)"
    });
    ctx.fill_rect(
        w - (PADDLE_MARGIN + PADDLE_WIDTH) as f64,
        state.right.y as f64,
        PADDLE_WIDTH as f64,
        PADDLE_HEIGHT as f64,
    );

    // Ball
    ctx.set_fill_style_str("#ffcc00");
    ctx.begin_path();
    ctx.arc(
        state.ball_pos.x as f64,
        state.ball_pos.y as f64,
        BALL_RADIUS as f64,
        0.0,
        std::f64::consts::TAU,
    )
    .ok();
    ctx.fill();

    // Lasers: double-shot gold, otherwise colored by owner
    for laser in &state.lasers {
        ctx.set_fill_style_str(if laser.double {
            "#ffcc00"
        } else if laser.owner == Side::Left {
            "#00ffcc"
        } else {
            "#ff007a"
        });
        ctx.fill_rect(
            laser.pos.x as f64,
            laser.pos.y as f64,
            LASER_WIDTH as f64,
            LASER_HEIGHT as f64,
        );
    }

    if let Some(power_up) = &state.power_up {
        draw_power_up(ctx, power_up.pos.x as f64, power_up.pos.y as f64, power_up.kind, state.time);
    }

    // HUD: labels, health bars, scores
    ctx.set_font("20px Orbitron");
    ctx.set_text_align("left");
    ctx.set_fill_style_str("#fff");
    ctx.fill_text("Player", 10.0, h - 40.0).ok();
    ctx.fill_text("AI", w - 60.0, h - 40.0).ok();

    ctx.set_fill_style_str("#00d4ff");
    let left_frac = state.left.health.max(0) as f64 / MAX_HEALTH as f64;
    ctx.fill_rect(10.0, h - 30.0, left_frac * 100.0, 20.0);
    ctx.set_fill_style_str("#ff007a");
    let right_frac = state.right.health.max(0) as f64 / MAX_HEALTH as f64;
    ctx.fill_rect(w - 110.0, h - 30.0, right_frac * 100.0, 20.0);

    ctx.set_fill_style_str("#fff");
    ctx.fill_text(&state.score_left.to_string(), 100.0, 50.0).ok();
    ctx.fill_text(&state.score_right.to_string(), w - 100.0, 50.0)
        .ok();
}

/// Spinning power-up glyph: star, shield, or double squares
fn draw_power_up(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    kind: PowerUpKind,
    time: f32,
) {
    ctx.save();
    ctx.translate(x, y).ok();
    ctx.rotate(time as f64 * 2.0).ok();

    match kind {
        PowerUpKind::Health => {
            ctx.set_fill_style_str("#00ff00");
            ctx.begin_path();
            for i in 0..5 {
                let outer = (18.0 + i as f64 * 72.0).to_radians();
                let inner = (54.0 + i as f64 * 72.0).to_radians();
                ctx.line_to(outer.cos() * 15.0, outer.sin() * 15.0);
                ctx.line_to(inner.cos() * 7.0, inner.sin() * 7.0);
            }
            ctx.close_path();
            ctx.fill();
        }
        PowerUpKind::Shield => {
            ctx.set_fill_style_str("#00d4ff");
            ctx.begin_path();
            ctx.move_to(-10.0, -15.0);
            ctx.line_to(10.0, -15.0);
            ctx.line_to(15.0, 0.0);
            ctx.line_to(10.0, 15.0);
            ctx.line_to(-10.0, 15.0);
            ctx.close_path();
            ctx.fill();
        }
        PowerUpKind::Double => {
            ctx.set_fill_style_str("#ff007a");
            ctx.fill_rect(-15.0, -5.0, 10.0, 10.0);
            ctx.fill_rect(5.0, -5.0, 10.0, 10.0);
        }
    }

    ctx.restore();
}

// === Glitch Snake ===

pub fn draw_snake(ctx: &CanvasRenderingContext2d, state: &SnakeState) {
    let grid = GRID_SIZE as f64;
    let play = TILE_COUNT as f64 * grid;
    let (w, h) = snake_canvas_size();

    ctx.set_fill_style_str("#0d0d1a");
    ctx.fill_rect(0.0, 0.0, w, h);

    let magnetic = state.magnetic_timer > 0.0;
    let body_color = if magnetic { "#c0c0c0" } else { "#ff007a" };

    // Body is hidden on odd blink counts while dead
    let draw_body = state.alive || state.death_blinks % 2 == 0;
    if draw_body {
        for segment in &state.snake {
            let px = segment.x as f64 * grid;
            let py = segment.y as f64 * grid;
            ctx.set_fill_style_str(body_color);
            ctx.fill_rect(px, py, grid - 1.0, grid - 1.0);
            ctx.set_stroke_style_str(body_color);
            ctx.set_line_width(1.0);
            ctx.stroke_rect(px, py, grid - 1.0, grid - 1.0);
        }
    }

    for tail in &state.lost_segments {
        for cell in &tail.cells {
            ctx.set_fill_style_str("#0000ff");
            ctx.fill_rect(
                cell.x as f64 * grid,
                cell.y as f64 * grid,
                grid - 1.0,
                grid - 1.0,
            );
        }
    }

    if let Some(bit) = &state.bit {
        let px = bit.cell.x as f64 * grid;
        let py = bit.cell.y as f64 * grid;
        let color = if bit.stabilizing {
            "#00ff00"
        } else if bit.magnetic {
            "#0000ff"
        } else {
            "#00ffcc"
        };
        // Special bits carry a soft aura
        if bit.stabilizing {
            ctx.set_fill_style_str("rgba(0, 255, 0, 0.3)");
            ctx.fill_rect(px - grid, py - grid, grid * 3.0, grid * 3.0);
        } else if bit.magnetic {
            ctx.set_fill_style_str("rgba(0, 0, 255, 0.3)");
            ctx.fill_rect(px - grid, py - grid, grid * 3.0, grid * 3.0);
        }
        ctx.set_fill_style_str(color);
        ctx.fill_rect(px, py, grid - 1.0, grid - 1.0);
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(1.0);
        ctx.stroke_rect(px, py, grid - 1.0, grid - 1.0);
    }

    for bug in &state.bugs {
        for segment in &bug.segments {
            ctx.set_fill_style_str("#ffff00");
            ctx.fill_rect(
                segment.x as f64 * grid,
                segment.y as f64 * grid,
                grid - 1.0,
                grid - 1.0,
            );
        }
    }

    for wall in &state.partitions {
        for segment in wall {
            ctx.set_fill_style_str("#ff8000");
            ctx.fill_rect(
                segment.x as f64 * grid,
                segment.y as f64 * grid,
                grid - 1.0,
                grid - 1.0,
            );
        }
    }

    draw_snake_border(ctx, state, play);
    draw_snake_timers(ctx, state, play, w);

    if let Some((event, _)) = &state.banner {
        ctx.set_fill_style_str("#ffffff");
        ctx.set_font(&format!("{}px Orbitron", w / 20.0));
        ctx.set_text_align("center");
        ctx.fill_text(event.message(), w / 2.0, play / 2.0).ok();
    }

    if !state.alive {
        ctx.set_fill_style_str("#ff007a");
        ctx.set_font(&format!("{}px Orbitron", w / 15.0));
        ctx.set_text_align("center");
        ctx.fill_text("Defeat", w / 2.0, h / 2.0).ok();
        ctx.set_fill_style_str("#00ffcc");
        ctx.set_font(&format!("{}px Orbitron", w / 25.0));
        ctx.fill_text("Press Space or Tap to Restart", w / 2.0, h / 2.0 + w / 20.0)
            .ok();
    }
}

/// Playfield border; red with death-column rails during fragmented drive
fn draw_snake_border(ctx: &CanvasRenderingContext2d, state: &SnakeState, play: f64) {
    let grid = GRID_SIZE as f64;
    let fragmented = state.fragmented_timer > 0.0;
    ctx.set_stroke_style_str(if fragmented { "#ff0000" } else { "#00ffcc" });
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(play, 0.0);
    ctx.move_to(0.0, play - 1.0);
    ctx.line_to(play, play - 1.0);
    ctx.move_to(0.0, 0.0);
    ctx.line_to(0.0, play);
    ctx.move_to(play - 1.0, 0.0);
    ctx.line_to(play - 1.0, play);
    if fragmented {
        let left = state.death_columns[0] as f64 * grid;
        let right = (state.death_columns[1] + 1) as f64 * grid - 1.0;
        ctx.move_to(left, 0.0);
        ctx.line_to(left, play);
        ctx.move_to(right, 0.0);
        ctx.line_to(right, play);
    }
    ctx.stroke();
}

/// Stacked countdown bars below the playfield
fn draw_snake_timers(ctx: &CanvasRenderingContext2d, state: &SnakeState, play: f64, w: f64) {
    let mut y = play + 5.0;

    draw_timer_bar(
        ctx,
        w,
        y,
        "#ffff00",
        state.glitch_timer,
        GLITCH_TIMER_START,
        true,
    );
    y += 15.0;

    if state.corrupted_timer > 0.0 {
        draw_timer_bar(
            ctx,
            w,
            y,
            "#ff0000",
            state.corrupted_timer,
            CORRUPTED_DURATION,
            false,
        );
        y += 15.0;
    }

    if !state.partitions.is_empty() {
        draw_timer_bar(
            ctx,
            w,
            y,
            "#ff8000",
            state.partitions_timer,
            PARTITIONS_DURATION,
            false,
        );
        y += 15.0;
    }

    if state.magnetic_timer > 0.0 {
        draw_timer_bar(
            ctx,
            w,
            y,
            "#0000ff",
            state.magnetic_timer,
            MAGNETIC_DURATION,
            false,
        );
        y += 15.0;
    }

    if state.fragmented_timer > 0.0 {
        draw_timer_bar(
            ctx,
            w,
            y,
            "#ff0000",
            state.fragmented_timer,
            FRAGMENTED_DURATION,
            false,
        );
    }
}

fn draw_timer_bar(
    ctx: &CanvasRenderingContext2d,
    w: f64,
    y: f64,
    color: &str,
    value: f32,
    full: f32,
    with_minutes: bool,
) {
    let frac = (value / full).max(0.0) as f64;
    ctx.set_fill_style_str(color);
    ctx.fill_rect(0.0, y, frac * w, 15.0);
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(0.0, y, w, 15.0);

    ctx.set_fill_style_str("#00ff00");
    ctx.set_font("bold 14px Orbitron");
    ctx.set_text_align("right");
    ctx.fill_text(&format_countdown(value, with_minutes), w - 10.0, y + 12.0)
        .ok();
}

/// "MM:SS.t" or "SS.t" countdown text
fn format_countdown(value: f32, with_minutes: bool) -> String {
    let value = value.max(0.0);
    let seconds = value as u32 % 60;
    let tenths = ((value % 1.0) * 10.0) as u32;
    if with_minutes {
        let minutes = value as u32 / 60;
        format!("{minutes:02}:{seconds:02}.{tenths}")
    } else {
        format!("{seconds:02}.{tenths}")
    }
}
