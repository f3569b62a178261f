//! Neon Arcade entry point
//!
//! Wires the pure simulations to the browser: hub tiles pick the active
//! game, events feed inputs, and a requestAnimationFrame loop runs each
//! sim on its own fixed-timestep accumulator.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use neon_arcade::audio::{AudioManager, SoundEffect};
    use neon_arcade::consts::*;
    use neon_arcade::highscores::HighScore;
    use neon_arcade::pong::{self, PongInput, PongState};
    use neon_arcade::render;
    use neon_arcade::settings::Settings;
    use neon_arcade::snake::{self, Direction, SnakeEvent, SnakeInput, SnakeState};

    /// Which game the hub has focused
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum ActiveGame {
        None,
        Pong,
        Snake,
    }

    /// Game instance holding all state
    struct Game {
        pong: PongState,
        snake: SnakeState,
        active: ActiveGame,
        pong_ctx: Option<CanvasRenderingContext2d>,
        snake_ctx: Option<CanvasRenderingContext2d>,
        pong_accum: f32,
        snake_accum: f32,
        last_time: f64,
        pong_input: PongInput,
        snake_input: SnakeInput,
        /// Last touch position for swipe detection (snake)
        touch_start: (f32, f32),
        /// Pong drag anchored on the paddle half; firing-half touches don't drag
        pong_dragging: bool,
        settings: Settings,
        audio: AudioManager,
        high_score: HighScore,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let high_score = HighScore::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            Self {
                pong: PongState::new(seed),
                snake: SnakeState::new(seed ^ 0x5eed, high_score.bits),
                active: ActiveGame::None,
                pong_ctx: None,
                snake_ctx: None,
                pong_accum: 0.0,
                snake_accum: 0.0,
                last_time: 0.0,
                pong_input: PongInput::default(),
                snake_input: SnakeInput::default(),
                touch_start: (0.0, 0.0),
                pong_dragging: false,
                settings,
                audio,
                high_score,
            }
        }

        /// Focus a game; its state restarts with a fresh seed
        fn activate(&mut self, game: ActiveGame) {
            let seed = js_sys::Date::now() as u64;
            match game {
                ActiveGame::Pong => {
                    self.pong = PongState::new(seed);
                    self.pong_accum = 0.0;
                    self.pong_input = PongInput::default();
                }
                ActiveGame::Snake => {
                    self.snake = SnakeState::new(seed, self.high_score.bits);
                    self.snake_accum = 0.0;
                    self.snake_input = SnakeInput::default();
                }
                ActiveGame::None => {}
            }
            self.active = game;
            self.audio.resume();
            log::info!("Activated {game:?} with seed {seed}");
        }

        /// Run simulation ticks for the active game
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            match self.active {
                ActiveGame::Pong => self.update_pong(dt),
                ActiveGame::Snake => self.update_snake(dt),
                ActiveGame::None => {}
            }
        }

        fn update_pong(&mut self, dt: f32) {
            let score_before = (self.pong.score_left, self.pong.score_right);
            let lasers_before = self.pong.lasers.len();
            let vel_before = self.pong.ball_vel;
            let power_up_before = self.pong.power_up.is_some();
            let paused_before = self.pong.paused;

            self.pong_accum += dt;
            let mut substeps = 0;
            while self.pong_accum >= PONG_DT && substeps < MAX_SUBSTEPS {
                let input = self.pong_input;
                pong::tick(&mut self.pong, &input, PONG_DT);
                self.pong_accum -= PONG_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.pong_input = PongInput::default();
            }

            let score_now = (self.pong.score_left, self.pong.score_right);
            if score_now != score_before {
                self.audio.play(SoundEffect::Score);
            }
            if self.pong.lasers.len() > lasers_before {
                self.audio.play(SoundEffect::LaserFire);
            }
            if !paused_before {
                if self.pong.ball_vel.x * vel_before.x < 0.0 {
                    self.audio.play(SoundEffect::PaddleHit);
                }
                if self.pong.ball_vel.y * vel_before.y < 0.0 {
                    self.audio.play(SoundEffect::WallHit);
                }
                if power_up_before && self.pong.power_up.is_none() && !self.pong.paused {
                    self.audio.play(SoundEffect::PowerUpCollect);
                }
            }
        }

        fn update_snake(&mut self, dt: f32) {
            let bits_before = self.snake.bits_collected;
            let alive_before = self.snake.alive;
            let banner_before = self.snake.banner.map(|(e, _)| e);

            self.snake_accum += dt;
            let mut substeps = 0;
            while self.snake_accum >= SNAKE_DT && substeps < MAX_SUBSTEPS {
                let input = self.snake_input;
                snake::tick(&mut self.snake, &input, SNAKE_DT);
                self.snake_accum -= SNAKE_DT;
                substeps += 1;

                self.snake_input = SnakeInput::default();
            }

            if self.snake.bits_collected > bits_before {
                self.audio.play(SoundEffect::BitCollected);
            }
            if alive_before && !self.snake.alive {
                self.audio.play(SoundEffect::SnakeDeath);
                if self.high_score.submit(self.snake.high_score) {
                    self.high_score.save();
                }
            }
            let banner_now = self.snake.banner.map(|(e, _)| e);
            if banner_now != banner_before && banner_now.is_some_and(is_glitch_event) {
                self.audio.play(SoundEffect::GlitchTriggered);
            }
        }

        /// Render the focused game
        fn render(&self) {
            match self.active {
                ActiveGame::Pong => {
                    if let Some(ctx) = &self.pong_ctx {
                        render::draw_pong(ctx, &self.pong);
                    }
                }
                ActiveGame::Snake => {
                    if let Some(ctx) = &self.snake_ctx {
                        render::draw_snake(ctx, &self.snake);
                    }
                }
                ActiveGame::None => {}
            }
        }

        /// Update the DOM score line
        fn update_hud(&self) {
            if self.active != ActiveGame::Snake {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("scoreDisplay") {
                let text = format!(
                    "Bits: {} --- High Score: {}",
                    self.snake.bits_collected,
                    self.snake.high_score.max(self.high_score.bits)
                );
                el.set_text_content(Some(&text));
            }
        }
    }

    fn is_glitch_event(event: SnakeEvent) -> bool {
        matches!(
            event,
            SnakeEvent::BugAttack
                | SnakeEvent::DataScramble
                | SnakeEvent::PartitionsCreated
                | SnakeEvent::CorruptedDrivers
                | SnakeEvent::FragmentedDrive
        )
    }

    fn get_canvas(document: &web_sys::Document, id: &str) -> Option<HtmlCanvasElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
        canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into()
            .ok()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        // Canvases are fixed-size; CSS scales them
        if let Some(canvas) = get_canvas(&document, "pongCanvas") {
            canvas.set_width(PONG_WIDTH as u32);
            canvas.set_height(PONG_HEIGHT as u32);
            game.borrow_mut().pong_ctx = context_2d(&canvas);
            setup_pong_touch(&canvas, game.clone());
        } else {
            log::warn!("pongCanvas not found");
        }
        if let Some(canvas) = get_canvas(&document, "snakeCanvas") {
            let (w, h) = render::snake_canvas_size();
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            game.borrow_mut().snake_ctx = context_2d(&canvas);
            setup_snake_touch(&canvas, game.clone());
        } else {
            log::warn!("snakeCanvas not found");
        }

        setup_hub_tiles(&document, game.clone());
        setup_keyboard(game.clone());
        setup_blur_mute(game.clone());

        request_animation_frame(game);

        log::info!("Neon Arcade running!");
    }

    /// Hub tiles focus a game; the close button returns to the hub
    fn setup_hub_tiles(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        if let Ok(tiles) = document.query_selector_all(".game-tile") {
            for i in 0..tiles.length() {
                let Some(node) = tiles.item(i) else { continue };
                let Ok(tile) = node.dyn_into::<web_sys::Element>() else {
                    continue;
                };
                let game = game.clone();
                let tile_clone = tile.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let which = match tile_clone.get_attribute("data-game").as_deref() {
                        Some("pong") => ActiveGame::Pong,
                        Some("snake") => ActiveGame::Snake,
                        _ => return,
                    };
                    game.borrow_mut().activate(which);
                });
                let _ = tile
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("close-focus") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().active = ActiveGame::None;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let mut g = game.borrow_mut();
            match g.active {
                ActiveGame::Pong => match event.key().as_str() {
                    "w" | "W" => g.pong_input.paddle_delta -= 20.0,
                    "s" | "S" => g.pong_input.paddle_delta += 20.0,
                    " " => {
                        event.prevent_default();
                        g.pong_input.shoot = true;
                    }
                    _ => {}
                },
                ActiveGame::Snake => {
                    if event.key() == " " && !g.snake.alive {
                        g.snake_input.restart = true;
                        return;
                    }
                    let dir = match event.key().to_lowercase().as_str() {
                        "w" | "arrowup" => Some(Direction::Up),
                        "a" | "arrowleft" => Some(Direction::Left),
                        "s" | "arrowdown" => Some(Direction::Down),
                        "d" | "arrowright" => Some(Direction::Right),
                        _ => None,
                    };
                    if let Some(dir) = dir {
                        event.prevent_default();
                        g.snake.queue_turn(dir);
                    }
                }
                ActiveGame::None => {}
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Pong touch: left half drags the paddle, right half fires
    fn setup_pong_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let rect = canvas_clone.get_bounding_client_rect();
                let x = (touch.client_x() as f64 - rect.left()) * (PONG_WIDTH as f64 / rect.width());
                let y =
                    (touch.client_y() as f64 - rect.top()) * (PONG_HEIGHT as f64 / rect.height());
                let mut g = game.borrow_mut();
                if (x as f32) < PONG_WIDTH / 2.0 {
                    g.pong_input.paddle_target_y = Some(y as f32 - 50.0);
                    g.pong_dragging = true;
                } else {
                    g.pong_input.shoot = true;
                    g.pong_dragging = false;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut g = game.borrow_mut();
                // Drags only follow a touch anchored on the paddle half
                if !g.pong_dragging {
                    return;
                }
                let rect = canvas_clone.get_bounding_client_rect();
                let y =
                    (touch.client_y() as f64 - rect.top()) * (PONG_HEIGHT as f64 / rect.height());
                g.pong_input.paddle_target_y = Some(y as f32 - 50.0);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().pong_dragging = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Snake touch: swipes queue turns, a tap restarts after death
    fn setup_snake_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if !g.snake.alive {
                    g.snake_input.restart = true;
                    return;
                }
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    g.touch_start = (touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if !g.snake.alive {
                    return;
                }
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let (x, y) = (touch.client_x() as f32, touch.client_y() as f32);
                let dx = x - g.touch_start.0;
                let dy = y - g.touch_start.1;
                // 20 px swipe threshold
                let dir = if dx.abs() > dy.abs() {
                    if dx > 20.0 {
                        Some(Direction::Right)
                    } else if dx < -20.0 {
                        Some(Direction::Left)
                    } else {
                        None
                    }
                } else if dy > 20.0 {
                    Some(Direction::Down)
                } else if dy < -20.0 {
                    Some(Direction::Up)
                } else {
                    None
                };
                if let Some(dir) = dir {
                    g.snake.queue_turn(dir);
                    g.touch_start = (x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Mute audio while the window is unfocused (if the setting asks)
    fn setup_blur_mute(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                PONG_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_arcade::consts::{PONG_DT, SNAKE_DT};
    use neon_arcade::pong::{self, PongInput, PongState};
    use neon_arcade::snake::{self, SnakeInput, SnakeState};

    env_logger::init();
    log::info!("Neon Arcade (native) starting...");
    log::info!("Browser shell requires wasm - run with `trunk serve` for the web version");

    // Headless smoke run of both sims
    let mut pong = PongState::new(42);
    for _ in 0..(60 * 30) {
        pong::tick(&mut pong, &PongInput::default(), PONG_DT);
    }
    log::info!(
        "Pong after 30s: {} - {} (lasers in flight: {})",
        pong.score_left,
        pong.score_right,
        pong.lasers.len()
    );

    let mut snake = SnakeState::new(42, 0);
    let mut ticks_alive = 0u32;
    for _ in 0..(15 * 60) {
        snake::tick(&mut snake, &SnakeInput::default(), SNAKE_DT);
        if snake.alive {
            ticks_alive += 1;
        }
    }
    log::info!(
        "Snake after 60s: {} bits, survived {} ticks",
        snake.bits_collected,
        ticks_alive
    );
}
