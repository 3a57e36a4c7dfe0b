//! Star Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use star_shooter::consts::*;
    use star_shooter::persistence::LocalStorage;
    use star_shooter::platform::InputMapper;
    use star_shooter::renderer::{CanvasRenderer, Scene};
    use star_shooter::sim::Arena;
    use star_shooter::{Action, LocalLeaderboard, Session, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        scene: Scene,
        renderer: CanvasRenderer,
        input: InputMapper,
        canvas: HtmlCanvasElement,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
    }

    impl Game {
        /// Run simulation frames for the elapsed time
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                if let Some(action) = self.input.held_actions() {
                    self.session.handle(action);
                }
                self.session.frame();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Track frame times for the FPS readout
        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.scene.fps = Some((60000.0 / elapsed).round() as u32);
                }
            }
        }

        fn render(&mut self) {
            let cmds = self.scene.build(&self.session);
            if let Err(e) = self.renderer.render(&cmds) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn pointer_down(&mut self, client_x: i32, client_y: i32, from_touch: bool) {
            let pos = self.canvas_pos(client_x, client_y);
            let actions = self.input.pointer_down(pos, &self.session);
            self.apply(actions, from_touch);
        }

        fn pointer_move(&mut self, client_x: i32, client_y: i32, from_touch: bool) {
            let pos = self.canvas_pos(client_x, client_y);
            let actions = self.input.pointer_move(pos, &self.session);
            self.apply(actions, from_touch);
        }

        fn key_down(&mut self, key: &str) {
            let actions = self.input.key_down(key, &self.session);
            self.apply(actions, false);
        }

        fn apply(&mut self, actions: Vec<Action>, from_touch: bool) {
            for action in actions {
                let open_prompt = from_touch && action == Action::StartNameEntry;
                self.session.handle(action);
                if open_prompt {
                    self.prompt_name();
                }
            }
        }

        /// Touch devices get the browser prompt so the on-screen keyboard opens
        fn prompt_name(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            match window.prompt_with_message_and_default("Enter your name", self.session.player_name()) {
                Ok(Some(name)) => self.session.handle(Action::SubmitName(name)),
                Ok(None) => {}
                Err(e) => log::warn!("Name prompt failed: {:?}", e),
            }
        }

        /// Event position in canvas pixels
        fn canvas_pos(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                client_x as f32 - rect.left() as f32,
                client_y as f32 - rect.top() as f32,
            )
        }

        /// Fit the canvas to the window and tell the simulation
        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(CANVAS_WIDTH as f64);
            let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(CANVAS_HEIGHT as f64);
            let arena = Arena::fit(w as f32, h as f32);
            let dpr = window.device_pixel_ratio();

            self.canvas.set_width((arena.width as f64 * dpr) as u32);
            self.canvas.set_height((arena.height as f64 * dpr) as u32);
            let style = self.canvas.style();
            let _ = style.set_property("width", &format!("{}px", arena.width));
            let _ = style.set_property("height", &format!("{}px", arena.height));

            self.renderer.resize(arena.width as f64, arena.height as f64, dpr);
            self.session.resize(arena);
            log::info!("Canvas resized to {}x{} (scale {:.2})", arena.width, arena.height, arena.scale());
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Star Shooter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d")?.ok_or("no 2d context")?.dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let arena = Arena::default();
        let session = Session::new(
            seed,
            Tuning::default(),
            arena,
            Box::new(LocalLeaderboard::persistent(Box::new(LocalStorage))),
            Box::new(LocalStorage),
        );

        let game = Rc::new(RefCell::new(Game {
            session,
            scene: Scene::new(seed),
            renderer: CanvasRenderer::new(ctx, arena.width as f64, arena.height as f64, 1.0),
            input: InputMapper::new(),
            canvas: canvas.clone(),
            accumulator: 0.0,
            last_time: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
        }));
        game.borrow_mut().fit_to_window();

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        setup_window_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Star Shooter running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().pointer_down(event.client_x(), event.client_y(), false);
            });
            let _ = canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move (only drags do anything)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().pointer_move(event.client_x(), event.client_y(), false);
            });
            let _ = canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let actions = g.input.pointer_up();
                g.apply(actions, false);
            });
            let _ = canvas.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().pointer_down(touch.client_x(), touch.client_y(), true);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().pointer_move(touch.client_x(), touch.client_y(), true);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let actions = g.input.pointer_up();
                g.apply(actions, true);
            });
            let _ = canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if matches!(key.as_str(), " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" | "Backspace") {
                    event.prevent_default();
                }
                game.borrow_mut().key_down(&key);
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let actions = g.input.key_up(&event.key());
                g.apply(actions, false);
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur drops held keys so the ship doesn't drift
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let actions = g.input.release_all();
                g.apply(actions, false);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_to_window();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.track_fps(time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Star Shooter (native) starting...");
    log::info!("Native mode runs a headless autopilot game - build for wasm32 to play");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => load_tuning(&path),
        None => star_shooter::Tuning::default(),
    };

    autopilot::run(seed, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> star_shooter::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| star_shooter::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::error!("Bad tuning file {}: {} (using defaults)", path, e);
            star_shooter::Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;

    use star_shooter::persistence::MemoryStore;
    use star_shooter::sim::{Arena, GameEvent, GamePhase};
    use star_shooter::{Action, LocalLeaderboard, Session, Tuning};

    /// Give up after two minutes of simulated play
    const MAX_FRAMES: u64 = 60 * 120;

    /// Play one game by steering under the lowest target and holding fire
    pub fn run(seed: u64, tuning: Tuning) {
        let mut session = Session::new(
            seed,
            tuning,
            Arena::default(),
            Box::new(LocalLeaderboard::new()),
            Box::new(MemoryStore::new()),
        );

        session.handle(Action::BeginGame);
        session.handle(Action::StartShooting);

        let mut kills = 0;
        let mut pickups = 0;
        while session.phase() == GamePhase::Playing && session.state.frame < MAX_FRAMES {
            if let Some(target) = lowest_target(&session) {
                let dx = (target - session.state.ship.pos.x).clamp(-5.0, 5.0);
                session.handle(Action::MoveBy(Vec2::new(dx, 0.0)));
            }
            session.frame();

            for event in &session.state.events {
                match event {
                    GameEvent::StarDestroyed { .. } | GameEvent::EnemyDestroyed { .. } => kills += 1,
                    GameEvent::PowerupCollected { kind } => {
                        pickups += 1;
                        log::debug!("Collected {}", kind.as_str());
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Autopilot finished at frame {}: score {}, {} kills, {} power-ups",
            session.state.frame,
            session.state.score,
            kills,
            pickups
        );

        if session.phase() == GamePhase::GameOver {
            session.handle(Action::SubmitName("Autopilot".to_string()));
            session.frame();
            for (rank, entry) in session.leaderboard_rows().iter().enumerate() {
                log::info!("#{} {} {}", rank + 1, entry.name, entry.score);
            }
        }
    }

    /// Column of the target closest to the ship's row
    fn lowest_target(session: &Session) -> Option<f32> {
        let state = &session.state;
        let stars = state.stars.iter().filter(|s| !s.is_enemy_projectile()).map(|s| s.pos);
        let enemies = state.enemies.iter().map(|e| e.pos);
        stars
            .chain(enemies)
            .max_by(|a, b| a.y.total_cmp(&b.y))
            .map(|p| p.x)
    }
}
