//! Road Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use road_rush::audio::{AudioManager, SoundCue};
    use road_rush::consts::*;
    use road_rush::renderer::CanvasRenderer;
    use road_rush::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use road_rush::{HighScore, Settings};

    /// Held-key map shared between the event handlers and the frame loop
    #[derive(Default)]
    struct KeyMap {
        left: bool,
        right: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        high_score: HighScore,
        keys: KeyMap,
        // One-shot inputs, cleared after each tick
        boost_pressed: bool,
        start_pressed: bool,
        // Set when the session that just ended beat the stored best
        new_high: bool,
    }

    impl Game {
        /// Run one frame: tick the simulation, dispatch cues, render
        fn frame(&mut self) {
            let input = TickInput {
                left: self.keys.left,
                right: self.keys.right,
                boost: self.boost_pressed,
                start: self.start_pressed,
            };
            let was_running = self.state.phase == GamePhase::Running;
            tick(&mut self.state, &input);
            self.boost_pressed = false;
            self.start_pressed = false;

            if !was_running && self.state.phase == GamePhase::Running {
                self.new_high = false;
                log::info!("Session started (seed {})", self.state.seed);
            }

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Crash => self.audio.play(SoundCue::Crash),
                    GameEvent::Explosion => self.audio.play(SoundCue::Explosion),
                    GameEvent::SpeedUp => self.audio.play(SoundCue::SpeedUp),
                    GameEvent::BoostEngaged => self.audio.play(SoundCue::Boost),
                    GameEvent::RunEnded => {
                        self.audio.play(SoundCue::GameOver);
                        self.new_high = self.high_score.record(self.state.score);
                        log::info!(
                            "Session over: score {} (best {})",
                            self.state.score,
                            self.high_score.best()
                        );
                    }
                }
            }

            self.renderer
                .draw(&self.state, self.high_score.best(), self.new_high);
        }

        fn toggle_mute(&mut self) {
            let muted = !self.audio.muted();
            self.audio.set_muted(muted);
            self.settings.sound_enabled = !muted;
            self.settings.save();
            log::info!("Sound {}", if muted { "muted" } else { "on" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Road Rush starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let settings = Settings::load();
        let audio = AudioManager::new(settings.sfx_volume, !settings.sound_enabled);
        let renderer = CanvasRenderer::new(&canvas, &document).expect("2d context unavailable");
        let high_score = HighScore::load();

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed),
            renderer,
            audio,
            settings,
            high_score,
            keys: KeyMap::default(),
            boost_pressed: false,
            start_pressed: false,
            new_high: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&canvas, game.clone());
        request_animation_frame(game);

        log::info!("Road Rush running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard down: held keys plus the one-shot start/boost edge
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = true,
                    "ArrowRight" | "d" | "D" => g.keys.right = true,
                    " " | "Spacebar" => {
                        if g.state.phase == GamePhase::Running {
                            g.boost_pressed = true;
                        } else {
                            g.start_pressed = true;
                        }
                        event.prevent_default();
                    }
                    "m" | "M" => g.toggle_mute(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up: release held keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = false,
                    "ArrowRight" | "d" | "D" => g.keys.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click starts a session from the idle/summary screens
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase != GamePhase::Running {
                    g.start_pressed = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
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
    use road_rush::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Road Rush (native) starting...");
    log::info!("The playable build targets wasm32 - this runs a headless demo session");

    let mut state = GameState::new(0xC0FFEE);
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );

    // Park in the left lane and let traffic do its thing
    let input = TickInput {
        left: true,
        ..Default::default()
    };
    let mut steps = 0u32;
    while state.phase == GamePhase::Running && steps < 36_000 {
        tick(&mut state, &input);
        steps += 1;
    }

    println!(
        "demo session: {} steps, final score {}, lives {}",
        steps, state.score, state.lives
    );
}
