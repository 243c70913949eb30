//! Super Pig entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, KeyboardEvent};

    use super_pig::audio::{AudioManager, dispatch};
    use super_pig::consts::*;
    use super_pig::narrative::{HttpNarrator, OfflineNarrator, fetch_intro};
    use super_pig::renderer::CanvasRenderer;
    use super_pig::sim::{GamePhase, TickInput};
    use super_pig::{Session, Settings};

    /// Held directions from one input device
    #[derive(Debug, Clone, Copy, Default)]
    struct Held {
        left: bool,
        right: bool,
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        renderer: Option<CanvasRenderer>,
        audio: AudioManager,
        settings: Settings,
        narrator: Option<HttpNarrator>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        keys: Held,
        touch: Held,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let renderer = CanvasRenderer::new("canvas");
            if renderer.is_none() {
                log::warn!("No 2D canvas available - rendering disabled");
            }
            let narrator = settings.narrative_endpoint.clone().map(HttpNarrator::new);

            Self {
                session: Session::new(),
                renderer,
                audio: AudioManager::new(&settings),
                settings,
                narrator,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                keys: Held::default(),
                touch: Held::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.move_left = self.keys.left || self.touch.left;
                self.input.move_right = self.keys.right || self.touch.right;
                let input = self.input;
                self.session.update(&input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.launch = false;
                self.input.pause = false;
            }

            let events = self.session.drain_events();
            dispatch(&events, &mut self.audio);
            self.audio.pump();
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(self.session.state(), &self.settings);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = self.session.state();

            set_text(document, "#hud-score .hud-value", &state.score.to_string());
            set_text(document, "#hud-level .hud-value", &state.level.to_string());
            set_text(document, "#hud-lives .hud-value", &"🐷".repeat(state.lives as usize));

            let phase = state.phase;
            set_visible(document, "menu", phase == GamePhase::Menu);
            set_visible(document, "pause-menu", phase == GamePhase::Paused);
            set_visible(document, "dying", phase == GamePhase::Dying);
            set_visible(document, "touch-controls", phase == GamePhase::Playing);

            // Level intro card
            set_visible(document, "level-intro", phase == GamePhase::LoadingLevel);
            if phase == GamePhase::LoadingLevel {
                set_text(document, "#intro-level", &format!("LEVEL {}", state.level));
                let intro = self.session.intro();
                set_text(
                    document,
                    "#intro-text",
                    intro.unwrap_or("Summoning Super Pig & Writing Story..."),
                );
                set_visible(document, "go-btn", intro.is_some());
            }

            set_visible(document, "game-over", phase == GamePhase::GameOver);
            set_visible(document, "victory", phase == GamePhase::Victory);
            if matches!(phase, GamePhase::GameOver | GamePhase::Victory) {
                set_text(document, "#final-score", &state.score.to_string());
            }
        }

        /// Mute or unmute everything and remember the choice
        fn toggle_mute(&mut self) {
            let muted = self.settings.toggle_mute();
            self.audio.apply_settings(&self.settings);
            self.settings.save();
            log::info!("Sound {}", if muted { "off" } else { "on" });
        }

        /// Enter: start, confirm or acknowledge, whichever applies
        fn advance(&mut self) {
            match self.session.phase() {
                GamePhase::Menu => self.session.start(),
                GamePhase::LoadingLevel => {
                    self.session.confirm();
                }
                GamePhase::GameOver | GamePhase::Victory => self.session.acknowledge(),
                _ => {}
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Fetch the intro for a level that just started loading
    fn request_intro(game: &Rc<RefCell<Game>>) {
        let (level, narrator) = {
            let mut g = game.borrow_mut();
            let Some(level) = g.session.take_intro_request() else {
                return;
            };
            (level, g.narrator.clone())
        };

        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let text = match narrator {
                Some(narrator) => fetch_intro(&narrator, level).await,
                None => fetch_intro(&OfflineNarrator, level).await,
            };
            game.borrow_mut().session.provide_intro(level, text);
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Super Pig starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - nothing to run in");
            return;
        };

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let game = Rc::new(RefCell::new(Game::new(Settings::load())));

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_touch_controls(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        set_visible(&document, "hud", true);

        // Start game loop
        request_animation_frame(game);

        log::info!("Super Pig running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = true,
                    "ArrowRight" | "d" | "D" => g.keys.right = true,
                    " " => {
                        event.prevent_default();
                        g.input.launch = true;
                    }
                    "p" | "P" | "Escape" => g.input.pause = true,
                    "Enter" => g.advance(),
                    "Backspace" => g.session.exit(),
                    "m" | "M" => g.toggle_mute(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = false,
                    "ArrowRight" | "d" | "D" => g.keys.right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(document: &Document, id: &str, mut action: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                action();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "start-btn", move || {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.session.start();
            });
        }
        {
            let game = game.clone();
            on_click(document, "go-btn", move || {
                game.borrow_mut().session.confirm();
            });
        }
        {
            let game = game.clone();
            on_click(document, "resume-btn", move || {
                game.borrow_mut().input.pause = true; // Toggle back to playing
            });
        }
        {
            let game = game.clone();
            on_click(document, "quit-btn", move || {
                game.borrow_mut().session.exit();
            });
        }
        for id in ["game-over-btn", "victory-btn"] {
            let game = game.clone();
            on_click(document, id, move || {
                game.borrow_mut().session.acknowledge();
            });
        }
    }

    /// On-screen hold buttons for touch devices
    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        let sides: [(&str, fn(&mut Held, bool)); 2] = [
            ("touch-left", |h, down| h.left = down),
            ("touch-right", |h, down| h.right = down),
        ];

        for (id, set) in sides {
            let Some(el) = document.get_element_by_id(id) else {
                continue;
            };
            for (kind, down) in [
                ("touchstart", true),
                ("mousedown", true),
                ("touchend", false),
                ("touchcancel", false),
                ("mouseup", false),
                ("mouseleave", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    set(&mut game.borrow_mut().touch, down);
                });
                let _ = el.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(el) = document.get_element_by_id("touch-launch") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.launch = true;
            });
            let _ = el.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let hidden = document_clone.visibility_state() == web_sys::VisibilityState::Hidden;
                let mut g = game.borrow_mut();
                let mute = g.settings.mute_on_blur;
                g.audio.set_suspended(hidden && mute);
                if hidden && g.session.phase() == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let mute = g.settings.mute_on_blur;
                g.audio.set_suspended(mute);
                // Held keys never see their keyup once focus is gone
                g.keys = Held::default();
                if g.session.phase() == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_suspended(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
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
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_intro(&game);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use super_pig::audio::{LogSink, dispatch};
    use super_pig::consts::SIM_DT;
    use super_pig::narrative::fallback_intro;
    use super_pig::sim::{GamePhase, GameState, TickInput};
    use super_pig::Session;

    /// Ten minutes of simulated play
    const MAX_TICKS: u32 = 60 * 60 * 10;

    /// Chase the lowest falling ball and launch whenever one is docked
    pub fn autopilot(state: &GameState) -> TickInput {
        let center = state.paddle.center_x();
        let target = state
            .balls
            .iter()
            .filter(|b| b.active && b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map_or(center, |b| b.pos.x);
        let dead_zone = state.paddle.width / 4.0;

        TickInput {
            move_left: target < center - dead_zone,
            move_right: target > center + dead_zone,
            launch: state.balls.iter().any(|b| b.active && b.is_docked()),
            pause: false,
        }
    }

    pub fn run(seed: Option<u64>) {
        let mut session = match seed {
            Some(seed) => Session::from_seed(seed),
            None => Session::new(),
        };
        let mut sink = LogSink::new();

        session.start();
        let mut ticks = 0;
        while ticks < MAX_TICKS {
            if let Some(level) = session.take_intro_request() {
                let intro = fallback_intro(level);
                log::info!("{}", intro);
                session.provide_intro(level, intro);
                session.confirm();
            }
            if matches!(session.phase(), GamePhase::GameOver | GamePhase::Victory) {
                break;
            }

            let input = autopilot(session.state());
            session.update(&input, SIM_DT);
            dispatch(&session.drain_events(), &mut sink);
            ticks += 1;
        }

        let state = session.state();
        println!(
            "{:?} after {:.1}s: level {}, score {}, lives {}",
            state.phase,
            ticks as f32 * SIM_DT,
            state.level,
            state.score,
            state.lives
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Super Pig (native) starting...");
    log::info!("Native mode runs a headless autoplay demo - build for wasm32 to play");

    let seed = std::env::args().nth(1).and_then(|s| s.parse().ok());
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
