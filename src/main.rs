//! Flappy Grove entry point
//!
//! Hosts the session loop in the browser, or plays a headless autopilot game
//! natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent, MouseEvent,
        TouchEvent, Window,
    };

    use flappy_grove::platform::detect_device_class;
    use flappy_grove::sim::{FrameView, Playfield};
    use flappy_grove::{CollaboratorError, Collaborators, Config, Hud, Noop, Renderer, Session};

    /// Flat-colour canvas renderer (sky, trunks, ground, bird)
    struct CanvasRenderer {
        ctx: CanvasRenderingContext2d,
    }

    fn js_err(e: JsValue) -> CollaboratorError {
        CollaboratorError::Renderer(format!("{:?}", e))
    }

    impl Renderer for CanvasRenderer {
        fn render(&mut self, frame: &FrameView<'_>) -> Result<(), CollaboratorError> {
            let ctx = &self.ctx;
            let w = frame.playfield.width as f64;
            let h = frame.playfield.height as f64;
            let ground_y = frame.ground.y as f64;

            ctx.set_fill_style_str("#87CEEB");
            ctx.fill_rect(0.0, 0.0, w, h);

            ctx.set_fill_style_str("#8B4513");
            let pipe_w = frame.pipe_width as f64;
            for pipe in frame.pipes {
                let x = pipe.x as f64;
                let bottom = (pipe.gap_top + frame.gap_height) as f64;
                ctx.fill_rect(x, 0.0, pipe_w, pipe.gap_top as f64);
                ctx.fill_rect(x, bottom, pipe_w, (ground_y - bottom).max(0.0));
            }

            ctx.set_fill_style_str("#654321");
            ctx.fill_rect(0.0, ground_y, w, frame.ground.height as f64);

            let bird = frame.bird;
            let (bw, bh) = (bird.size.x as f64, bird.size.y as f64);
            ctx.save();
            let drawn = ctx
                .translate(bird.pos.x as f64 + bw / 2.0, bird.pos.y as f64 + bh / 2.0)
                .and_then(|_| ctx.rotate(bird.rotation as f64));
            if drawn.is_ok() {
                ctx.set_fill_style_str("#FF4444");
                ctx.fill_rect(-bw / 2.0, -bh / 2.0, bw, bh);
            }
            ctx.restore();
            drawn.map_err(js_err)
        }
    }

    /// Score text plus start / game-over overlays
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn element(&self, id: &str) -> Result<web_sys::Element, CollaboratorError> {
            self.document
                .get_element_by_id(id)
                .ok_or_else(|| CollaboratorError::Hud(format!("missing #{}", id)))
        }

        fn set_class(&self, id: &str, class: &str, on: bool) -> Result<(), CollaboratorError> {
            let classes = self.element(id)?.class_list();
            let result = if on {
                classes.add_1(class)
            } else {
                classes.remove_1(class)
            };
            result.map_err(|e| CollaboratorError::Hud(format!("{:?}", e)))
        }
    }

    impl Hud for DomHud {
        fn game_started(&mut self) -> Result<(), CollaboratorError> {
            self.set_class("startScreen", "hidden", true)?;
            self.set_class("gameOver", "show", false)
        }

        fn score_changed(&mut self, score: u64) -> Result<(), CollaboratorError> {
            self.element("score")?
                .set_text_content(Some(&score.to_string()));
            Ok(())
        }

        fn game_ended(&mut self, final_score: u64) -> Result<(), CollaboratorError> {
            self.element("finalScoreValue")?
                .set_text_content(Some(&final_score.to_string()));
            self.set_class("gameOver", "show", true)
        }
    }

    /// Session plus loop bookkeeping
    struct Game {
        session: Session,
        /// A requestAnimationFrame chain is live
        looping: bool,
    }

    fn viewport(window: &Window) -> (f32, f32) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (w as f32, h as f32)
    }

    fn fit_canvas(canvas: &HtmlCanvasElement, playfield: Playfield) {
        canvas.set_width(playfield.width as u32);
        canvas.set_height(playfield.height as u32);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Flappy Grove starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };
        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            log::error!("Canvas 2D context unavailable");
            return;
        };

        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let device_class = detect_device_class(&user_agent);
        let config = Config::load(device_class);

        let (w, h) = viewport(&window);
        let playfield = Playfield::new(w, h);
        fit_canvas(&canvas, playfield);

        let seed = js_sys::Date::now() as u64;
        let collaborators = Collaborators::new(
            CanvasRenderer { ctx },
            DomHud {
                document: document.clone(),
            },
            Noop,
        );
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(config, playfield, collaborators, seed),
            looping: false,
        }));

        log::info!(
            "Session ready ({} device, seed {})",
            device_class.as_str(),
            seed
        );

        setup_input_handlers(&window, &canvas, game.clone());
        setup_resize(&window, &canvas, game.clone());
        setup_buttons(&document, game);
    }

    /// Start (or restart) a game and make sure exactly one frame loop runs
    fn begin(game: &Rc<RefCell<Game>>) {
        let needs_loop = {
            let mut g = game.borrow_mut();
            g.session.start();
            let idle = !g.looping;
            g.looping = true;
            idle
        };
        if needs_loop {
            request_animation_frame(game.clone());
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["startButton", "restartButton"] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("No #{} button", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                begin(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(window: &Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.on_input_impulse();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().session.on_input_impulse();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    game.borrow_mut().session.on_input_impulse();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window_clone = window.clone();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = viewport(&window_clone);
            let mut g = game.borrow_mut();
            g.session.on_resize(w, h);
            fit_canvas(&canvas, g.session.playfield());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        let keep_going = {
            let mut g = game.borrow_mut();
            g.session.tick(time);
            let running = g.session.is_running();
            if !running {
                g.looping = false;
            }
            running
        };

        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use flappy_grove::platform::MonotonicClock;
    use flappy_grove::sim::{Playfield, autopilot};
    use flappy_grove::{CollaboratorError, Collaborators, Config, DeviceClass, Hud, Noop, Session};

    /// Give up after five minutes of reference-rate play
    const MAX_TICKS: u64 = 60 * 60 * 5;

    /// HUD that writes to the log
    struct LogHud;

    impl Hud for LogHud {
        fn game_started(&mut self) -> Result<(), CollaboratorError> {
            log::info!("Autopilot is flying");
            Ok(())
        }

        fn score_changed(&mut self, score: u64) -> Result<(), CollaboratorError> {
            if score > 0 {
                log::info!("Score: {}", score);
            }
            Ok(())
        }

        fn game_ended(&mut self, final_score: u64) -> Result<(), CollaboratorError> {
            log::info!("Crashed with {} points", final_score);
            Ok(())
        }
    }

    pub fn run() {
        let config = Config::load(DeviceClass::Desktop);
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut session = Session::new(
            config,
            Playfield::new(400.0, 600.0),
            Collaborators::new(Noop, LogHud, Noop),
            seed,
        );
        let clock = MonotonicClock::new();

        session.start();
        let mut ticks = 0;
        while session.is_running() && ticks < MAX_TICKS {
            if session.state().is_some_and(autopilot::should_flap) {
                session.on_input_impulse();
            }
            session.tick(clock.now_ms());
            ticks += 1;
        }

        println!("Final score: {} ({} ticks)", session.score(), ticks);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flappy Grove (native) starting...");
    log::info!("Native mode flies a headless autopilot game");
    log::info!("Run with `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
