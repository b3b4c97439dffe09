//! Fruit Slash entry point
//!
//! Browser: binds the canvas, pointer listeners and requestAnimationFrame to
//! the engine. Native: plays one headless run with a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, Performance, PointerEvent, Window};

    use fruit_slash::persistence::{Identity, LocalScoreStore};
    use fruit_slash::platform::{FrameScheduler, InputBinding, client_to_canvas};
    use fruit_slash::renderer::CanvasSurface;
    use fruit_slash::sim::state::Screen;
    use fruit_slash::{Engine, EngineOptions, HighScores, QualityPreset, Settings, Snapshot};

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// requestAnimationFrame behind the engine's scheduler trait
    struct AnimationFrameScheduler {
        window: Window,
        performance: Option<Performance>,
        callback: FrameCallback,
        handle: Option<i32>,
    }

    impl AnimationFrameScheduler {
        fn new(window: Window, callback: FrameCallback) -> Self {
            let performance = window.performance();
            Self {
                window,
                performance,
                callback,
                handle: None,
            }
        }

        /// The pending request just fired
        fn fired(&mut self) {
            self.handle = None;
        }
    }

    impl FrameScheduler for AnimationFrameScheduler {
        fn schedule_next(&mut self) {
            if self.handle.is_some() {
                return;
            }
            if let Some(cb) = self.callback.borrow().as_ref() {
                self.handle = self
                    .window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .ok();
            }
        }

        fn cancel(&mut self) {
            if let Some(handle) = self.handle.take() {
                let _ = self.window.cancel_animation_frame(handle);
            }
        }

        fn now_ms(&self) -> f64 {
            self.performance
                .as_ref()
                .map_or_else(js_sys::Date::now, |p| p.now())
        }
    }

    /// Pointer listeners on the canvas, removed on unbind
    struct PointerListeners {
        target: HtmlCanvasElement,
        handlers: Vec<(&'static str, Closure<dyn FnMut(PointerEvent)>)>,
    }

    impl InputBinding for PointerListeners {
        fn unbind(&mut self) {
            for (name, handler) in self.handlers.drain(..) {
                let _ = self
                    .target
                    .remove_event_listener_with_callback(name, handler.as_ref().unchecked_ref());
            }
        }
    }

    struct Game {
        engine: Engine<AnimationFrameScheduler>,
        surface: CanvasSurface,
    }

    fn canvas_point(canvas: &HtmlCanvasElement, e: &PointerEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        client_to_canvas(
            Vec2::new(e.client_x() as f32, e.client_y() as f32),
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.width() as f32, rect.height() as f32),
            Vec2::new(canvas.width() as f32, canvas.height() as f32),
        )
    }

    /// `?fid=123&name=kiwi` from the host frame, if present
    fn identity_from_url(window: &Window) -> Option<Identity> {
        let search = window.location().search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        let id = params.get("fid")?.parse::<u64>().ok()?;
        Some(Identity {
            id,
            display_name: params.get("name"),
        })
    }

    /// `?quality=low|medium|high` overrides the stored preset
    fn quality_from_url(window: &Window) -> Option<QualityPreset> {
        let search = window.location().search().ok()?;
        let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
        let value = params.get("quality")?;
        let preset = QualityPreset::parse(&value);
        if preset.is_none() {
            log::warn!("Unknown quality preset {value:?}");
        }
        preset
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// Mirror a snapshot into the DOM HUD
    fn update_hud(snapshot: &Snapshot) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let run = &snapshot.run;

        set_text(&document, "hud-score", &run.score.to_string());
        set_text(&document, "hud-lives", &"\u{2764}".repeat(run.lives as usize));
        set_text(&document, "hud-best", &snapshot.best_score.to_string());
        if run.combo_count >= 2 {
            set_text(&document, "hud-combo", &format!("x{}", run.combo_multiplier));
        } else {
            set_text(&document, "hud-combo", "");
        }

        set_visible(&document, "menu", snapshot.screen == Screen::Menu);
        set_visible(&document, "hud", snapshot.screen == Screen::Playing);
        set_visible(&document, "game-over", snapshot.screen == Screen::GameOver);
        if snapshot.screen == Screen::GameOver {
            set_text(&document, "final-score", &run.score.to_string());
            set_text(&document, "final-best", &snapshot.best_score.to_string());
        }
    }

    fn render_leaderboard(document: &Document, game: &Game) {
        let Some(list) = document.get_element_by_id("leaderboard") else {
            return;
        };
        let entries = match game.engine.fetch_leaderboard(10) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Could not load leaderboard: {e}");
                return;
            }
        };
        list.set_inner_html("");
        for (i, entry) in entries.iter().enumerate() {
            let Ok(row) = document.create_element("li") else {
                continue;
            };
            // Names come from the URL, so never as markup
            row.set_text_content(Some(&format!("{}. {} - {}", i + 1, entry.display_name, entry.score)));
            let _ = list.append_child(&row);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Fruit Slash starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        canvas.set_width(canvas.client_width().max(1) as u32);
        canvas.set_height(canvas.client_height().max(1) as u32);

        let ctx = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<web_sys::CanvasRenderingContext2d>()?;

        let mut settings = Settings::load();
        if let Some(preset) = quality_from_url(&window) {
            settings.apply_preset(preset);
            settings.save();
        }
        log::info!("Quality: {}", settings.quality.as_str());
        let options = EngineOptions {
            width: canvas.width() as f32,
            height: canvas.height() as f32,
            seed: js_sys::Date::now() as u64,
            settings,
        };
        log::info!("Seed: {}", options.seed);

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let scheduler = AnimationFrameScheduler::new(window.clone(), callback.clone());

        let mut engine = Engine::new(scheduler, options)
            .with_score_store(LocalScoreStore::new())
            .with_leaderboard(HighScores::load())
            .with_observer(update_hud);
        if let Some(identity) = identity_from_url(&window) {
            log::info!("Playing as {}", identity.label());
            engine.set_identity(Some(identity));
        }

        let game = Rc::new(RefCell::new(Game {
            engine,
            surface: CanvasSurface::new(ctx),
        }));

        // Frame loop
        {
            let game = game.clone();
            *callback.borrow_mut() = Some(Closure::new(move |_time: f64| {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                g.engine.scheduler_mut().fired();
                g.engine.frame(&mut g.surface);
                if g.engine.screen() == Screen::GameOver {
                    if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                        render_leaderboard(&document, g);
                    }
                }
            }));
        }

        bind_pointer(&canvas, game.clone());
        bind_buttons(&document, game.clone());
        bind_quality_button(&document, game.clone());
        bind_resize(&window, &canvas, game);

        log::info!("Fruit Slash ready");
        Ok(())
    }

    fn bind_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let mut handlers: Vec<(&'static str, Closure<dyn FnMut(PointerEvent)>)> = Vec::new();

        {
            let game = game.clone();
            let canvas = canvas.clone();
            handlers.push((
                "pointerdown",
                Closure::new(move |e: PointerEvent| {
                    e.prevent_default();
                    let _ = canvas.set_pointer_capture(e.pointer_id());
                    let p = canvas_point(&canvas, &e);
                    game.borrow_mut().engine.pointer_down(p.x, p.y);
                }),
            ));
        }
        {
            let game = game.clone();
            let canvas = canvas.clone();
            handlers.push((
                "pointermove",
                Closure::new(move |e: PointerEvent| {
                    e.prevent_default();
                    let p = canvas_point(&canvas, &e);
                    game.borrow_mut().engine.pointer_move(p.x, p.y);
                }),
            ));
        }
        {
            let game = game.clone();
            handlers.push((
                "pointerup",
                Closure::new(move |e: PointerEvent| {
                    e.prevent_default();
                    game.borrow_mut().engine.pointer_up();
                }),
            ));
        }
        {
            let game = game.clone();
            handlers.push((
                "pointercancel",
                Closure::new(move |_e: PointerEvent| {
                    game.borrow_mut().engine.pointer_cancel();
                }),
            ));
        }

        for (name, handler) in &handlers {
            let _ = canvas.add_event_listener_with_callback(name, handler.as_ref().unchecked_ref());
        }
        game.borrow_mut().engine.bind_input(PointerListeners {
            target: canvas.clone(),
            handlers,
        });
    }

    fn bind_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, again) in [("play-btn", false), ("play-again-btn", true)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                let started = if again {
                    g.engine.play_again()
                } else {
                    g.engine.start()
                };
                if !started {
                    log::debug!("{id} ignored on {:?}", g.engine.screen());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Cycles Low -> Medium -> High and persists the choice
    fn bind_quality_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("quality-btn") else {
            return;
        };
        btn.set_text_content(Some(game.borrow().engine.settings().quality.as_str()));
        let label = btn.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let mut g = game.borrow_mut();
            let mut settings = g.engine.settings().clone();
            settings.apply_preset(settings.quality.next());
            settings.save();
            label.set_text_content(Some(settings.quality.as_str()));
            log::info!("Quality set to {}", settings.quality.as_str());
            g.engine.apply_settings(settings);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn bind_resize(window: &Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = (canvas.client_width().max(1), canvas.client_height().max(1));
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            game.borrow_mut().engine.resize(w as f32, h as f32);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use fruit_slash::consts::DEFAULT_HEIGHT;
    use fruit_slash::persistence::{Identity, LocalScoreStore};
    use fruit_slash::platform::ManualScheduler;
    use fruit_slash::renderer::MeshSurface;
    use fruit_slash::sim::state::{FallingObject, Screen};
    use fruit_slash::{Engine, EngineOptions, HighScores, QualityPreset, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Stop a run that somehow never ends
    const MAX_FRAMES: u32 = 60 * 60 * 5;
    /// Keep swipes this far from any hazard
    const HAZARD_CLEARANCE: f32 = 90.0;

    /// Height of a horizontal swipe that hits fruit and stays clear of hazards
    fn pick_lane(objects: &[FallingObject]) -> Option<f32> {
        let live = || objects.iter().filter(|o| !o.is_cut() && !o.is_missed());
        live()
            .filter(|o| !o.kind.hazard && o.pos.y > 0.0 && o.pos.y < DEFAULT_HEIGHT)
            .map(|o| o.pos.y)
            .filter(|&y| {
                live()
                    .filter(|h| h.kind.hazard)
                    .all(|h| (h.pos.y - y).abs() > HAZARD_CLEARANCE)
            })
            .max_by(|a, b| a.total_cmp(b))
    }

    pub fn run(seed: u64, quality: QualityPreset) {
        let options = EngineOptions {
            seed,
            settings: Settings::from_preset(quality),
            ..EngineOptions::default()
        };
        log::info!("Quality: {}", quality.as_str());
        let mut engine = Engine::new(ManualScheduler::new(), options)
            .with_score_store(LocalScoreStore::new())
            .with_leaderboard(HighScores::new())
            .with_identity(Identity::with_name(1, "autopilot"))
            .with_observer(|s| log::debug!("{:?}", s));
        let mut mesh = MeshSurface::new(quality);

        engine.start();
        let mut frames = 0;
        let mut swiping = false;
        while engine.scheduler_mut().take_pending() && frames < MAX_FRAMES {
            engine.scheduler_mut().advance_ms(FRAME_MS);

            if swiping {
                engine.pointer_up();
                swiping = false;
            } else if frames % 20 == 0 {
                if let Some(y) = pick_lane(engine.world().spawner.objects()) {
                    let width = engine.world().spawner.size().0;
                    engine.pointer_down(0.0, y);
                    engine.pointer_move(width / 2.0, y);
                    engine.pointer_move(width, y);
                    swiping = true;
                }
            }

            engine.frame(&mut mesh);
            frames += 1;
        }

        let run = engine.run();
        log::info!(
            "Autopilot finished after {frames} frames ({} triangles in last frame)",
            mesh.triangle_count()
        );
        println!(
            "score {} | lives {} | {:.1}s | {}",
            run.score,
            run.lives,
            run.elapsed_secs,
            if engine.screen() == Screen::GameOver { "game over" } else { "stopped" }
        );
        if let Ok(board) = engine.fetch_leaderboard(3) {
            for (i, entry) in board.iter().enumerate() {
                println!("#{} {} {}", i + 1, entry.display_name, entry.score);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Slash (native) starting...");
    log::info!("Native mode runs a headless autopilot game; build for wasm32 to play");

    // fruit-slash [seed] [low|medium|high]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0x5EED);
    let quality = args
        .next()
        .and_then(|s| fruit_slash::QualityPreset::parse(&s))
        .unwrap_or_default();
    autopilot::run(seed, quality);
}
