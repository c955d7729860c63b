//! Gorbage Truck entry point
//!
//! On the web this wires the DOM, WebGPU, Web Audio, and the animation-frame
//! ticker into a [`Game`]. Natively it plays one seeded run on autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, TouchEvent};

    use gorbage_truck::assets::{self, AssetTable};
    use gorbage_truck::audio::WebAudio;
    use gorbage_truck::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use gorbage_truck::game::{HudSink, Ticker};
    use gorbage_truck::input::Command;
    use gorbage_truck::renderer::{Overlays, RenderState};
    use gorbage_truck::sim::GamePhase;
    use gorbage_truck::{Error, Game, HighScores, Result, Settings};

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// `requestAnimationFrame` as a [`Ticker`]
    struct RafTicker {
        callback: FrameCallback,
        handle: Option<i32>,
    }

    impl RafTicker {
        /// The browser ran our callback; the old handle is spent
        fn fired(&mut self) {
            self.handle = None;
        }
    }

    impl Ticker for RafTicker {
        fn request(&mut self) {
            if self.handle.is_some() {
                return;
            }
            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(cb) = self.callback.borrow().as_ref() {
                self.handle = window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .ok();
            }
        }

        fn cancel(&mut self) {
            if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
        }

        fn pending(&self) -> bool {
            self.handle.is_some()
        }
    }

    /// HUD and game-over panel in the page
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }
    }

    impl HudSink for DomHud {
        fn score(&mut self, score: u64) {
            self.set_text("hud-score", &score.to_string());
        }

        fn lives(&mut self, lives: u8) {
            self.set_text("hud-lives", &lives.to_string());
        }

        fn multiplier(&mut self, multiplier: u32) {
            self.set_text("hud-mult", &format!("x{}", multiplier));
        }

        fn game_over(&mut self, final_score: u64) {
            self.set_text("final-score", &final_score.to_string());
            set_visible(&self.document, "game-over", true);
        }
    }

    /// Everything the frame callback touches
    struct Shell {
        game: Game<RafTicker>,
        render_state: RenderState,
        assets: Rc<RefCell<AssetTable>>,
        document: Document,
        overlays: Overlays,
        assets_settled: bool,
    }

    impl Shell {
        fn frame(&mut self, time_ms: f64) {
            self.game.ticker_mut().fired();

            if !self.assets_settled {
                let mut table = self.assets.borrow_mut();
                self.render_state.upload_pending(&mut table);
                self.game.set_assets(table.snapshot());
                if table.settled() {
                    self.assets_settled = true;
                    log::info!("All sprites resolved");
                }
            }

            let Some(frame) = self.game.frame(time_ms) else {
                return;
            };
            match self.render_state.render(&frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    self.render_state
                        .resize(self.render_state.size.0, self.render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }

            let overlays = if self.game.phase() == GamePhase::GameOver {
                show_best(&self.document, self.game.best_score());
                Overlays::default()
            } else {
                frame.overlays
            };
            if overlays != self.overlays {
                self.overlays = overlays;
                set_visible(&self.document, "banner-incinerator", overlays.incinerator);
                set_visible(&self.document, "banner-jump", overlays.jump);
                set_visible(&self.document, "banner-two-lane", overlays.two_lane);
            }
        }

        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            set_visible(&self.document, "menu", false);
            set_visible(&self.document, "game-over", false);
            set_visible(&self.document, "hud", true);
            self.game.start(seed);
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn show_best(document: &Document, best: Option<u64>) {
        if let Some(el) = document.get_element_by_id("best-score") {
            el.set_text_content(Some(&best.unwrap_or(0).to_string()));
        }
    }

    pub async fn run() -> Result<()> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Gorbage Truck starting...");

        let window = web_sys::window().ok_or_else(|| Error::CreateSurface("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| Error::CreateSurface("no document".into()))?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or_else(|| Error::CreateSurface("no #canvas element".into()))?;

        let (width, height) = canvas_pixels(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| Error::CreateSurface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| Error::NoAdapter)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height).await?;

        let assets = Rc::new(RefCell::new(AssetTable::new()));
        assets::web::load_all(assets.clone());

        let scores = HighScores::load();
        show_best(&document, scores.top_score());

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let ticker = RafTicker {
            callback: callback.clone(),
            handle: None,
        };
        let game = Game::new(ticker, Settings::load())
            .with_audio(Box::new(WebAudio::new()))
            .with_score_sink(Box::new(scores))
            .with_hud(Box::new(DomHud {
                document: document.clone(),
            }));

        sync_sliders(&document, game.settings());

        let shell = Rc::new(RefCell::new(Shell {
            game,
            render_state,
            assets,
            document: document.clone(),
            overlays: Overlays::default(),
            assets_settled: false,
        }));

        {
            let shell = shell.clone();
            *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                shell.borrow_mut().frame(time);
            }));
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }
        set_visible(&document, "menu", true);

        setup_keyboard(shell.clone());
        setup_touch(&canvas, shell.clone());
        setup_buttons(&document, shell.clone());
        setup_sliders(&document, shell.clone());
        setup_resize(canvas, shell);

        log::info!("Gorbage Truck ready");
        Ok(())
    }

    fn canvas_pixels(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let w = (canvas.client_width() as f64 * dpr) as u32;
        let h = (canvas.client_height() as f64 * dpr) as u32;
        (w.max(1), h.max(1))
    }

    /// Touch position in logical canvas pixels
    fn touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.changed_touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return None;
        }
        let x = (touch.client_x() as f64 - rect.left()) / rect.width() * CANVAS_WIDTH as f64;
        let y = (touch.client_y() as f64 - rect.top()) / rect.height() * CANVAS_HEIGHT as f64;
        Some(Vec2::new(x as f32, y as f32))
    }

    fn setup_keyboard(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if shell.borrow_mut().game.key_down(&event.code()) {
                event.prevent_default();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_touch(canvas: &HtmlCanvasElement, shell: Rc<RefCell<Shell>>) {
        {
            let shell = shell.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_clone, &event) {
                    shell.borrow_mut().game.touch_start(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_clone, &event) {
                    shell.borrow_mut().game.touch_end(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
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

    fn setup_buttons(document: &Document, shell: Rc<RefCell<Shell>>) {
        for id in ["start-btn", "restart-btn"] {
            let shell = shell.clone();
            on_click(document, id, move || shell.borrow_mut().start());
        }
        for (id, cmd) in [("left-btn", Command::LaneLeft), ("right-btn", Command::LaneRight)] {
            let shell = shell.clone();
            on_click(document, id, move || shell.borrow_mut().game.command(cmd));
        }
    }

    fn slider(document: &Document, id: &str) -> Option<HtmlInputElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Sliders run 0..=100
    fn sync_sliders(document: &Document, settings: &Settings) {
        if let Some(input) = slider(document, "music-volume") {
            input.set_value_as_number((settings.music_volume * 100.0) as f64);
        }
        if let Some(input) = slider(document, "sfx-volume") {
            input.set_value_as_number((settings.sfx_volume * 100.0) as f64);
        }
    }

    fn setup_sliders(document: &Document, shell: Rc<RefCell<Shell>>) {
        let sliders: [(&str, fn(&mut Settings, f32)); 2] = [
            ("music-volume", Settings::set_music_volume),
            ("sfx-volume", Settings::set_sfx_volume),
        ];
        for (id, set) in sliders {
            let Some(input) = slider(document, id) else {
                continue;
            };
            let shell = shell.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let value = input_clone.value_as_number();
                if value.is_nan() {
                    return;
                }
                let mut s = shell.borrow_mut();
                set(s.game.settings_mut(), (value / 100.0) as f32);
                s.game.settings().save();
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (w, h) = canvas_pixels(&window, &canvas);
            canvas.set_width(w);
            canvas.set_height(h);
            shell.borrow_mut().render_state.resize(w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    headless::run(seed, headless::MAX_TICKS);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use gorbage_truck::game::ManualTicker;
    use gorbage_truck::input::Command;
    use gorbage_truck::sim::autopilot;
    use gorbage_truck::{Game, Settings};

    /// Five minutes at 60 Hz
    pub const MAX_TICKS: usize = 5 * 60 * 60;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub fn run(seed: u64, max_ticks: usize) {
        log::info!("Gorbage Truck (native) headless run, seed {}", seed);

        let mut game = Game::new(ManualTicker::new(), Settings::default());
        game.start(seed);

        let mut frames = 0;
        while frames < max_ticks && game.ticker_mut().fire() {
            let intent = autopilot(game.state());
            if let Some(target) = intent.lane_target {
                let lane = game.state().player.lane;
                if target < lane {
                    game.command(Command::LaneLeft);
                } else if target > lane {
                    game.command(Command::LaneRight);
                }
            }
            if intent.jump {
                game.command(Command::Jump);
            }

            game.frame(frames as f64 * FRAME_MS);
            frames += 1;

            if frames % 600 == 0 {
                let state = game.state();
                log::info!(
                    "t={}s score={} lives={} speed={:.1}",
                    frames / 60,
                    state.score,
                    state.lives,
                    state.speed
                );
            }
        }

        let state = game.state();
        log::info!(
            "Finished after {} ticks: {:?}, score {}, lives {}, best {:?}",
            frames,
            state.phase,
            state.score,
            state.lives,
            game.best_score()
        );
    }
}
