//! Neon Vader entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        HtmlCanvasElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent, MouseEvent,
        PageTransitionEvent, PointerEvent,
    };

    use neon_vader::audio::{AudioManager, SoundEffect};
    use neon_vader::driver::{EventSink, FrameDriver, FrameHandle, FrameScheduler};
    use neon_vader::input::{HandState, Inputs, LatestValue, pointer_hand};
    use neon_vader::renderer::RenderState;
    use neon_vader::shell::{Overlay, ShellKey, ShellState};
    use neon_vader::sim::{GameEvent, SoundCue};
    use neon_vader::{AppError, QualityPreset, Settings};

    const CANVAS_ID: &str = "canvas";

    type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    thread_local! {
        /// Hand cell written by the tracker bridge and the pointer fallback
        static HAND: RefCell<Option<LatestValue<HandState>>> = const { RefCell::new(None) };
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// requestAnimationFrame-backed scheduler. The callback itself is
    /// installed after the app exists and dropped on dispose.
    struct BrowserScheduler {
        callback: FrameCallback,
    }

    impl FrameScheduler for BrowserScheduler {
        fn request(&mut self) -> FrameHandle {
            let Some(window) = web_sys::window() else {
                return 0;
            };
            match self.callback.borrow().as_ref() {
                Some(cb) => window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .unwrap_or_else(|e| {
                        log::error!("requestAnimationFrame failed: {:?}", e);
                        0
                    }),
                None => 0,
            }
        }

        fn cancel(&mut self, handle: FrameHandle) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    /// Shell plus audio; receives everything the engine reports
    struct Host {
        shell: ShellState,
        audio: AudioManager,
        settings: Settings,
    }

    impl EventSink for Host {
        fn on_event(&mut self, event: GameEvent) {
            if let Some(effect) = SoundEffect::for_event(event) {
                self.audio.play(effect);
            }
            self.shell.apply(event);
        }

        fn on_sound(&mut self, cue: SoundCue) {
            self.audio.play(cue.into());
        }
    }

    impl Host {
        fn persist_sensitivity(&mut self) {
            if self.settings.sensitivity != self.shell.sensitivity {
                self.settings.set_sensitivity(self.shell.sensitivity);
                self.settings.save();
            }
        }

        fn toggle_mute(&mut self) -> bool {
            self.settings.toggle_muted();
            self.audio.set_volume(self.settings.volume());
            self.settings.save();
            self.settings.muted
        }
    }

    /// Game instance holding all state
    struct App {
        driver: FrameDriver<BrowserScheduler>,
        target: RenderState,
        host: Host,
        canvas: HtmlCanvasElement,
        last_overlay: Option<Overlay>,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let hand = self.driver.inputs().hand.get();
            self.host.shell.observe_hand(hand.is_active, time);
            self.host.shell.sync(self.driver.inputs());

            let App {
                driver,
                target,
                host,
                ..
            } = self;
            driver.on_frame(time, target, host);

            self.update_hud();
        }

        fn start_game(&mut self) {
            self.host.audio.resume();
            self.host.shell.start_game();
            self.host.shell.sync(self.driver.inputs());
        }

        fn set_quality(&mut self, quality: QualityPreset) {
            self.host.settings.set_quality(quality);
            self.driver.set_scene_options(self.host.settings.scene_options());
            self.host.settings.save();
            log::info!("Quality set to {}", quality.label());
        }

        fn resize(&mut self) {
            if let Some(window) = web_sys::window() {
                let (w, h) = fit_canvas(&window, &self.canvas);
                self.target.resize(w, h);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let shell = &self.host.shell;

            set_text(&document, "#hud-score .hud-value", &shell.score.to_string());
            set_text(&document, "#hud-lives .hud-value", &shell.lives.to_string());
            set_text(&document, "#hud-level .hud-value", &shell.level.to_string());
            set_text(
                &document,
                "#hud-sensitivity .hud-value",
                &format!("{:.2}", shell.sensitivity),
            );
            set_text(
                &document,
                "#hud-link .hud-value",
                if self.driver.inputs().hand.get().is_active {
                    "SYNCED"
                } else {
                    "LINK LOST"
                },
            );

            let overlay = shell.overlay();
            if self.last_overlay == Some(overlay) {
                return;
            }
            self.last_overlay = Some(overlay);

            set_text(&document, "#briefing", shell.briefing);
            set_text(
                &document,
                "#pause-title",
                if shell.has_started { "SYSTEM PAUSED" } else { "NEON VADER" },
            );
            set_hidden(
                &document,
                "pause-overlay",
                !matches!(overlay, Overlay::Title | Overlay::Paused),
            );
            set_hidden(&document, "signal-lost", overlay != Overlay::SignalLost);
            set_hidden(&document, "game-over", overlay != Overlay::GameOver);
            if overlay == Overlay::GameOver {
                set_text(
                    &document,
                    "#game-over-message",
                    shell.game_over_message.unwrap_or_default(),
                );
                set_text(&document, "#final-score", &shell.score.to_string());
            }
        }
    }

    fn set_text(document: &web_sys::Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Toggle only the `hidden` class so layout classes survive
    fn set_hidden(document: &web_sys::Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn write_hand(hand: HandState) {
        HAND.with(|cell| {
            if let Some(cell) = cell.borrow().as_ref() {
                cell.set(hand);
            }
        });
    }

    /// Size the canvas backing store to its CSS size times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn with_app(f: impl FnOnce(&mut App)) {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                match app.try_borrow_mut() {
                    Ok(mut app) => f(&mut app),
                    Err(_) => log::warn!("App busy, dropping UI call"),
                }
            }
        });
    }

    /// Latest hand sample from the tracker. Cheap; call at camera rate.
    #[wasm_bindgen]
    pub fn push_hand_state(x: f32, is_fist: bool, is_active: bool) {
        write_hand(HandState { x, is_fist, is_active });
    }

    #[wasm_bindgen]
    pub fn set_sensitivity(value: f32) {
        with_app(|app| {
            app.host.shell.set_sensitivity(value);
            app.host.persist_sensitivity();
        });
    }

    #[wasm_bindgen]
    pub fn start_game() {
        with_app(App::start_game);
    }

    pub async fn run() -> Result<(), AppError> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Neon Vader starting...");

        let window =
            web_sys::window().ok_or_else(|| AppError::Environment("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| AppError::Environment("no document".into()))?;

        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| AppError::MissingCanvas(CANVAS_ID.into()))?
            .dyn_into()
            .map_err(|_| AppError::MissingCanvas(CANVAS_ID.into()))?;
        let (width, height) = fit_canvas(&window, &canvas);

        let settings = Settings::load();

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| AppError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| AppError::Adapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let target = RenderState::new(surface, &adapter, width, height).await?;

        let inputs = Inputs::default();
        HAND.with(|cell| *cell.borrow_mut() = Some(inputs.hand.clone()));

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let seed = js_sys::Date::now() as u64;
        let mut driver = FrameDriver::new(
            seed,
            inputs,
            BrowserScheduler {
                callback: callback.clone(),
            },
        );
        driver.set_scene_options(settings.scene_options());

        let mut audio = AudioManager::new();
        audio.set_volume(settings.volume());

        let sensitivity = settings.sensitivity;
        let quality = settings.quality;
        let muted = settings.muted;
        let host = Host {
            shell: ShellState::new(sensitivity),
            audio,
            settings,
        };

        let app = Rc::new(RefCell::new(App {
            driver,
            target,
            host,
            canvas,
            last_overlay: None,
        }));

        {
            let app = app.clone();
            *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
                app.borrow_mut().frame(time);
            }));
        }
        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        setup_input_handlers(&document, sensitivity)?;
        setup_pointer(&app.borrow().canvas);
        setup_buttons(&document, muted);
        setup_quality_select(&document, quality);
        setup_lifecycle(callback)?;

        set_hidden(&document, "hud", false);

        {
            let mut app = app.borrow_mut();
            app.driver.start();
            app.update_hud();
        }

        log::info!("Neon Vader running with seed {}", seed);
        Ok(())
    }

    fn setup_input_handlers(
        document: &web_sys::Document,
        sensitivity: f32,
    ) -> Result<(), AppError> {
        let window =
            web_sys::window().ok_or_else(|| AppError::Environment("no window".into()))?;

        // Keyboard: Escape pauses, arrows adjust sensitivity
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = ShellKey::from_key(&event.key()) else {
                    return;
                };
                event.prevent_default();
                with_app(|app| {
                    app.host.shell.handle_key(key);
                    app.host.persist_sensitivity();
                    app.host.shell.sync(app.driver.inputs());
                });
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Sensitivity slider
        if let Some(el) = document.get_element_by_id("sensitivity-slider") {
            if let Ok(slider) = el.dyn_into::<HtmlInputElement>() {
                slider.set_value_as_number(sensitivity as f64);
                let source = slider.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let value = source.value_as_number() as f32;
                    with_app(|app| {
                        app.host.shell.set_sensitivity(value);
                        app.host.persist_sensitivity();
                    });
                });
                let _ = slider
                    .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Window resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                with_app(App::resize);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        Ok(())
    }

    /// Mouse or touch stands in for the hand when no tracker is pushing
    /// samples: position steers, any held button fires, leaving the canvas
    /// drops the signal.
    fn setup_pointer(canvas: &HtmlCanvasElement) {
        for name in ["pointermove", "pointerdown", "pointerup"] {
            let surface = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                write_hand(pointer_hand(
                    event.offset_x() as f32,
                    surface.client_width() as f32,
                    event.buttons(),
                ));
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerleave", "pointercancel"] {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                write_hand(HandState::inactive());
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_quality_select(document: &web_sys::Document, quality: QualityPreset) {
        let Some(select) = document
            .get_element_by_id("quality-select")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        select.set_value(quality.label());
        let source = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            match QualityPreset::from_label(&source.value()) {
                Some(preset) => with_app(|app| app.set_quality(preset)),
                None => log::warn!("Unknown quality preset {:?}", source.value()),
            }
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn mute_label(muted: bool) -> &'static str {
        if muted { "SOUND OFF" } else { "SOUND ON" }
    }

    fn setup_buttons(document: &web_sys::Document, muted: bool) {
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                    with_app(|app| {
                        // The canvas fills the viewport, so client x is canvas x
                        write_hand(pointer_hand(
                            event.client_x() as f32,
                            app.canvas.client_width() as f32,
                            0,
                        ));
                        app.start_game();
                    });
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                with_app(|app| {
                    app.host.shell.toggle_pause();
                    app.host.shell.sync(app.driver.inputs());
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("mute-btn") {
            btn.set_text_content(Some(mute_label(muted)));
            let label = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                with_app(|app| {
                    let muted = app.host.toggle_mute();
                    label.set_text_content(Some(mute_label(muted)));
                });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Suspend while the page sits in the back/forward cache and pick up
    /// again on return; tear everything down when it is really unloading.
    fn setup_lifecycle(callback: FrameCallback) -> Result<(), AppError> {
        let window =
            web_sys::window().ok_or_else(|| AppError::Environment("no window".into()))?;

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if event.persisted() {
                    with_app(|app| app.driver.suspend());
                    return;
                }
                with_app(|app| app.driver.dispose());
                // Breaks the app <-> callback cycle
                callback.borrow_mut().take();
                APP.with(|slot| slot.borrow_mut().take());
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
                if !event.persisted() {
                    return;
                }
                with_app(|app| {
                    app.resize();
                    app.driver.resume();
                });
            });
            let _ = window
                .add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Neon Vader (native) starting...");
    log::info!("Native mode runs a headless scripted session - run with `trunk serve` for the web version");

    headless::run(headless::SCRIPT_FRAMES);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use neon_vader::driver::{EventSink, FrameDriver, ManualScheduler};
    use neon_vader::input::{HandState, Inputs};
    use neon_vader::renderer::NullTarget;
    use neon_vader::shell::ShellState;
    use neon_vader::sim::{GameEvent, SoundCue};

    /// One minute at 60 fps
    pub const SCRIPT_FRAMES: u32 = 60 * 60;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    #[derive(Default)]
    struct LoggingSink {
        shell: ShellState,
        shots: u32,
        explosions: u32,
        pickups: u32,
    }

    impl EventSink for LoggingSink {
        fn on_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::ScoreDelta(points) => log::debug!("+{} points", points),
                other => log::info!("{:?}", other),
            }
            self.shell.apply(event);
        }

        fn on_sound(&mut self, cue: SoundCue) {
            match cue {
                SoundCue::Shoot => self.shots += 1,
                SoundCue::Explosion => self.explosions += 1,
                SoundCue::PowerUp => self.pickups += 1,
            }
        }
    }

    /// Sweep the hand back and forth, firing in bursts
    fn scripted_hand(frame: u32) -> HandState {
        let t = frame as f32 * FRAME_MS as f32 / 1000.0;
        HandState::tracking(0.5 + 0.3 * (t * 0.8).sin(), (frame / 90) % 3 != 2)
    }

    pub fn run(frames: u32) {
        let inputs = Inputs::default();
        let mut sink = LoggingSink::default();
        sink.shell.start_game();
        sink.shell.sync(&inputs);

        let mut driver = FrameDriver::new(0x4E56_4144, inputs, ManualScheduler::new());
        let mut target = NullTarget::default();
        driver.start();

        for frame in 0..frames {
            if driver.scheduler_mut().fire_next().is_none() {
                break;
            }
            let now = frame as f64 * FRAME_MS;
            let hand = scripted_hand(frame);
            driver.inputs().hand.set(hand);
            sink.shell.observe_hand(hand.is_active, now);
            sink.shell.sync(driver.inputs());

            driver.on_frame(now, &mut target, &mut sink);
            if sink.shell.game_over {
                break;
            }
        }
        driver.dispose();

        let session = driver.session();
        log::info!(
            "Session ended after {} frames: score {}, level {}, lives {}",
            session.frame_count,
            sink.shell.score,
            sink.shell.level,
            sink.shell.lives
        );
        log::info!(
            "{} shots, {} kills, {} pickups, {} frames presented",
            sink.shots,
            sink.explosions,
            sink.pickups,
            target.frames_presented
        );
    }
}
