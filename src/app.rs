use crate::config::Config;
use crate::frame::FrameScheduler;
use crate::input::{wheel_delta, Intent, PointerTracker};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::scroll::InteractionMode;
use anyhow::{Context, Result};
use crossbeam_channel::Receiver;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorIcon, Window, WindowAttributes, WindowId};

struct WindowState {
    window: Arc<Window>,
    renderer: Renderer,
    scene: Scene,
    scheduler: FrameScheduler,
    pointer: PointerTracker,
    /// Whether the window currently shows the grabbing cursor.
    grabbing: bool,
    config_rx: Option<Receiver<()>>,
    _config_watcher: Option<RecommendedWatcher>,
}

impl WindowState {
    fn dispatch(&mut self, intents: Vec<Intent>) {
        let now = Instant::now();
        for intent in intents {
            self.scene.dispatch(intent, now);
        }
    }
}

/// Watch the config directory; a message arrives on the returned channel
/// whenever the config file is written.
fn watch_config() -> (Option<RecommendedWatcher>, Receiver<()>) {
    let config_path = Config::config_path();
    let (tx, rx) = crossbeam_channel::bounded::<()>(1);
    let watch_path = config_path.clone();
    let mut watcher =
        notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                if (event.kind.is_modify() || event.kind.is_create())
                    && event.paths.iter().any(|p| p == &watch_path)
                {
                    let _ = tx.try_send(());
                }
            }
        })
        .map_err(|e| log::warn!("config watcher unavailable: {}", e))
        .ok();
    if let (Some(w), Some(dir)) = (watcher.as_mut(), config_path.parent()) {
        if let Err(e) = w.watch(dir, RecursiveMode::NonRecursive) {
            log::warn!("cannot watch {:?}: {}", dir, e);
        }
    }
    (watcher, rx)
}

pub struct App {
    state: Option<WindowState>,
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { state: None, config }
    }

    fn create_window_state(event_loop: &ActiveEventLoop, config: &Config) -> Result<WindowState> {
        let attrs = WindowAttributes::default()
            .with_title(config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ));

        let window = Arc::new(event_loop.create_window(attrs).context("create window")?);
        let renderer = Renderer::new(window.clone(), config)?;

        let size = window.inner_size();
        let scale = window.scale_factor() as f32;
        let scene = Scene::create(config, size.width as f32, size.height as f32, scale);
        let scheduler = FrameScheduler::new(config.animation.target_fps, Instant::now());
        let (watcher, rx) = watch_config();

        Ok(WindowState {
            window,
            renderer,
            scene,
            scheduler,
            pointer: PointerTracker::new(),
            grabbing: false,
            config_rx: Some(rx),
            _config_watcher: watcher,
        })
    }

    fn reload_config(&mut self) {
        let Some(state) = self.state.as_mut() else { return };
        let new_config = Config::load_or_default();
        log::debug!("config reloaded");
        let scale = state.window.scale_factor() as f32;
        state.scene.apply_config(&new_config);
        state.scheduler.set_target_fps(new_config.animation.target_fps);
        state.renderer.apply_config(&new_config, scale);
        self.config = new_config;
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(mut state) = self.state.take() {
            state.scene.dispose();
            state.scheduler.stop();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match Self::create_window_state(event_loop, &self.config) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("startup failed: {:#}", e);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            if state.scheduler.is_due(Instant::now()) {
                state.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let config = &self.config;
        let Some(state) = self.state.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),

            WindowEvent::Resized(new_size) => {
                state.renderer.resize(new_size.width, new_size.height);
                let scale = state.window.scale_factor() as f32;
                state
                    .scene
                    .resize(new_size.width as f32, new_size.height as f32, scale);
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = state.window.inner_size();
                state.renderer.apply_config(config, scale_factor as f32);
                state
                    .scene
                    .resize(size.width as f32, size.height as f32, scale_factor as f32);
            }

            WindowEvent::CursorMoved { position, .. } => {
                let intents = state.pointer.cursor_moved(
                    position.x as f32,
                    position.y as f32,
                    state.scene.nav_layout(),
                );
                state.dispatch(intents);
            }

            WindowEvent::CursorLeft { .. } => {
                let intents = state.pointer.cursor_left();
                state.dispatch(intents);
            }

            WindowEvent::MouseInput { state: button_state, button: MouseButton::Left, .. } => {
                let intents = state.pointer.mouse_button(button_state, state.scene.nav_layout());
                state.dispatch(intents);
            }

            WindowEvent::Touch(touch) => {
                let intents = state.pointer.touch(
                    touch.id,
                    touch.phase,
                    touch.location.x as f32,
                    touch.location.y as f32,
                    state.scene.nav_layout(),
                );
                state.dispatch(intents);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let dy = wheel_delta(delta, config.physics.line_scroll_px);
                state.dispatch(vec![Intent::Wheel(dy)]);
            }

            WindowEvent::RedrawRequested => {
                if state
                    .config_rx
                    .as_ref()
                    .map_or(false, |rx| rx.try_recv().is_ok())
                {
                    self.reload_config();
                }
                let Some(state) = self.state.as_mut() else { return };

                let now = Instant::now();
                let Some(frame) = state.scheduler.tick(&mut state.scene, now) else {
                    return;
                };

                let grabbing = frame.mode == InteractionMode::Dragging;
                if grabbing != state.grabbing {
                    state.grabbing = grabbing;
                    state.window.set_cursor(if grabbing { CursorIcon::Grabbing } else { CursorIcon::Default });
                }

                match state.renderer.render(&state.scene, &frame) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let s = state.window.inner_size();
                        state.renderer.resize(s.width, s.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of GPU memory");
                        self.shutdown(event_loop);
                    }
                    Err(e) => {
                        log::warn!("Surface error: {:?}", e);
                    }
                }
            }

            _ => {}
        }
    }
}
