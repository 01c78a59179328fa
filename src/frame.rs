use crate::scene::Scene;
use crate::scroll::InteractionMode;
use std::time::{Duration, Instant};

/// What the renderer needs from one scheduler pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Horizontal translation of the track in physical pixels.
    pub translate_x: f32,
    pub mode: InteractionMode,
}

/// Drives the scene once per display frame, paced to `target_fps`.
/// Runs from construction until `stop`.
pub struct FrameScheduler {
    interval: Duration,
    last_frame: Instant,
    frames: u64,
    running: bool,
}

impl FrameScheduler {
    pub fn new(target_fps: u32, now: Instant) -> Self {
        Self {
            interval: Self::interval_for(target_fps),
            last_frame: now,
            frames: 0,
            running: true,
        }
    }

    fn interval_for(target_fps: u32) -> Duration {
        Duration::from_millis(1000 / target_fps.max(1) as u64)
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.interval = Self::interval_for(target_fps);
    }

    pub fn stop(&mut self) {
        if self.running {
            log::debug!("frame scheduler stopped after {} frames", self.frames);
            self.running = false;
        }
    }

    /// Whether a redraw should be requested at `now`.
    pub fn is_due(&self, now: Instant) -> bool {
        self.running && now.duration_since(self.last_frame) >= self.interval
    }

    /// One ordered pass: tweens, wheel debounce, spring-back, momentum, then
    /// the overlays that read the integrated offset. Returns `None` once the
    /// scheduler or the scene has been shut down.
    pub fn tick(&mut self, scene: &mut Scene, now: Instant) -> Option<Frame> {
        if !self.running || scene.is_disposed() {
            self.stop();
            return None;
        }
        self.last_frame = now;
        self.frames += 1;

        scene.scroll.advance_tweens(now);
        scene.scroll.expire_wheel(now);
        scene.scroll.apply_boundary();
        scene.scroll.integrate();

        let current = scene.scroll.current();
        scene.hint.update(current, now);
        scene.nav.update(scene.track.sections(), current, scene.scroll.viewport_width(), now);

        Some(Frame {
            translate_x: scene.scroll.translate_x(),
            mode: scene.scroll.mode(),
        })
    }
}
