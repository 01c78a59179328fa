use crate::config::Config;
use crate::hint::ScrollHint;
use crate::input::Intent;
use crate::nav::layout::NavLayout;
use crate::nav::NavIndicator;
use crate::scroll::ScrollController;
use crate::track::Track;
use std::time::Instant;

/// Everything one view owns: the track, its scroll controller and the
/// overlays that read the scroll offset. Created once per window, disposed
/// when the window goes away.
pub struct Scene {
    pub(crate) track: Track,
    pub(crate) scroll: ScrollController,
    pub(crate) nav: NavIndicator,
    pub(crate) hint: ScrollHint,
    nav_layout: NavLayout,
    viewport: (f32, f32),
    scale: f32,
    disposed: bool,
}

impl Scene {
    pub fn create(config: &Config, width: f32, height: f32, scale: f32) -> Self {
        let track = Track::new(&config.sections, &config.track, width);
        let scroll = ScrollController::new(config.physics.clone(), track.width(), width);
        let mut nav = NavIndicator::new(config.nav.clone());
        nav.bind_sections(track.sections());
        let nav_layout = NavLayout::compute(track.sections().len(), width, height, &config.nav, scale);
        log::debug!(
            "scene created: {} sections, track {:.0}px, viewport {:.0}x{:.0}",
            track.sections().len(),
            track.width(),
            width,
            height
        );
        Self {
            track,
            scroll,
            nav,
            hint: ScrollHint::new(config.hint.clone()),
            nav_layout,
            viewport: (width, height),
            scale,
            disposed: false,
        }
    }

    /// Stop reacting to input and frames. Idempotent.
    pub fn dispose(&mut self) {
        if !self.disposed {
            self.scroll.halt();
            log::debug!("scene disposed at {:.1}px", self.scroll.current());
            self.disposed = true;
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn nav(&self) -> &NavIndicator {
        &self.nav
    }

    pub fn hint(&self) -> &ScrollHint {
        &self.hint
    }

    pub fn nav_layout(&self) -> &NavLayout {
        &self.nav_layout
    }

    fn relayout_nav(&mut self) {
        self.nav_layout = NavLayout::compute(
            self.track.sections().len(),
            self.viewport.0,
            self.viewport.1,
            self.nav.config(),
            self.scale,
        );
    }

    pub fn resize(&mut self, width: f32, height: f32, scale: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.viewport = (width, height);
        self.scale = scale;
        self.track.relayout(width);
        self.scroll.resize(self.track.width(), width);
        self.relayout_nav();
    }

    /// Apply a reloaded config. The section set is fixed for the life of the
    /// scene, so only tuning values are taken over.
    pub fn apply_config(&mut self, config: &Config) {
        if config.sections.len() != self.track.sections().len() {
            log::warn!("section changes take effect after restart");
        }
        self.scroll.set_physics(config.physics.clone());
        self.nav.set_config(config.nav.clone());
        self.hint.set_config(config.hint.clone());
        self.relayout_nav();
    }

    pub fn dispatch(&mut self, intent: Intent, now: Instant) {
        if self.disposed {
            return;
        }
        match intent {
            Intent::Wheel(dy) => self.scroll.on_wheel(dy, now),
            Intent::PointerDown(x) => self.scroll.on_pointer_down(x),
            Intent::PointerMove(x) => self.scroll.on_pointer_move(x),
            Intent::PointerUp => self.scroll.on_pointer_up(),
            Intent::Jump(index) => match self.track.section(index) {
                Some(section) => {
                    self.scroll.jump_to_section(section, now);
                }
                None => log::warn!("jump to unknown section {}", index),
            },
            Intent::HoverEnter(index) => self.nav.pointer_enter(index, self.track.sections(), now),
            Intent::HoverLeave { related } => self.nav.pointer_leave(related, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SectionConfig, TrackConfig};
    use crate::scroll::InteractionMode;

    fn config(n: usize) -> Config {
        let mut cfg = Config::default();
        cfg.track = TrackConfig { gap: 0.0, padding: 0.0 };
        cfg.sections = (0..n)
            .map(|i| SectionConfig { name: format!("S{}", i), width: 1.0, color: "#000000".into() })
            .collect();
        cfg
    }

    #[test]
    fn create_binds_one_line_per_section() {
        let scene = Scene::create(&config(4), 800.0, 600.0, 1.0);
        assert_eq!(scene.nav().lines().len(), 4);
        assert_eq!(scene.nav_layout().slots.len(), 4);
        assert_eq!(scene.scroll.state().max_scroll, 2400.0);
    }

    #[test]
    fn empty_scene_is_inert() {
        let mut scene = Scene::create(&config(0), 800.0, 600.0, 1.0);
        assert_eq!(scene.scroll.state().max_scroll, 0.0);
        scene.dispatch(Intent::Jump(0), Instant::now());
        assert_eq!(scene.scroll.mode(), InteractionMode::Idle);
    }

    #[test]
    fn jump_intent_targets_section_centre() {
        let mut scene = Scene::create(&config(4), 800.0, 600.0, 1.0);
        scene.dispatch(Intent::Jump(2), Instant::now());
        assert_eq!(scene.scroll.mode(), InteractionMode::AutoScrolling);
    }

    #[test]
    fn hover_intents_reach_the_nav() {
        let now = Instant::now();
        let mut scene = Scene::create(&config(4), 800.0, 600.0, 1.0);
        scene.dispatch(Intent::HoverEnter(1), now);
        assert_eq!(scene.nav().state().hovered_index, Some(1));
        scene.dispatch(Intent::HoverLeave { related: Some(2) }, now);
        assert!(scene.nav().state().is_hovering);
        scene.dispatch(Intent::HoverLeave { related: None }, now);
        assert!(!scene.nav().state().is_hovering);
    }

    #[test]
    fn resize_rescales_track_without_moving_offsets() {
        let mut scene = Scene::create(&config(2), 800.0, 600.0, 1.0);
        scene.dispatch(Intent::PointerDown(400.0), Instant::now());
        scene.dispatch(Intent::PointerMove(0.0), Instant::now());
        let target = scene.scroll.state().target;
        scene.resize(400.0, 600.0, 1.0);
        assert_eq!(scene.track().width(), 800.0);
        assert_eq!(scene.scroll.state().max_scroll, 400.0);
        assert_eq!(scene.scroll.state().target, target);
    }

    #[test]
    fn disposed_scene_ignores_input() {
        let mut scene = Scene::create(&config(3), 800.0, 600.0, 1.0);
        scene.dispose();
        scene.dispatch(Intent::Wheel(100.0), Instant::now());
        assert_eq!(scene.scroll.state().target, 0.0);
        assert!(scene.is_disposed());
    }
}
