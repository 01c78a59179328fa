pub mod physics;

use crate::animation::{Timeline, TweenRecord};
use crate::config::PhysicsConfig;
use crate::track::Section;
use std::time::{Duration, Instant};

/// Who currently owns the scroll offset. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Dragging,
    Wheeling,
    AutoScrolling,
}

/// Offsets in physical pixels. `current` is what is drawn, `target` is where
/// the controller is heading. Either may sit outside `[0, max_scroll]` while
/// the user is interacting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
    pub max_scroll: f32,
}

impl ScrollState {
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(0.0, self.max_scroll)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScrollProp {
    Current,
    Target,
}

/// Inertial horizontal scroll controller: turns wheel, drag and jump intents
/// into a target offset and eases the rendered offset toward it each frame.
pub struct ScrollController {
    state: ScrollState,
    mode: InteractionMode,
    physics: PhysicsConfig,
    viewport_width: f32,
    drag_start_x: f32,
    drag_start_scroll: f32,
    wheel_deadline: Option<Instant>,
    tweens: Timeline<ScrollProp>,
}

impl ScrollController {
    pub fn new(physics: PhysicsConfig, track_width: f32, viewport_width: f32) -> Self {
        let mut ctl = Self {
            state: ScrollState { current: 0.0, target: 0.0, max_scroll: 0.0 },
            mode: InteractionMode::Idle,
            physics,
            viewport_width: 0.0,
            drag_start_x: 0.0,
            drag_start_scroll: 0.0,
            wheel_deadline: None,
            tweens: Timeline::new(),
        };
        ctl.resize(track_width, viewport_width);
        ctl
    }

    #[cfg(test)]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn current(&self) -> f32 {
        self.state.current
    }

    pub fn viewport_width(&self) -> f32 {
        self.viewport_width
    }

    /// Horizontal translation to apply to the track this frame.
    pub fn translate_x(&self) -> f32 {
        -self.state.current
    }

    pub fn set_physics(&mut self, physics: PhysicsConfig) {
        self.physics = physics;
    }

    /// Recompute the scroll range. Offsets are left where they are; spring-back
    /// pulls them into the new range once the controller is idle.
    pub fn resize(&mut self, track_width: f32, viewport_width: f32) {
        self.viewport_width = viewport_width;
        let raw = track_width - viewport_width;
        if raw < 0.0 {
            log::debug!("track narrower than viewport ({} < {}), max_scroll = 0", track_width, viewport_width);
        }
        self.state.max_scroll = raw.max(0.0);
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            log::debug!("scroll mode {:?} -> {:?}", self.mode, mode);
            self.mode = mode;
        }
    }

    /// Stop an in-flight jump, keeping the last interpolated offsets.
    fn cancel_auto_scroll(&mut self) {
        if self.mode == InteractionMode::AutoScrolling {
            self.tweens.kill_tweens_of(ScrollProp::Current);
            self.tweens.kill_tweens_of(ScrollProp::Target);
            log::debug!("jump cancelled at {:.1}px", self.state.current);
            self.set_mode(InteractionMode::Idle);
        }
    }

    // ── input ───────────────────────────────────────────────────────────

    /// Apply a vertical wheel delta as horizontal travel.
    pub fn on_wheel(&mut self, delta_y: f32, now: Instant) {
        self.cancel_auto_scroll();
        self.expire_wheel(now);

        let delta = physics::resist_wheel(
            delta_y,
            self.state.target,
            self.state.max_scroll,
            self.physics.elasticity,
        );
        self.state.target += delta;

        if self.mode == InteractionMode::Dragging {
            // The drag owns the mode until release; keep the wheel's travel
            // when the next pointer move recomputes the target.
            self.drag_start_scroll += delta;
            return;
        }
        self.set_mode(InteractionMode::Wheeling);
        self.wheel_deadline = Some(now + Duration::from_millis(self.physics.wheel_debounce_ms));
    }

    pub fn on_pointer_down(&mut self, x: f32) {
        self.cancel_auto_scroll();
        self.wheel_deadline = None;
        self.drag_start_x = x;
        self.drag_start_scroll = self.state.target;
        self.set_mode(InteractionMode::Dragging);
    }

    pub fn on_pointer_move(&mut self, x: f32) {
        if self.mode != InteractionMode::Dragging {
            return;
        }
        self.state.target = physics::drag_target(
            self.drag_start_scroll,
            self.drag_start_x,
            x,
            self.physics.drag_speed,
            self.state.max_scroll,
            self.physics.elasticity,
        );
    }

    pub fn on_pointer_up(&mut self) {
        if self.mode == InteractionMode::Dragging {
            self.set_mode(InteractionMode::Idle);
        }
    }

    /// Ease both offsets to the position that centres `section`, clamped to
    /// the valid range. Returns the clamped destination.
    pub fn jump_to_section(&mut self, section: &Section, now: Instant) -> f32 {
        let wanted = section.center() - self.viewport_width / 2.0;
        let dest = self.state.clamp(wanted);
        let duration = self.physics.jump_duration();
        let easing = self.physics.jump_easing;

        self.wheel_deadline = None;
        self.tweens.add(
            TweenRecord::new(ScrollProp::Current, self.state.current, dest, duration, easing),
            now,
        );
        self.tweens.add(
            TweenRecord::new(ScrollProp::Target, self.state.target, dest, duration, easing),
            now,
        );
        log::debug!("jump to section {} -> {:.1}px (wanted {:.1})", section.index, dest, wanted);
        self.set_mode(InteractionMode::AutoScrolling);
        dest
    }

    // ── frame stages, called in this order by the frame scheduler ──────

    pub fn advance_tweens(&mut self, now: Instant) {
        if self.mode != InteractionMode::AutoScrolling {
            return;
        }
        let sample = self.tweens.sample(now);
        if let Some(v) = sample.value_of(&ScrollProp::Current) {
            self.state.current = v;
        }
        if let Some(v) = sample.value_of(&ScrollProp::Target) {
            self.state.target = v;
        }
        if sample.completed(&ScrollProp::Current) {
            self.set_mode(InteractionMode::Idle);
        }
    }

    /// Drop out of `Wheeling` once the debounce window has passed.
    pub fn expire_wheel(&mut self, now: Instant) {
        if self.mode != InteractionMode::Wheeling {
            return;
        }
        if self.wheel_deadline.map_or(true, |deadline| now >= deadline) {
            self.wheel_deadline = None;
            self.set_mode(InteractionMode::Idle);
        }
    }

    pub fn apply_boundary(&mut self) {
        if self.mode != InteractionMode::Idle {
            return;
        }
        self.state.target = physics::spring_back(
            self.state.target,
            self.state.max_scroll,
            self.physics.spring_factor,
        );
    }

    pub fn integrate(&mut self) {
        if self.mode == InteractionMode::AutoScrolling {
            return;
        }
        self.state.current = physics::integrate(
            self.state.current,
            self.state.target,
            self.physics.friction,
        );
        if self.mode == InteractionMode::Idle
            && (self.state.target - self.state.current).abs() < physics::SNAP_EPSILON
        {
            self.state.current = self.state.target;
        }
    }

    /// Drop any pending jump and wheel state and go idle where the track
    /// currently is.
    pub fn halt(&mut self) {
        self.tweens.clear();
        self.wheel_deadline = None;
        self.state.target = self.state.current;
        self.set_mode(InteractionMode::Idle);
    }

    /// True when nothing will move without new input.
    #[cfg(test)]
    pub fn is_settled(&self) -> bool {
        self.mode == InteractionMode::Idle
            && self.state.current == self.state.target
            && !physics::out_of_range(self.state.target, self.state.max_scroll)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctl(max_scroll: f32) -> ScrollController {
        ScrollController::new(PhysicsConfig::default(), 1000.0 + max_scroll, 1000.0)
    }

    fn section(offset_left: f32, width: f32) -> Section {
        Section {
            index: 0,
            offset_left,
            width,
            display_name: String::new(),
            color: [1.0; 4],
        }
    }

    fn run_frames(c: &mut ScrollController, now: Instant, n: usize) {
        for _ in 0..n {
            c.advance_tweens(now);
            c.expire_wheel(now);
            c.apply_boundary();
            c.integrate();
        }
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── resize ──────────────────────────────────────────────────────────

    #[test]
    fn narrow_track_clamps_max_scroll() {
        let c = ScrollController::new(PhysicsConfig::default(), 500.0, 1000.0);
        assert_eq!(c.state().max_scroll, 0.0);
    }

    #[test]
    fn resize_keeps_offsets() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_wheel(900.0, t0);
        run_frames(&mut c, t0 + ms(200), 400);
        assert_eq!(c.state().current, 900.0);

        c.resize(1500.0, 1000.0);
        assert_eq!(c.state().max_scroll, 500.0);
        assert_eq!(c.state().current, 900.0);
        assert_eq!(c.state().target, 900.0);

        run_frames(&mut c, t0 + ms(400), 600);
        assert_eq!(c.state().target, 500.0);
        assert!((c.state().current - 500.0).abs() < 1e-3);
    }

    // ── wheel ───────────────────────────────────────────────────────────

    #[test]
    fn wheel_sets_wheeling_then_debounces() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_wheel(100.0, t0);
        assert_eq!(c.mode(), InteractionMode::Wheeling);
        assert_eq!(c.state().target, 100.0);

        c.expire_wheel(t0 + ms(50));
        assert_eq!(c.mode(), InteractionMode::Wheeling);
        c.expire_wheel(t0 + ms(100));
        assert_eq!(c.mode(), InteractionMode::Idle);
    }

    #[test]
    fn each_wheel_event_rearms_the_debounce() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_wheel(10.0, t0);
        c.on_wheel(10.0, t0 + ms(80));
        c.expire_wheel(t0 + ms(150));
        assert_eq!(c.mode(), InteractionMode::Wheeling);
        c.expire_wheel(t0 + ms(180));
        assert_eq!(c.mode(), InteractionMode::Idle);
    }

    #[test]
    fn spaced_wheel_events_snap_back_between_them() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_wheel(-100.0, t0);
        assert_eq!(c.state().target, -100.0);

        // frames before the debounce expires leave the overshoot alone
        run_frames(&mut c, t0 + ms(50), 5);
        assert_eq!(c.state().target, -100.0);

        // after 100ms the controller is idle and the spring engages
        run_frames(&mut c, t0 + ms(150), 1);
        assert_eq!(c.mode(), InteractionMode::Idle);
        assert!((c.state().target + 80.0).abs() < 1e-3);

        // the next spaced event starts a fresh wheeling period
        c.on_wheel(-10.0, t0 + ms(300));
        assert_eq!(c.mode(), InteractionMode::Wheeling);
        run_frames(&mut c, t0 + ms(450), 1);
        assert_eq!(c.mode(), InteractionMode::Idle);
    }

    #[test]
    fn stale_deadline_is_resolved_on_next_wheel() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_wheel(10.0, t0);
        // no frames ran in between; the event still starts a new period
        c.on_wheel(10.0, t0 + ms(500));
        assert_eq!(c.mode(), InteractionMode::Wheeling);
        c.expire_wheel(t0 + ms(550));
        assert_eq!(c.mode(), InteractionMode::Wheeling);
        c.expire_wheel(t0 + ms(600));
        assert_eq!(c.mode(), InteractionMode::Idle);
    }

    #[test]
    fn wheel_past_edge_is_resisted() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_wheel(-50.0, t0);
        c.on_wheel(-50.0, t0 + ms(10));
        assert!((c.state().target + 60.0).abs() < 1e-3);
    }

    // ── drag ────────────────────────────────────────────────────────────

    #[test]
    fn drag_moves_target_by_amplified_delta() {
        let mut c = ctl(1000.0);
        c.on_pointer_down(600.0);
        assert_eq!(c.mode(), InteractionMode::Dragging);
        c.on_pointer_move(400.0);
        assert_eq!(c.state().target, 300.0);
        c.on_pointer_move(500.0);
        assert_eq!(c.state().target, 150.0);
        c.on_pointer_up();
        assert_eq!(c.mode(), InteractionMode::Idle);
    }

    #[test]
    fn move_without_press_is_ignored() {
        let mut c = ctl(1000.0);
        c.on_pointer_move(100.0);
        assert_eq!(c.state().target, 0.0);
    }

    #[test]
    fn no_snap_back_while_dragging() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_pointer_down(0.0);
        c.on_pointer_move(200.0);
        let held = c.state().target;
        assert!(held < 0.0);
        run_frames(&mut c, t0, 20);
        assert_eq!(c.state().target, held);
    }

    #[test]
    fn released_overshoot_springs_back_geometrically() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.state.current = 1000.0;
        c.state.target = 1000.0;
        c.on_pointer_down(0.0);
        // 1000 + 500 * 1.5 = 1750 raw, 1000 + 750 * 0.2 = 1150 after resistance
        c.on_pointer_move(-500.0);
        assert!((c.state().target - 1150.0).abs() < 1e-2);
        c.on_pointer_up();

        let mut prev = c.state().target - 1000.0;
        for _ in 0..10 {
            c.apply_boundary();
            let over = c.state().target - 1000.0;
            assert!((over - prev * 0.8).abs() < 1e-2);
            prev = over;
        }
        run_frames(&mut c, t0, 60);
        assert_eq!(c.state().target, 1000.0);
    }

    #[test]
    fn wheel_during_drag_keeps_drag_mode() {
        let t0 = Instant::now();
        let mut c = ctl(1000.0);
        c.on_pointer_down(500.0);
        c.on_wheel(40.0, t0);
        assert_eq!(c.mode(), InteractionMode::Dragging);
        c.on_pointer_move(500.0);
        assert_eq!(c.state().target, 40.0);
    }

    // ── convergence ─────────────────────────────────────────────────────

    #[test]
    fn idle_frames_converge_to_clamped_target() {
        let t0 = Instant::now();
        for start in [-300.0f32, 0.0, 420.0, 1000.0, 1700.0] {
            let mut c = ctl(1000.0);
            c.on_pointer_down(0.0);
            c.state.target = start;
            c.on_pointer_up();
            run_frames(&mut c, t0, 1000);
            let expected = start.clamp(0.0, 1000.0);
            assert!((c.state().current - expected).abs() < 1e-3, "start {}", start);
            assert!(c.is_settled());
        }
    }

    // ── jump ────────────────────────────────────────────────────────────

    #[test]
    fn jump_target_is_clamped() {
        let t0 = Instant::now();
        let mut c = ScrollController::new(PhysicsConfig::default(), 1800.0, 800.0);
        assert_eq!(c.state().max_scroll, 1000.0);
        // centre 1600 - 400 = 1200 wanted
        let dest = c.jump_to_section(&section(1400.0, 400.0), t0);
        assert_eq!(dest, 1000.0);
        assert_eq!(c.mode(), InteractionMode::AutoScrolling);

        run_frames(&mut c, t0 + ms(2600), 1);
        assert_eq!(c.mode(), InteractionMode::Idle);
        assert_eq!(c.state().current, 1000.0);
        assert_eq!(c.state().target, 1000.0);
    }

    #[test]
    fn jump_drives_current_directly() {
        let t0 = Instant::now();
        let mut c = ctl(2000.0);
        c.jump_to_section(&section(1000.0, 600.0), t0);
        run_frames(&mut c, t0 + ms(1250), 1);
        let mid = c.state().current;
        assert!(mid > 0.0 && mid < 800.0);
        assert_eq!(c.state().current, c.state().target);
    }

    #[test]
    fn wheel_cancels_jump_without_snapping() {
        let t0 = Instant::now();
        let mut c = ctl(2000.0);
        c.jump_to_section(&section(1500.0, 600.0), t0);
        run_frames(&mut c, t0 + ms(300), 1);
        let at_cancel = c.state().current;
        assert!(at_cancel > 0.0);

        c.on_wheel(10.0, t0 + ms(310));
        assert_eq!(c.mode(), InteractionMode::Wheeling);
        assert_eq!(c.state().current, at_cancel);
        assert!((c.state().target - (at_cancel + 10.0)).abs() < 1e-3);

        // integration resumes from where the tween left off
        run_frames(&mut c, t0 + ms(320), 1);
        assert!((c.state().current - at_cancel - 0.8).abs() < 1e-2);

        // the killed tween never writes again
        run_frames(&mut c, t0 + ms(3000), 200);
        assert!((c.state().current - (at_cancel + 10.0)).abs() < 1e-2);
    }

    #[test]
    fn press_cancels_jump_and_starts_drag_from_interpolated_value() {
        let t0 = Instant::now();
        let mut c = ctl(2000.0);
        c.jump_to_section(&section(1500.0, 600.0), t0);
        run_frames(&mut c, t0 + ms(400), 1);
        let at_cancel = c.state().target;

        c.on_pointer_down(100.0);
        assert_eq!(c.mode(), InteractionMode::Dragging);
        c.on_pointer_move(100.0);
        assert_eq!(c.state().target, at_cancel);
    }

    #[test]
    fn halt_drops_a_running_jump() {
        let t0 = Instant::now();
        let mut c = ctl(2000.0);
        c.jump_to_section(&section(1500.0, 600.0), t0);
        run_frames(&mut c, t0 + ms(500), 1);
        let at_halt = c.state().current;

        c.halt();
        assert!(c.is_settled());
        run_frames(&mut c, t0 + ms(3000), 10);
        assert_eq!(c.state().current, at_halt);
    }

    #[test]
    fn jump_with_unrepresentable_duration_uses_default() {
        let t0 = Instant::now();
        let mut c = ctl(2000.0);
        c.set_physics(PhysicsConfig { jump_duration_secs: f32::INFINITY, ..PhysicsConfig::default() });
        let dest = c.jump_to_section(&section(1000.0, 600.0), t0);
        assert_eq!(c.mode(), InteractionMode::AutoScrolling);

        run_frames(&mut c, t0 + ms(1250), 1);
        assert!(c.state().current > 0.0 && c.state().current < dest);
        run_frames(&mut c, t0 + ms(2500), 1);
        assert_eq!(c.state().current, dest);
        assert_eq!(c.mode(), InteractionMode::Idle);
    }
}
