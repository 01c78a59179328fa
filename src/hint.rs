use crate::animation::{Easing, Timeline, TweenRecord};
use crate::config::HintConfig;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Opacity;

/// "Scroll to explore" prompt: visible at rest, faded out once the track has
/// moved past a small threshold, faded back in when it returns.
pub struct ScrollHint {
    cfg: HintConfig,
    hidden: bool,
    opacity: f32,
    fades: Timeline<Opacity>,
}

impl ScrollHint {
    pub fn new(cfg: HintConfig) -> Self {
        Self { cfg, hidden: false, opacity: 1.0, fades: Timeline::new() }
    }

    pub fn set_config(&mut self, cfg: HintConfig) {
        self.cfg = cfg;
    }

    pub fn text(&self) -> &str {
        &self.cfg.text
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[cfg(test)]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Start a fade only when the offset crosses the threshold.
    pub fn update(&mut self, current: f32, now: Instant) {
        let past = current > self.cfg.threshold_px;
        if past != self.hidden {
            self.hidden = past;
            let to = if past { 0.0 } else { 1.0 };
            log::debug!("scroll hint {}", if past { "hidden" } else { "shown" });
            self.fades.add(
                TweenRecord::new(
                    Opacity,
                    self.opacity,
                    to,
                    Duration::from_millis(self.cfg.fade_ms),
                    Easing::Power2Out,
                ),
                now,
            );
        }
        if let Some(v) = self.fades.sample(now).value_of(&Opacity) {
            self.opacity = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hides_past_threshold_and_returns() {
        let t0 = Instant::now();
        let mut hint = ScrollHint::new(HintConfig::default());
        hint.update(10.0, t0);
        assert!(!hint.is_hidden());
        assert_eq!(hint.opacity(), 1.0);

        hint.update(51.0, t0);
        assert!(hint.is_hidden());
        hint.update(300.0, t0 + Duration::from_millis(250));
        assert!(hint.opacity() > 0.0 && hint.opacity() < 1.0);
        hint.update(300.0, t0 + Duration::from_millis(600));
        assert_eq!(hint.opacity(), 0.0);

        hint.update(50.0, t0 + Duration::from_millis(700));
        assert!(!hint.is_hidden());
        hint.update(0.0, t0 + Duration::from_millis(1300));
        assert_eq!(hint.opacity(), 1.0);
    }

    #[test]
    fn reversal_mid_fade_starts_from_current_opacity() {
        let t0 = Instant::now();
        let mut hint = ScrollHint::new(HintConfig::default());
        hint.update(100.0, t0);
        hint.update(100.0, t0 + Duration::from_millis(100));
        let partial = hint.opacity();
        hint.update(0.0, t0 + Duration::from_millis(100));
        assert_eq!(hint.opacity(), partial);
    }
}
