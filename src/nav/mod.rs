pub mod layout;

use crate::animation::{Easing, Timeline, TweenRecord};
use crate::config::NavConfig;
use crate::track::Section;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Whether scroll proximity drives line height as well as opacity.
/// Hover always animates both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HeightPolicy {
    /// Height follows activation from `base_height` to `peak_height`.
    #[default]
    Proximity,
    /// Height stays at `base_height`; only opacity follows activation.
    Fixed,
}

/// Rendered state of one indicator line, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavLine {
    pub height: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavState {
    pub is_hovering: bool,
    pub hovered_index: Option<usize>,
}

impl NavState {
    /// Returns true when the hovered line changed.
    pub fn pointer_enter(&mut self, index: usize) -> bool {
        let changed = self.hovered_index != Some(index);
        self.is_hovering = true;
        self.hovered_index = Some(index);
        changed
    }

    /// Leaving towards another hit target is a hand-off, not a leave; the
    /// matching enter follows. Returns true when hovering actually ended.
    pub fn pointer_leave(&mut self, related: Option<usize>) -> bool {
        if related.is_some() || !self.is_hovering {
            return false;
        }
        self.is_hovering = false;
        self.hovered_index = None;
        true
    }
}

/// Gaussian falloff of prominence with distance from the viewport centre,
/// `dist_ratio` measured in viewport widths.
pub fn activation(dist_ratio: f32, k: f32) -> f32 {
    (-k * dist_ratio * dist_ratio).exp()
}

/// Activation of the section at `index` (of `count`) with the track scrolled
/// to `current`. The first section stays fully lit while it sits right of
/// centre, the last while it sits left of centre.
pub fn section_activation(
    section: &Section,
    index: usize,
    count: usize,
    current: f32,
    viewport_width: f32,
    k: f32,
) -> f32 {
    let viewport_center = viewport_width / 2.0;
    let visual_center = section.center() - current;
    if index == 0 && visual_center > viewport_center {
        return 1.0;
    }
    if index + 1 == count && visual_center < viewport_center {
        return 1.0;
    }
    let dist_ratio = (visual_center - viewport_center).abs() / viewport_width;
    activation(dist_ratio, k)
}

pub fn proximity_target(activation: f32, cfg: &NavConfig) -> NavLine {
    let height = match cfg.height_policy {
        HeightPolicy::Proximity => cfg.base_height + (cfg.peak_height - cfg.base_height) * activation,
        HeightPolicy::Fixed => cfg.base_height,
    };
    NavLine {
        height,
        opacity: cfg.base_opacity + (1.0 - cfg.base_opacity) * activation.powf(1.5),
    }
}

pub fn hover_target(index: usize, hovered: usize, cfg: &NavConfig) -> NavLine {
    match index.abs_diff(hovered) {
        0 => NavLine { height: cfg.peak_height, opacity: 1.0 },
        1 => NavLine { height: cfg.neighbor_height, opacity: cfg.neighbor_opacity },
        _ => NavLine { height: cfg.base_height, opacity: cfg.base_opacity },
    }
}

fn lerp(start: f32, end: f32, amt: f32) -> f32 {
    (1.0 - amt) * start + amt * end
}

/// Name label shown above the lines while a line is hovered.
#[derive(Debug, Clone, PartialEq)]
pub struct NavLabel {
    pub text: String,
    pub opacity: f32,
    /// Downward offset in logical pixels; 0 when fully shown.
    pub offset_y: f32,
}

const LABEL_HIDDEN_OFFSET: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum LabelProp {
    Opacity,
    Offset,
}

/// Bottom navigation indicator: one line per section, lit by scroll
/// proximity or by pointer hover.
pub struct NavIndicator {
    cfg: NavConfig,
    lines: Vec<NavLine>,
    /// Sections that already own a line, by index.
    bound: HashSet<usize>,
    state: NavState,
    label: NavLabel,
    fades: Timeline<LabelProp>,
}

impl NavIndicator {
    pub fn new(cfg: NavConfig) -> Self {
        Self {
            cfg,
            lines: Vec::new(),
            bound: HashSet::new(),
            state: NavState::default(),
            label: NavLabel { text: String::new(), opacity: 0.0, offset_y: LABEL_HIDDEN_OFFSET },
            fades: Timeline::new(),
        }
    }

    /// Give every not-yet-bound section a line. Safe to call repeatedly.
    /// Returns how many lines were added.
    pub fn bind_sections(&mut self, sections: &[Section]) -> usize {
        let mut added = 0;
        for section in sections {
            if self.bound.insert(section.index) {
                self.lines.push(NavLine { height: self.cfg.base_height, opacity: self.cfg.base_opacity });
                added += 1;
            }
        }
        if added > 0 {
            log::debug!("nav bound {} new lines ({} total)", added, self.lines.len());
        }
        added
    }

    pub fn set_config(&mut self, cfg: NavConfig) {
        self.cfg = cfg;
    }

    pub fn config(&self) -> &NavConfig {
        &self.cfg
    }

    pub fn lines(&self) -> &[NavLine] {
        &self.lines
    }

    #[cfg(test)]
    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn label(&self) -> &NavLabel {
        &self.label
    }

    pub fn pointer_enter(&mut self, index: usize, sections: &[Section], now: Instant) {
        let Some(section) = sections.get(index) else {
            log::warn!("hover on unknown nav line {}", index);
            return;
        };
        if self.state.pointer_enter(index) {
            self.label.text = section.label();
        }
        self.fade_label(1.0, 0.0, now);
    }

    pub fn pointer_leave(&mut self, related: Option<usize>, now: Instant) {
        if self.state.pointer_leave(related) {
            self.fade_label(0.0, LABEL_HIDDEN_OFFSET, now);
        }
    }

    fn fade_label(&mut self, opacity: f32, offset: f32, now: Instant) {
        let duration = Duration::from_millis(self.cfg.label_fade_ms);
        self.fades.add(
            TweenRecord::new(LabelProp::Opacity, self.label.opacity, opacity, duration, Easing::Power2Out),
            now,
        );
        self.fades.add(
            TweenRecord::new(LabelProp::Offset, self.label.offset_y, offset, duration, Easing::Power2Out),
            now,
        );
    }

    /// Per-frame update with the frame's already-integrated scroll offset.
    pub fn update(&mut self, sections: &[Section], current: f32, viewport_width: f32, now: Instant) {
        let sample = self.fades.sample(now);
        if let Some(v) = sample.value_of(&LabelProp::Opacity) {
            self.label.opacity = v;
        }
        if let Some(v) = sample.value_of(&LabelProp::Offset) {
            self.label.offset_y = v;
        }

        if sections.is_empty() || viewport_width <= 0.0 {
            return;
        }

        let count = sections.len();
        let speed = if self.state.is_hovering { self.cfg.hover_lerp } else { self.cfg.scroll_lerp };
        for (index, line) in self.lines.iter_mut().enumerate().take(count) {
            let target = match self.state.hovered_index {
                Some(hovered) if self.state.is_hovering => hover_target(index, hovered, &self.cfg),
                _ => {
                    let a = section_activation(
                        &sections[index],
                        index,
                        count,
                        current,
                        viewport_width,
                        self.cfg.falloff_k,
                    );
                    proximity_target(a, &self.cfg)
                }
            };
            line.height = lerp(line.height, target.height, speed);
            line.opacity = lerp(line.opacity, target.opacity, speed);
        }
    }
}
