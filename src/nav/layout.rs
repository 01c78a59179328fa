use crate::config::NavConfig;

/// A rectangle in physical pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open on the right and bottom edges so neighbouring rects never
    /// both claim the shared edge.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Extra hit area above the tallest line, in logical pixels.
const HIT_PAD: f32 = 16.0;
/// Gap between the label baseline and the top of the hit area.
const LABEL_GAP: f32 = 8.0;

/// Geometry of the bottom navigation: one hit column per section, centred
/// horizontally, touching each other so the pointer can slide between them.
#[derive(Debug, Clone)]
pub struct NavLayout {
    pub slots: Vec<Rect>,
    /// y of the line bottoms
    pub baseline: f32,
    pub line_width: f32,
    scale: f32,
}

impl NavLayout {
    pub fn compute(count: usize, viewport_w: f32, viewport_h: f32, cfg: &NavConfig, scale: f32) -> Self {
        let spacing = cfg.line_spacing * scale;
        let hit_h = (cfg.peak_height + HIT_PAD) * scale;
        let baseline = viewport_h - cfg.bottom_margin * scale;
        let start_x = (viewport_w - spacing * count as f32) / 2.0;

        let slots = (0..count)
            .map(|i| Rect::new(start_x + i as f32 * spacing, baseline - hit_h, spacing, hit_h))
            .collect();

        Self { slots, baseline, line_width: cfg.line_width * scale, scale }
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<usize> {
        self.slots.iter().position(|r| r.contains(x, y))
    }

    /// Visible rect of line `index` for a logical `height`, bottom-aligned.
    pub fn line_rect(&self, index: usize, height: f32) -> Option<Rect> {
        let slot = self.slots.get(index)?;
        let h = height * self.scale;
        Some(Rect::new(
            slot.x + (slot.width - self.line_width) / 2.0,
            self.baseline - h,
            self.line_width,
            h,
        ))
    }

    /// Centre x and bottom y for the section label above the lines.
    pub fn label_anchor(&self) -> (f32, f32) {
        let (first, last) = match (self.slots.first(), self.slots.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return (0.0, self.baseline),
        };
        let cx = (first.x + last.x + last.width) / 2.0;
        (cx, first.y - LABEL_GAP * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(count: usize) -> NavLayout {
        let cfg = NavConfig { line_spacing: 10.0, bottom_margin: 20.0, peak_height: 32.0, ..NavConfig::default() };
        NavLayout::compute(count, 200.0, 400.0, &cfg, 1.0)
    }

    #[test]
    fn slots_are_centred_and_adjacent() {
        let l = layout(4);
        assert_eq!(l.slots.len(), 4);
        assert_eq!(l.slots[0].x, 80.0);
        assert_eq!(l.slots[3].x + l.slots[3].width, 120.0);
        for w in l.slots.windows(2) {
            assert_eq!(w[0].x + w[0].width, w[1].x);
        }
    }

    #[test]
    fn hit_test_picks_one_slot_per_point() {
        let l = layout(4);
        let y = l.baseline - 5.0;
        assert_eq!(l.hit_test(80.0, y), Some(0));
        assert_eq!(l.hit_test(90.0, y), Some(1));
        assert_eq!(l.hit_test(119.9, y), Some(3));
        assert_eq!(l.hit_test(120.0, y), None);
        assert_eq!(l.hit_test(85.0, l.baseline + 1.0), None);
        assert_eq!(l.hit_test(85.0, 0.0), None);
    }

    #[test]
    fn line_rect_is_bottom_aligned() {
        let l = layout(2);
        let r = l.line_rect(1, 24.0).unwrap();
        assert_eq!(r.y + r.height, l.baseline);
        assert_eq!(r.height, 24.0);
        assert_eq!(r.x, 104.0);
        assert!(l.line_rect(2, 24.0).is_none());
    }

    #[test]
    fn empty_layout_has_no_targets() {
        let l = layout(0);
        assert!(l.slots.is_empty());
        assert_eq!(l.hit_test(100.0, l.baseline - 1.0), None);
        assert_eq!(l.label_anchor().1, l.baseline);
    }
}
