use crate::nav::layout::NavLayout;
use winit::event::{ElementState, MouseScrollDelta, TouchPhase};

/// Host input reduced to what the scene understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Wheel travel in pixels, positive = towards the end of the track.
    Wheel(f32),
    PointerDown(f32),
    PointerMove(f32),
    PointerUp,
    /// Press on a nav line: scroll to that section.
    Jump(usize),
    HoverEnter(usize),
    /// `related` is the hit target the pointer moved onto, if any.
    HoverLeave { related: Option<usize> },
}

/// Wheel delta in the page convention: scrolling "down" is positive.
/// winit reports the opposite sign.
pub fn wheel_delta(delta: MouseScrollDelta, line_px: f32) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * line_px,
        MouseScrollDelta::PixelDelta(p) => -p.y as f32,
    }
}

/// Pointer bookkeeping for hit-testing and hover transitions. Positions are
/// physical pixels.
#[derive(Debug, Default)]
pub struct PointerTracker {
    pos: (f32, f32),
    hovered: Option<usize>,
    /// Press that started a drag (not a nav click).
    dragging: bool,
    /// Finger that owns the pointer while touching.
    touch_id: Option<u64>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn hover_transition(&mut self, hit: Option<usize>, out: &mut Vec<Intent>) {
        if hit == self.hovered {
            return;
        }
        if self.hovered.is_some() {
            out.push(Intent::HoverLeave { related: hit });
        }
        if let Some(index) = hit {
            out.push(Intent::HoverEnter(index));
        }
        self.hovered = hit;
    }

    pub fn cursor_moved(&mut self, x: f32, y: f32, layout: &NavLayout) -> Vec<Intent> {
        self.pos = (x, y);
        let mut out = Vec::new();
        self.hover_transition(layout.hit_test(x, y), &mut out);
        if self.dragging {
            out.push(Intent::PointerMove(x));
        }
        out
    }

    fn press(&mut self, layout: &NavLayout) -> Vec<Intent> {
        let (x, y) = self.pos;
        match layout.hit_test(x, y) {
            // nav clicks never start a drag
            Some(index) => vec![Intent::Jump(index)],
            None => {
                self.dragging = true;
                vec![Intent::PointerDown(x)]
            }
        }
    }

    fn release(&mut self) -> Vec<Intent> {
        if std::mem::take(&mut self.dragging) {
            vec![Intent::PointerUp]
        } else {
            Vec::new()
        }
    }

    pub fn mouse_button(&mut self, state: ElementState, layout: &NavLayout) -> Vec<Intent> {
        match state {
            ElementState::Pressed => self.press(layout),
            ElementState::Released => self.release(),
        }
    }

    /// The cursor left the window: end hover and any drag.
    pub fn cursor_left(&mut self) -> Vec<Intent> {
        let mut out = Vec::new();
        self.hover_transition(None, &mut out);
        out.extend(self.release());
        out
    }

    /// Single-finger touch maps onto the same press/move/release path.
    pub fn touch(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32, layout: &NavLayout) -> Vec<Intent> {
        match phase {
            TouchPhase::Started => {
                if self.touch_id.is_some() {
                    return Vec::new();
                }
                self.touch_id = Some(id);
                self.pos = (x, y);
                self.press(layout)
            }
            TouchPhase::Moved if self.touch_id == Some(id) => {
                self.pos = (x, y);
                if self.dragging {
                    vec![Intent::PointerMove(x)]
                } else {
                    Vec::new()
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled if self.touch_id == Some(id) => {
                self.touch_id = None;
                self.release()
            }
            _ => Vec::new(),
        }
    }
}
